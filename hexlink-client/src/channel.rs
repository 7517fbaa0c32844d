//! Newline-framed transport

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};

use crate::error::ProtocolError;

/// Half-duplex frame transport
pub trait FrameChannel {
    /// Block until a full frame arrives. `None` once the peer has closed.
    fn recv_frame(&mut self) -> Result<Option<String>, ProtocolError>;

    /// Send one frame; `frame` carries its own terminator
    fn send_frame(&mut self, frame: &str) -> Result<(), ProtocolError>;

    /// Release the underlying connection
    fn close(&mut self) {}
}

/// Opens the channel for the CONNECTING phase
pub trait Connector {
    type Channel: FrameChannel;

    fn connect(&mut self) -> Result<Self::Channel, ProtocolError>;
}

// ============================================================================
// LINE CHANNEL
// ============================================================================

/// Frames are lines on a buffered reader/writer pair
pub struct LineChannel<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<R: BufRead, W: Write> FrameChannel for LineChannel<R, W> {
    fn recv_frame(&mut self) -> Result<Option<String>, ProtocolError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let frame = line.trim_end_matches(['\r', '\n']).to_string();
        tracing::trace!("<- {}", frame);
        Ok(Some(frame))
    }

    fn send_frame(&mut self, frame: &str) -> Result<(), ProtocolError> {
        tracing::trace!("-> {}", frame.trim_end());
        self.writer.write_all(frame.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// TCP
// ============================================================================

/// Line channel over a TCP stream
pub struct TcpChannel {
    inner: LineChannel<BufReader<TcpStream>, TcpStream>,
}

impl TcpChannel {
    pub fn new(stream: TcpStream) -> Result<Self, ProtocolError> {
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self {
            inner: LineChannel::new(reader, stream),
        })
    }
}

impl FrameChannel for TcpChannel {
    fn recv_frame(&mut self) -> Result<Option<String>, ProtocolError> {
        self.inner.recv_frame()
    }

    fn send_frame(&mut self, frame: &str) -> Result<(), ProtocolError> {
        self.inner.send_frame(frame)
    }

    fn close(&mut self) {
        // Peer may already be gone
        let _ = self.inner.writer.shutdown(Shutdown::Both);
    }
}

/// Connects to a fixed `host:port`
#[derive(Clone, Debug)]
pub struct TcpConnector {
    address: String,
}

impl TcpConnector {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Connector for TcpConnector {
    type Channel = TcpChannel;

    fn connect(&mut self) -> Result<TcpChannel, ProtocolError> {
        let stream = TcpStream::connect(&self.address)?;
        TcpChannel::new(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_line_channel_frames() {
        let input = Cursor::new(b"START;3;R\r\nEND\n".to_vec());
        let mut channel = LineChannel::new(input, Vec::new());

        assert_eq!(channel.recv_frame().unwrap().as_deref(), Some("START;3;R"));
        assert_eq!(channel.recv_frame().unwrap().as_deref(), Some("END"));
        assert_eq!(channel.recv_frame().unwrap(), None);

        channel.send_frame("1,1\n").unwrap();
        channel.send_frame("SWAP\n").unwrap();
        assert_eq!(channel.writer().as_slice(), b"1,1\nSWAP\n");
    }
}
