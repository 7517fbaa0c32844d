//! Integration tests for the HEXLINK protocol client
//!
//! A scripted referee runs on a local TCP listener and plays the opponent
//! with its own `GameState`, echoing every move back as the real server does.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use hexlink_client::{parse_move, play, AgentConfig, ProtocolError};
use hexlink_core::{decode, Colour, GameState, PolicySource, RandomPolicy, Seat};

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// How the referee announces the end of the game
#[derive(Clone, Copy)]
enum EndStyle {
    /// `END;<winner>`
    Winner,
    /// `CHANGE;<move>;<board>;END`
    ChangeWithBoard,
}

struct Referee {
    agent_colour: Colour,
    size: usize,
    seed: u64,
    swap_probability: f64,
    end_style: EndStyle,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn listen() -> (TcpListener, AgentConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let config = AgentConfig {
        port: listener.local_addr().unwrap().port(),
        ..Default::default()
    };
    (listener, config)
}

fn send(writer: &mut TcpStream, frame: &str) {
    writer.write_all(frame.as_bytes()).unwrap();
    writer.write_all(b"\n").unwrap();
}

/// Play one full game against whoever connects; returns the final state
fn referee(listener: TcpListener, game: Referee) -> GameState {
    let (stream, _) = listener.accept().unwrap();
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut writer = stream;

    send(&mut writer, &format!("START;{};{}", game.size, game.agent_colour.to_char()));

    let agent_seat = Seat::initial_for(game.agent_colour).unwrap();
    let mut opponent = RandomPolicy::new(game.seed).with_swap_probability(game.swap_probability);
    let mut state = GameState::new(game.size).unwrap();

    loop {
        let mv = if state.active_seat() == agent_seat {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            parse_move(line.trim()).unwrap()
        } else {
            decode(opponent.select_action(&state), game.size).unwrap()
        };

        state = state.apply(mv).unwrap();
        let board = state.board().serialize();

        if let Some(winner) = state.winner() {
            match game.end_style {
                EndStyle::Winner => send(&mut writer, &format!("END;{}", winner.to_char())),
                EndStyle::ChangeWithBoard => send(&mut writer, &format!("CHANGE;{};{};END", mv, board)),
            }
            return state;
        }

        let next = state.active_colour().to_char();
        send(&mut writer, &format!("CHANGE;{};{};{}", mv, board, next));
    }
}

fn play_against_referee(game: Referee, agent: RandomPolicy) -> (GameState, hexlink_client::SessionOutcome) {
    init_tracing();
    let (listener, config) = listen();
    let server = thread::spawn(move || referee(listener, game));
    let outcome = play(&config, agent).unwrap();
    let final_state = server.join().unwrap();
    (final_state, outcome)
}

// ============================================================================
// FULL GAMES
// ============================================================================

#[test]
fn test_full_game_as_red() {
    let (server_state, outcome) = play_against_referee(
        Referee {
            agent_colour: Colour::First,
            size: 5,
            seed: 11,
            swap_probability: 0.0,
            end_style: EndStyle::Winner,
        },
        RandomPolicy::new(3),
    );

    assert_eq!(outcome.winner, server_state.winner());
    assert_eq!(outcome.our_colour, Some(Colour::First));
    assert!(!outcome.swap_used);
    // END carries no move: a winning opponent move is never applied locally
    let expected_turns = if outcome.we_won() == Some(true) {
        server_state.turn_index()
    } else {
        server_state.turn_index() - 1
    };
    assert_eq!(outcome.turns, expected_turns);
}

#[test]
fn test_full_game_as_blue_with_swap() {
    let (server_state, outcome) = play_against_referee(
        Referee {
            agent_colour: Colour::Second,
            size: 6,
            seed: 5,
            swap_probability: 0.0,
            end_style: EndStyle::Winner,
        },
        RandomPolicy::new(8).with_swap_probability(1.0),
    );

    assert!(outcome.swap_used);
    assert!(server_state.swap_used());
    // Swapping as blue takes over red
    assert_eq!(outcome.our_colour, Some(Colour::First));
    assert_eq!(outcome.winner, server_state.winner());
}

#[test]
fn test_opponent_swap_flips_our_colour() {
    let (server_state, outcome) = play_against_referee(
        Referee {
            agent_colour: Colour::First,
            size: 4,
            seed: 21,
            swap_probability: 1.0,
            end_style: EndStyle::ChangeWithBoard,
        },
        RandomPolicy::new(4),
    );

    assert!(outcome.swap_used);
    assert_eq!(outcome.our_colour, Some(Colour::Second));
    // Winner taken from the board on the final CHANGE;...;END frame
    assert_eq!(outcome.winner, server_state.winner());
    assert_eq!(
        outcome.we_won(),
        Some(server_state.winning_seat() == Some(Seat::Opener))
    );
}

#[test]
fn test_many_seeds_stay_in_sync() {
    for seed in 0..8 {
        let (server_state, outcome) = play_against_referee(
            Referee {
                agent_colour: if seed % 2 == 0 { Colour::First } else { Colour::Second },
                size: 7,
                seed,
                swap_probability: 0.5,
                end_style: EndStyle::ChangeWithBoard,
            },
            RandomPolicy::new(seed + 100),
        );
        assert_eq!(outcome.winner, server_state.winner(), "seed {}", seed);
        assert_eq!(outcome.swap_used, server_state.swap_used(), "seed {}", seed);
    }
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_handshake_failure_over_tcp() {
    init_tracing();
    let (listener, config) = listen();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        send(&mut stream, "HELLO;1");
    });

    let result = play(&config, RandomPolicy::new(1));
    server.join().unwrap();
    assert!(matches!(result, Err(ProtocolError::Handshake(_))));
}

#[test]
fn test_connection_refused() {
    let (listener, config) = listen();
    drop(listener);
    assert!(matches!(
        play(&config, RandomPolicy::new(1)),
        Err(ProtocolError::Io(_))
    ));
}
