//! Agent configuration
//!
//! Loaded from JSON; every field is optional and falls back to the default.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use hexlink_core::DEFAULT_SWAP_PROBABILITY;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 1234;

/// Which policy drives our moves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Random,
    Human,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub host: String,
    pub port: u16,
    pub policy: PolicyKind,
    pub swap_probability: f64,
    /// Random seed for reproducibility (None = entropy)
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            policy: PolicyKind::Random,
            swap_probability: DEFAULT_SWAP_PROBABILITY,
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Server endpoint as `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.address(), "127.0.0.1:1234");
        assert_eq!(config.policy, PolicyKind::Random);
        assert_eq!(config.swap_probability, 0.5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AgentConfig =
            serde_json::from_str(r#"{"port": 4000, "policy": "human"}"#).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.policy, PolicyKind::Human);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("hexlink-config-{}.json", std::process::id()));
        let config = AgentConfig {
            host: "10.0.0.2".to_string(),
            seed: Some(7),
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = AgentConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = AgentConfig::load(Path::new("/nonexistent/hexlink.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
