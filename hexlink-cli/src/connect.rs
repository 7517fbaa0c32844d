//! Connect command - play one game against a protocol server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), save_config(), create_policy(), report_outcome()
//! - Level 3: apply_overrides()
//! - Level 4: argument types
//!
//! Settings come from an optional JSON config file; command-line flags
//! override individual fields.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use hexlink_client::{AgentConfig, PolicyKind, SessionOutcome};
use hexlink_core::{PolicySource, RandomPolicy};

use crate::human::HumanPolicy;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ConnectArgs {
    /// Agent config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server host
    #[arg(long)]
    pub host: Option<String>,

    /// Server port
    #[arg(long)]
    pub port: Option<u16>,

    /// Move source
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Probability that the random policy takes the swap when offered
    #[arg(long)]
    pub swap_probability: Option<f64>,

    /// Write the resolved config to FILE before connecting
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Random,
    Human,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Random => PolicyKind::Random,
            PolicyArg::Human => PolicyKind::Human,
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run connect command
///
/// 1. Resolve configuration (optionally saving it)
/// 2. Build the policy
/// 3. Play until the server ends the game
/// 4. Report the outcome
pub fn run(args: ConnectArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    if let Some(path) = &args.save_config {
        save_config(&config, path)?;
    }

    tracing::info!(
        "Agent: {:?} policy, swap probability {}, server {}",
        config.policy,
        config.swap_probability,
        config.address()
    );

    let policy = create_policy(&config);

    let outcome = hexlink_client::play(&config, policy)
        .with_context(|| format!("Session with {} failed", config.address()))?;

    report_outcome(&outcome);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &ConnectArgs, seed: Option<u64>) -> Result<AgentConfig> {
    let mut config = match &args.config {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    };

    apply_overrides(&mut config, args, seed);

    if !(0.0..=1.0).contains(&config.swap_probability) {
        bail!(
            "Swap probability must be within [0, 1], got {}",
            config.swap_probability
        );
    }

    Ok(config)
}

fn save_config(config: &AgentConfig, path: &Path) -> Result<()> {
    config
        .save(path)
        .with_context(|| format!("Failed to save config: {}", path.display()))?;
    tracing::info!("Saved config to {}", path.display());
    Ok(())
}

fn create_policy(config: &AgentConfig) -> Box<dyn PolicySource> {
    match config.policy {
        PolicyKind::Random => {
            let policy = match config.seed {
                Some(seed) => RandomPolicy::new(seed),
                None => RandomPolicy::from_entropy(),
            };
            Box::new(policy.with_swap_probability(config.swap_probability))
        }
        PolicyKind::Human => Box::new(HumanPolicy::stdin()),
    }
}

fn report_outcome(outcome: &SessionOutcome) {
    let winner = outcome.winner.map_or("unknown", |c| c.name());
    match outcome.we_won() {
        Some(true) => tracing::info!("Won as {} after {} turns", winner, outcome.turns),
        Some(false) => tracing::info!("Lost to {} after {} turns", winner, outcome.turns),
        None => tracing::info!("Game ended after {} turns, winner {}", outcome.turns, winner),
    }
    if outcome.swap_used {
        tracing::info!("Swap was used");
    }
    if let Some(state) = &outcome.final_state {
        tracing::debug!("Final board:\n{}", state.board());
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn apply_overrides(config: &mut AgentConfig, args: &ConnectArgs, seed: Option<u64>) {
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(policy) = args.policy {
        config.policy = policy.into();
    }
    if let Some(p) = args.swap_probability {
        config.swap_probability = p;
    }
    if seed.is_some() {
        config.seed = seed;
    }
}

// ============================================================================
// TESTS
// ============================================================================
