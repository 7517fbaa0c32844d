//! Move-selection interface and the random baseline

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::codec::{swap_action, Action};
use crate::game::GameState;

/// Default chance of invoking the pie rule when it is available
pub const DEFAULT_SWAP_PROBABILITY: f64 = 0.5;

/// Anything that can pick an action for a state.
///
/// Implementations may take arbitrarily long. Callers validate the returned
/// action against the state and refuse illegal suggestions.
pub trait PolicySource {
    fn select_action(&mut self, state: &GameState) -> Action;
}

impl<P: PolicySource + ?Sized> PolicySource for Box<P> {
    fn select_action(&mut self, state: &GameState) -> Action {
        (**self).select_action(state)
    }
}

/// Uniform random player
pub struct RandomPolicy {
    rng: ChaCha8Rng,
    swap_probability: f64,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            swap_probability: DEFAULT_SWAP_PROBABILITY,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            swap_probability: DEFAULT_SWAP_PROBABILITY,
        }
    }

    /// Probability is clamped to [0, 1]
    pub fn with_swap_probability(mut self, probability: f64) -> Self {
        self.swap_probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }
}

impl PolicySource for RandomPolicy {
    /// Coin-flips the swap when available, otherwise picks an empty cell.
    /// On a finished game there is nothing legal; the swap sentinel is
    /// returned and rejected by validation.
    fn select_action(&mut self, state: &GameState) -> Action {
        let swap = swap_action(state.size());
        if state.swap_available() && self.rng.gen_bool(self.swap_probability) {
            return swap;
        }

        let cells: Vec<Action> = state
            .legal_actions()
            .into_iter()
            .filter(|&a| a != swap)
            .collect();
        cells.choose(&mut self.rng).copied().unwrap_or(swap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;
    use crate::codec::Move;

    #[test]
    fn test_random_policy_plays_legal_games() {
        for seed in 0..20 {
            let mut policy = RandomPolicy::new(seed);
            let mut state = GameState::new(7).unwrap();
            while !state.is_over() {
                let action = policy.select_action(&state);
                assert!(state.is_legal(action));
                state = state.apply_move(action).unwrap();
            }
            assert!(state.winner().is_some());
        }
    }

    #[test]
    fn test_swap_probability_extremes() {
        let state = GameState::new(5)
            .unwrap()
            .apply(Move::Place(Pos::new(0, 0)))
            .unwrap();

        let mut always = RandomPolicy::new(1).with_swap_probability(1.0);
        assert_eq!(always.select_action(&state), swap_action(5));

        let mut never = RandomPolicy::new(1).with_swap_probability(-3.0);
        assert_ne!(never.select_action(&state), swap_action(5));
    }

    #[test]
    fn test_same_seed_same_choices() {
        let state = GameState::new(9).unwrap();
        let mut a = RandomPolicy::new(42);
        let mut b = RandomPolicy::new(42);
        for _ in 0..10 {
            assert_eq!(a.select_action(&state), b.select_action(&state));
        }
    }
}
