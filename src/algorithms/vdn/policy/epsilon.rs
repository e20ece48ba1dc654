//! Epsilon-greedy exploration.

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::greedy::greedy_action;
use super::trait_::Policy;
use crate::algorithms::vdn::config::ExplorationConfig;
use crate::algorithms::vdn::error::{expect_count, CompositionFault, Result};

/// With probability ε picks a uniformly random legal action, otherwise the
/// greedy one. ε follows the linear schedule of [`ExplorationConfig`].
#[derive(Debug)]
pub struct EpsilonGreedyPolicy {
    config: ExplorationConfig,
    rng: StdRng,
    steps: u64,
}

impl EpsilonGreedyPolicy {
    /// Creates a new policy with a seeded random number generator.
    pub fn new(config: ExplorationConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            steps: 0,
        })
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon_at(self.steps)
    }

    /// Number of actions selected so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Policy for EpsilonGreedyPolicy {
    fn select_action(&mut self, values: &[f64], legal: Option<&[bool]>) -> Result<usize> {
        let epsilon = self.epsilon();
        self.steps += 1;

        if self.rng.gen::<f64>() < epsilon {
            if let Some(mask) = legal {
                expect_count("legal-action flags", values.len(), mask.len())?;
            }
            let action = (0..values.len())
                .filter(|&a| legal.map_or(true, |mask| mask[a]))
                .choose(&mut self.rng)
                .ok_or(CompositionFault::NoLegalActions)?;
            trace!(epsilon, action, "exploratory action");
            return Ok(action);
        }

        greedy_action(values, legal)
    }

    fn name(&self) -> &str {
        "epsilon_greedy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(start: f64, end: f64, decay_steps: u64) -> ExplorationConfig {
        ExplorationConfig {
            epsilon_start: start,
            epsilon_end: end,
            decay_steps,
        }
    }

    #[test]
    fn zero_epsilon_is_greedy() {
        let mut policy = EpsilonGreedyPolicy::new(config(0.0, 0.0, 0), 7).unwrap();
        for _ in 0..50 {
            assert_eq!(policy.select_action(&[0.0, 5.0, 1.0], None), Ok(1));
        }
        assert_eq!(policy.steps(), 50);
    }

    #[test]
    fn full_epsilon_only_picks_legal_actions() {
        let mut policy = EpsilonGreedyPolicy::new(config(1.0, 1.0, 0), 3).unwrap();
        let mask = [false, true, false, true];
        let mut seen = [false; 4];
        for _ in 0..200 {
            let a = policy
                .select_action(&[9.0, 0.0, 9.0, 0.0], Some(&mask[..]))
                .unwrap();
            seen[a] = true;
        }
        assert_eq!(seen, [false, true, false, true]);
    }

    #[test]
    fn epsilon_decays_with_use() {
        let mut policy = EpsilonGreedyPolicy::new(config(1.0, 0.0, 4), 0).unwrap();
        assert_eq!(policy.epsilon(), 1.0);
        for _ in 0..4 {
            policy.select_action(&[0.0, 1.0], None).unwrap();
        }
        assert_eq!(policy.epsilon(), 0.0);
        assert_eq!(policy.select_action(&[0.0, 1.0], None), Ok(1));
    }

    #[test]
    fn same_seed_same_actions() {
        let run = |seed| {
            let mut policy = EpsilonGreedyPolicy::new(config(0.5, 0.5, 0), seed).unwrap();
            (0..32)
                .map(|_| policy.select_action(&[0.0, 1.0, 2.0], None).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(EpsilonGreedyPolicy::new(config(2.0, 0.0, 1), 0).is_err());
    }
}
