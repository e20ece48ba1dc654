//! Configuration for centralized VDN training and decentralized exploration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::decomposer::LossTransform;
use super::error::{DecompositionError, Result};

/// Training hyperparameters for the centralized VDN update.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VdnConfig {
    /// Discount factor γ applied on top of the environment discount.
    pub discount: f64,
    /// Loss applied to the team TD error.
    pub loss: LossTransform,
    /// Select next actions with the online functions and evaluate them with
    /// the target functions (double Q-learning).
    pub double_q: bool,
    /// Number of training steps between online → target copies.
    pub target_update_period: u64,
    /// Clip each update signal to `±max_update_magnitude`.
    pub max_update_magnitude: Option<f64>,
}

impl VdnConfig {
    /// Checks that every hyperparameter is in range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(DecompositionError::InvalidConfig(format!(
                "discount must lie in [0, 1], got {}",
                self.discount
            )));
        }
        if self.target_update_period == 0 {
            return Err(DecompositionError::InvalidConfig(
                "target_update_period must be at least 1".to_string(),
            ));
        }
        if let LossTransform::Huber { delta } = self.loss {
            if !(delta.is_finite() && delta > 0.0) {
                return Err(DecompositionError::InvalidConfig(format!(
                    "huber delta must be positive, got {}",
                    delta
                )));
            }
        }
        if let Some(max) = self.max_update_magnitude {
            if !(max.is_finite() && max > 0.0) {
                return Err(DecompositionError::InvalidConfig(format!(
                    "max_update_magnitude must be positive, got {}",
                    max
                )));
            }
        }
        Ok(())
    }
}

impl Default for VdnConfig {
    fn default() -> Self {
        Self {
            discount: 0.99,
            loss: LossTransform::HalfSquared,
            double_q: false,
            target_update_period: 100,
            max_update_magnitude: None,
        }
    }
}

/// Linear epsilon schedule for exploratory action selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExplorationConfig {
    /// Epsilon at step 0.
    pub epsilon_start: f64,
    /// Epsilon once the decay is complete.
    pub epsilon_end: f64,
    /// Number of action selections over which epsilon decays linearly.
    pub decay_steps: u64,
}

impl ExplorationConfig {
    /// Checks that both epsilons are probabilities.
    pub fn validate(&self) -> Result<()> {
        for (name, eps) in [
            ("epsilon_start", self.epsilon_start),
            ("epsilon_end", self.epsilon_end),
        ] {
            if !(0.0..=1.0).contains(&eps) {
                return Err(DecompositionError::InvalidConfig(format!(
                    "{} must lie in [0, 1], got {}",
                    name, eps
                )));
            }
        }
        Ok(())
    }

    /// Epsilon after `step` action selections.
    pub fn epsilon_at(&self, step: u64) -> f64 {
        if self.decay_steps == 0 || step >= self.decay_steps {
            return self.epsilon_end;
        }
        let frac = step as f64 / self.decay_steps as f64;
        self.epsilon_start + frac * (self.epsilon_end - self.epsilon_start)
    }
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            epsilon_start: 1.0,
            epsilon_end: 0.05,
            decay_steps: 10_000,
        }
    }
}
