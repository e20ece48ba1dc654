//! Additive joint-value decomposition.
//!
//! The team value of a transition is the plain sum of each agent's chosen
//! action-value. Because the combination is a sum, the derivative of the team
//! value with respect to every agent's value is exactly 1: a single team-level
//! error updates each agent's local value function by the same amount, and the
//! greedy joint action is the concatenation of each agent's greedy action.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, CompositionFault, Result};
use crate::algorithms::ValueMixer;

/// Sums per-agent action-values into the team value.
///
/// Uses Neumaier compensated summation so that the result does not drift with
/// the order in which agents are listed. If a partial sum overflows, the sum
/// is recomputed on values scaled down by a power of two, so a total that
/// fits in an `f64` is still returned.
///
/// # Errors
///
/// * [`CompositionFault::EmptyTeam`] if `per_agent_values` is empty
/// * [`DecompositionError::NonFiniteValue`](super::DecompositionError::NonFiniteValue)
///   if any value is NaN or infinite, or the total exceeds the `f64` range
pub fn team_value(per_agent_values: &[f64]) -> Result<f64> {
    if per_agent_values.is_empty() {
        return Err(CompositionFault::EmptyTeam.into());
    }
    for (i, &v) in per_agent_values.iter().enumerate() {
        ensure_finite(|| format!("action value at position {}", i), v)?;
    }

    let total = compensated_sum(per_agent_values.iter().copied());
    if total.is_finite() {
        return Ok(total);
    }

    // Scaling by 2^-k with 2^k >= n keeps every partial sum within range.
    let scale = (per_agent_values.len() as f64).log2().ceil().exp2();
    let scaled = compensated_sum(per_agent_values.iter().map(|v| v / scale));
    ensure_finite(|| "team value".to_string(), scaled * scale)
}

fn compensated_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

/// Team-level temporal-difference error: `team_target - team_value`.
pub fn team_error(team_value: f64, team_target: f64) -> f64 {
    team_target - team_value
}

/// Splits a team-level error into per-agent error signals.
///
/// Under additive decomposition every agent receives the full team error.
pub fn decompose_error(team_error: f64, n_agents: usize) -> Vec<f64> {
    vec![team_error; n_agents]
}

/// Loss applied on top of the team error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LossTransform {
    /// The raw error, unchanged.
    TdError,
    /// `0.5 · e²`; its update signal equals the TD error.
    #[default]
    HalfSquared,
    /// `e²`.
    Squared,
    /// Quadratic within `±delta`, linear outside.
    Huber { delta: f64 },
}

impl LossTransform {
    /// Loss value for a team error `e = target - value`.
    pub fn loss(&self, error: f64) -> f64 {
        match *self {
            LossTransform::TdError => error,
            LossTransform::HalfSquared => 0.5 * error * error,
            LossTransform::Squared => error * error,
            LossTransform::Huber { delta } => {
                let abs = error.abs();
                if abs <= delta {
                    0.5 * error * error
                } else {
                    delta * (abs - 0.5 * delta)
                }
            }
        }
    }

    /// Negative derivative of the loss with respect to the team value.
    ///
    /// Moving the team value (and therefore each agent's value) in the
    /// direction of this signal decreases the loss. For `TdError` the signal
    /// is the error itself.
    pub fn update_signal(&self, error: f64) -> f64 {
        match *self {
            LossTransform::TdError | LossTransform::HalfSquared => error,
            LossTransform::Squared => 2.0 * error,
            LossTransform::Huber { delta } => error.clamp(-delta, delta),
        }
    }
}

/// The VDN mixer: team value is the sum of per-agent values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdditiveMixer;

impl ValueMixer for AdditiveMixer {
    fn mix(&self, per_agent_values: &[f64]) -> Result<f64> {
        team_value(per_agent_values)
    }

    fn credit(&self, per_agent_values: &[f64]) -> Vec<f64> {
        vec![1.0; per_agent_values.len()]
    }

    fn name(&self) -> &str {
        "additive"
    }
}
