pub mod vdn;

pub use self::vdn::AdditiveMixer;

use self::vdn::Result;

/// Combines per-agent action-values into a single joint (team) value.
///
/// Implementors also report how a team-level error is credited back to each
/// agent's contributing value, i.e. the partial derivative of the joint value
/// with respect to every per-agent input.
pub trait ValueMixer {
    /// Mixes the chosen per-agent action-values of one transition.
    ///
    /// # Arguments
    ///
    /// * `per_agent_values` - One value per agent, in team order
    ///
    /// # Returns
    ///
    /// The joint value, or an error if the input is structurally invalid or
    /// contains non-finite values.
    fn mix(&self, per_agent_values: &[f64]) -> Result<f64>;

    /// Per-agent weights applied to a team-level update signal.
    ///
    /// Takes the same values passed to [`mix`](Self::mix) because a
    /// non-linear mixer's derivative depends on them. The result must hold
    /// one weight per input value.
    fn credit(&self, per_agent_values: &[f64]) -> Vec<f64>;

    /// Returns a human-readable name for this mixer.
    fn name(&self) -> &str;
}
