//! Policy trait for decentralized execution.

use crate::algorithms::vdn::Result;

/// Selects one agent's action from that agent's own action-values.
///
/// A policy never sees other agents' values or observations, so every agent
/// can run it independently at execution time.
pub trait Policy: Send + Sync {
    /// Selects an action.
    ///
    /// # Arguments
    ///
    /// * `values` - The agent's action-values for its current observation
    /// * `legal` - Optional legal-action mask (`None` = every action is legal)
    ///
    /// # Returns
    ///
    /// The chosen action index.
    fn select_action(&mut self, values: &[f64], legal: Option<&[bool]>) -> Result<usize>;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
