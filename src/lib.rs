//! vdn - additive value decomposition for cooperative multi-agent RL
//!
//! Combines per-agent action-value estimates into a team value for
//! centralized training, and lets each agent act on its own estimates at
//! execution time.

pub mod algorithms;

pub use algorithms::vdn::{
    team_error, team_value, CompositionFault, DecompositionError, JointTransition, Team,
    VdnConfig, VdnTrainer,
};
pub use algorithms::ValueMixer;

/// Identifier type used for agents.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
