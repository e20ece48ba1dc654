//! Centralized training: team TD targets, losses, and per-agent updates.

pub mod targets;
pub mod trainer;

pub use targets::{evaluate_transition, td_target, TransitionEvaluation};
pub use trainer::{TrainingStep, VdnTrainer};
