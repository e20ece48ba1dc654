//! Value Decomposition Networks (VDN).
//!
//! The team value of a transition is the sum of the agents' chosen
//! action-values. Training happens centrally on that sum ([`training`]);
//! execution is decentralized, each agent acting greedily on its own values
//! ([`policy`]). Additivity guarantees the two agree: the concatenation of
//! per-agent greedy actions maximizes the team value.

pub mod agent;
pub mod config;
pub mod decomposer;
pub mod error;
pub mod policy;
pub mod tabular;
pub mod training;
pub mod transition;

pub use agent::{ActionValueFunction, Agent, FnValues, LearnableValues, Team};
pub use config::{ExplorationConfig, VdnConfig};
pub use decomposer::{decompose_error, team_error, team_value, AdditiveMixer, LossTransform};
pub use error::{CompositionFault, DecompositionError, Result};
pub use policy::{EpsilonGreedyPolicy, GreedyPolicy, Policy};
pub use tabular::QTable;
pub use training::{TrainingStep, VdnTrainer};
pub use transition::JointTransition;
