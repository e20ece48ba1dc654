//! Decentralized execution: per-agent action selection.

pub mod epsilon;
pub mod greedy;
pub mod joint;
pub mod trait_;

pub use epsilon::EpsilonGreedyPolicy;
pub use greedy::{greedy_action, greedy_value, GreedyPolicy};
pub use joint::{best_joint_action, JointActions};
pub use trait_::Policy;
