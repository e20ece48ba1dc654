//! Agents, their local action-value functions, and the team they form.

use std::collections::HashSet;
use std::fmt;

use super::error::{ensure_finite, CompositionFault, Result};
use crate::Id;

/// Local action-value function of one agent over a discrete action space.
///
/// Implementations only ever see the owning agent's observation; this is what
/// allows decentralized execution after centralized training.
pub trait ActionValueFunction {
    /// Number of discrete actions.
    fn num_actions(&self) -> usize;

    /// Action-value estimate for every action given a local observation.
    ///
    /// The returned vector has exactly [`num_actions`](Self::num_actions)
    /// entries.
    fn action_values(&self, observation: &[f64]) -> Vec<f64>;
}

/// An action-value function the trainer can update in place.
///
/// This is the seam to whatever optimizer owns the function's parameters.
pub trait LearnableValues: ActionValueFunction {
    /// Moves `Q(observation, action)` in the direction of `signal`.
    fn apply_update(&mut self, observation: &[f64], action: usize, signal: f64);
}

/// Adapts a closure into an [`ActionValueFunction`].
#[derive(Clone)]
pub struct FnValues<F> {
    num_actions: usize,
    f: F,
}

impl<F> FnValues<F>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    pub fn new(num_actions: usize, f: F) -> Self {
        Self { num_actions, f }
    }
}

impl<F> fmt::Debug for FnValues<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValues")
            .field("num_actions", &self.num_actions)
            .finish_non_exhaustive()
    }
}

impl<F> ActionValueFunction for FnValues<F>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn action_values(&self, observation: &[f64]) -> Vec<f64> {
        (self.f)(observation)
    }
}

/// A single agent: a stable key plus its local action-value function.
#[derive(Debug, Clone)]
pub struct Agent<Q> {
    /// Unique key within the team.
    pub id: Id,
    /// Local action-value function.
    pub q: Q,
}

impl<Q: ActionValueFunction> Agent<Q> {
    /// Creates an agent with a freshly generated id.
    pub fn new(q: Q) -> Self {
        Self {
            id: crate::generate_id(),
            q,
        }
    }

    /// Creates an agent with an explicit id.
    pub fn with_id(id: impl Into<Id>, q: Q) -> Self {
        Self { id: id.into(), q }
    }

    /// Action-values for a local observation, checked for length and finiteness.
    pub fn values(&self, observation: &[f64]) -> Result<Vec<f64>> {
        let values = self.q.action_values(observation);
        let expected = self.q.num_actions();
        if values.len() != expected {
            return Err(CompositionFault::CountMismatch {
                field: "action values",
                expected,
                found: values.len(),
            }
            .into());
        }
        for (a, &v) in values.iter().enumerate() {
            ensure_finite(|| format!("action value of agent {} action {}", self.id, a), v)?;
        }
        Ok(values)
    }

    /// Action-value of a specific action.
    pub fn value_of(&self, observation: &[f64], action: usize) -> Result<f64> {
        self.check_action(action)?;
        Ok(self.values(observation)?[action])
    }

    /// Fails if `action` is outside this agent's action space.
    pub fn check_action(&self, action: usize) -> Result<()> {
        let num_actions = self.q.num_actions();
        if action < num_actions {
            Ok(())
        } else {
            Err(CompositionFault::ActionOutOfRange {
                agent: self.id.clone(),
                action,
                num_actions,
            }
            .into())
        }
    }
}

/// Ordered, non-empty set of agents with unique ids.
///
/// The order fixes the per-agent indexing used by
/// [`JointTransition`](super::JointTransition).
#[derive(Debug, Clone)]
pub struct Team<Q> {
    agents: Vec<Agent<Q>>,
}

impl<Q: ActionValueFunction> Team<Q> {
    /// Creates a team.
    ///
    /// # Errors
    ///
    /// * [`CompositionFault::EmptyTeam`] if `agents` is empty
    /// * [`CompositionFault::DuplicateAgent`] if two agents share an id
    pub fn new(agents: Vec<Agent<Q>>) -> Result<Self> {
        if agents.is_empty() {
            return Err(CompositionFault::EmptyTeam.into());
        }
        let mut seen = HashSet::with_capacity(agents.len());
        for agent in &agents {
            if !seen.insert(agent.id.as_str()) {
                return Err(CompositionFault::DuplicateAgent(agent.id.clone()).into());
            }
        }
        Ok(Self { agents })
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Always false: a team has at least one agent.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents in team order.
    pub fn agents(&self) -> &[Agent<Q>] {
        &self.agents
    }

    /// Mutable access to the agents, in team order.
    pub fn agents_mut(&mut self) -> &mut [Agent<Q>] {
        &mut self.agents
    }

    /// Position of the agent with the given id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.agents.iter().position(|a| a.id == id)
    }

    /// Agent with the given id.
    pub fn get(&self, id: &str) -> Option<&Agent<Q>> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Agent ids in team order.
    pub fn ids(&self) -> Vec<Id> {
        self.agents.iter().map(|a| a.id.clone()).collect()
    }
}
