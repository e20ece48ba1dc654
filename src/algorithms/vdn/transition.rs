//! Joint transitions collected by the external training loop.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::decomposer::team_value;
use super::error::{ensure_finite, expect_count, CompositionFault, Result};

/// One environment step for the whole team.
///
/// Every per-agent field is indexed in team order (see
/// [`Team`](super::Team)); all of them must hold exactly one entry per agent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointTransition {
    /// Per-agent observations at time t.
    pub observations: Vec<Vec<f64>>,
    /// Per-agent actions taken at time t.
    pub actions: Vec<usize>,
    /// Per-agent action-values of the taken actions, as estimated when acting.
    pub action_values: Vec<f64>,
    /// Shared team reward.
    pub reward: f64,
    /// Per-agent observations at time t + 1.
    pub next_observations: Vec<Vec<f64>>,
    /// Per-agent legal-action masks at time t + 1 (`None` = all legal).
    pub next_legal_actions: Option<Vec<Vec<bool>>>,
    /// Environment discount; 0 when the episode ended at this step.
    pub discount: f64,
}

impl JointTransition {
    /// Builds a transition from per-agent rewards and discounts.
    ///
    /// The shared reward and discount are the means of the per-agent values.
    /// Per-agent sequences must be non-empty and of equal length.
    pub fn from_agent_rewards(
        observations: Vec<Vec<f64>>,
        actions: Vec<usize>,
        action_values: Vec<f64>,
        agent_rewards: &[f64],
        next_observations: Vec<Vec<f64>>,
        agent_discounts: &[f64],
    ) -> Result<Self> {
        let n = observations.len();
        if n == 0 {
            return Err(CompositionFault::EmptyTeam.into());
        }
        expect_count("rewards", n, agent_rewards.len())?;
        expect_count("discounts", n, agent_discounts.len())?;

        let reward = agent_rewards.iter().sum::<f64>() / n as f64;
        let discount = agent_discounts.iter().sum::<f64>() / n as f64;

        let transition = Self {
            observations,
            actions,
            action_values,
            reward,
            next_observations,
            next_legal_actions: None,
            discount,
        };
        transition.validate(n)?;
        Ok(transition)
    }

    /// Number of agents this transition carries data for.
    pub fn n_agents(&self) -> usize {
        self.observations.len()
    }

    /// Returns true if the episode ended at this step.
    pub fn is_terminal(&self) -> bool {
        self.discount == 0.0
    }

    /// Checks the transition against a team of `team_size` agents.
    ///
    /// # Errors
    ///
    /// * [`CompositionFault::EmptyTeam`] if `team_size` is 0
    /// * [`CompositionFault::CountMismatch`] if any per-agent field has the
    ///   wrong length
    /// * `NonFiniteValue` if an action-value, the reward or the discount is
    ///   NaN or infinite
    pub fn validate(&self, team_size: usize) -> Result<()> {
        if team_size == 0 {
            return Err(CompositionFault::EmptyTeam.into());
        }
        expect_count("observations", team_size, self.observations.len())?;
        expect_count("actions", team_size, self.actions.len())?;
        expect_count("action values", team_size, self.action_values.len())?;
        expect_count("next observations", team_size, self.next_observations.len())?;
        if let Some(masks) = &self.next_legal_actions {
            expect_count("legal-action masks", team_size, masks.len())?;
        }

        for (i, &v) in self.action_values.iter().enumerate() {
            ensure_finite(|| format!("action value of agent {}", i), v)?;
        }
        ensure_finite(|| "team reward".to_string(), self.reward)?;
        ensure_finite(|| "discount".to_string(), self.discount)?;
        Ok(())
    }

    /// Team value from the recorded per-agent action-values.
    pub fn team_value(&self) -> Result<f64> {
        team_value(&self.action_values)
    }

    /// Legal-action mask for agent `i` at the next step, if one was recorded.
    pub fn next_legal_for(&self, i: usize) -> Option<&[bool]> {
        self.next_legal_actions
            .as_ref()
            .and_then(|masks| masks.get(i))
            .map(|m| m.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::vdn::DecompositionError;

    fn transition(n: usize) -> JointTransition {
        JointTransition {
            observations: vec![vec![0.0]; n],
            actions: vec![0; n],
            action_values: (1..=n).map(|i| i as f64).collect(),
            reward: 1.0,
            next_observations: vec![vec![1.0]; n],
            next_legal_actions: None,
            discount: 1.0,
        }
    }

    #[test]
    fn valid_transition_passes() {
        let t = transition(3);
        assert!(t.validate(3).is_ok());
        assert_eq!(t.team_value(), Ok(6.0));
        assert!(!t.is_terminal());
    }

    #[test]
    fn agent_count_mismatch_is_fatal() {
        let mut t = transition(3);
        t.action_values.pop();
        assert_eq!(
            t.validate(3),
            Err(DecompositionError::InvalidTeamComposition(
                CompositionFault::CountMismatch {
                    field: "action values",
                    expected: 3,
                    found: 2,
                }
            ))
        );
    }

    #[test]
    fn transition_for_other_team_size_is_rejected() {
        assert!(transition(2).validate(3).is_err());
        assert!(transition(2).validate(0).is_err());
    }

    #[test]
    fn mask_count_is_checked() {
        let mut t = transition(2);
        t.next_legal_actions = Some(vec![vec![true]]);
        assert!(t.validate(2).is_err());
        t.next_legal_actions = Some(vec![vec![true], vec![false, true]]);
        assert!(t.validate(2).is_ok());
        assert_eq!(t.next_legal_for(1), Some(&[false, true][..]));
    }

    #[test]
    fn non_finite_reward_is_rejected() {
        let mut t = transition(1);
        t.reward = f64::NAN;
        assert!(matches!(
            t.validate(1),
            Err(DecompositionError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn from_agent_rewards_averages() {
        let t = JointTransition::from_agent_rewards(
            vec![vec![0.0], vec![0.0]],
            vec![1, 0],
            vec![0.5, 0.25],
            &[1.0, 3.0],
            vec![vec![1.0], vec![1.0]],
            &[0.0, 0.0],
        )
        .unwrap();
        assert_eq!(t.reward, 2.0);
        assert!(t.is_terminal());
        assert_eq!(t.team_value(), Ok(0.75));
    }

    #[test]
    fn from_agent_rewards_checks_lengths() {
        let err = JointTransition::from_agent_rewards(
            vec![vec![0.0], vec![0.0]],
            vec![1, 0],
            vec![0.5, 0.25],
            &[1.0],
            vec![vec![1.0], vec![1.0]],
            &[1.0, 1.0],
        );
        assert!(err.is_err());
    }
}
