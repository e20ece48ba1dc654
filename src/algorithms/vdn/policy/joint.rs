//! Decentralized team execution and joint-action enumeration.

use super::trait_::Policy;
use crate::algorithms::vdn::agent::{ActionValueFunction, Team};
use crate::algorithms::vdn::decomposer::team_value;
use crate::algorithms::vdn::error::{expect_count, CompositionFault, Result};

impl<Q: ActionValueFunction> Team<Q> {
    /// Lets every agent pick its action from its own observation.
    ///
    /// Agent `i` only evaluates its own action-value function on
    /// `observations[i]`; no information flows between agents.
    ///
    /// # Arguments
    ///
    /// * `policies` - One policy per agent, in team order
    /// * `observations` - One local observation per agent
    /// * `legal` - Optional per-agent legal-action masks
    pub fn act<P: Policy>(
        &self,
        policies: &mut [P],
        observations: &[Vec<f64>],
        legal: Option<&[Vec<bool>]>,
    ) -> Result<Vec<usize>> {
        let n = self.len();
        expect_count("policies", n, policies.len())?;
        expect_count("observations", n, observations.len())?;
        if let Some(masks) = legal {
            expect_count("legal-action masks", n, masks.len())?;
        }

        self.agents()
            .iter()
            .zip(policies.iter_mut())
            .zip(observations)
            .enumerate()
            .map(|(i, ((agent, policy), obs))| {
                let values = agent.values(obs)?;
                let mask = legal.map(|m| m[i].as_slice());
                policy.select_action(&values, mask)
            })
            .collect()
    }
}

/// Iterator over every joint action of a team.
///
/// Yields each combination of per-agent actions exactly once, with the last
/// agent's action varying fastest.
#[derive(Debug, Clone)]
pub struct JointActions {
    sizes: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl JointActions {
    /// Creates the iterator from per-agent action counts.
    ///
    /// Yields nothing if `sizes` is empty or any agent has zero actions.
    pub fn new(sizes: Vec<usize>) -> Self {
        let next = if sizes.is_empty() || sizes.contains(&0) {
            None
        } else {
            Some(vec![0; sizes.len()])
        };
        Self { sizes, next }
    }

    /// Number of joint actions (product of per-agent counts), or `None` if
    /// it does not fit in a `usize`.
    pub fn count_total(&self) -> Option<usize> {
        if self.sizes.is_empty() {
            return Some(0);
        }
        self.sizes
            .iter()
            .try_fold(1_usize, |acc, &size| acc.checked_mul(size))
    }
}

impl Iterator for JointActions {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        let mut advanced = current.clone();
        for i in (0..advanced.len()).rev() {
            advanced[i] += 1;
            if advanced[i] < self.sizes[i] {
                self.next = Some(advanced);
                break;
            }
            advanced[i] = 0;
        }

        Some(current)
    }
}

/// Exhaustively finds the joint action with the highest team value.
///
/// `per_agent_values[i]` holds agent `i`'s action-values. Ties resolve to the
/// first joint action in [`JointActions`] order. This is exponential in the
/// number of agents; it exists to check decentralized greedy execution on
/// small action spaces.
pub fn best_joint_action(per_agent_values: &[Vec<f64>]) -> Result<(Vec<usize>, f64)> {
    if per_agent_values.is_empty() {
        return Err(CompositionFault::EmptyTeam.into());
    }

    let sizes = per_agent_values.iter().map(|v| v.len()).collect();
    let mut best: Option<(Vec<usize>, f64)> = None;
    let mut chosen = Vec::with_capacity(per_agent_values.len());

    for joint in JointActions::new(sizes) {
        chosen.clear();
        chosen.extend(joint.iter().zip(per_agent_values).map(|(&a, q)| q[a]));
        let value = team_value(&chosen)?;
        if best.as_ref().map_or(true, |(_, b)| value > *b) {
            best = Some((joint, value));
        }
    }

    best.ok_or_else(|| CompositionFault::NoLegalActions.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::vdn::agent::{Agent, FnValues};
    use crate::algorithms::vdn::policy::{greedy_action, GreedyPolicy};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn enumerates_every_joint_action_once() {
        let all: Vec<_> = JointActions::new(vec![2, 3]).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], vec![0, 0]);
        assert_eq!(all[1], vec![0, 1]);
        assert_eq!(all[5], vec![1, 2]);
        assert_eq!(JointActions::new(vec![2, 3]).count_total(), Some(6));
    }

    #[test]
    fn degenerate_action_spaces() {
        assert_eq!(JointActions::new(vec![]).count(), 0);
        assert_eq!(JointActions::new(vec![3, 0]).count(), 0);
        assert_eq!(JointActions::new(vec![1]).collect::<Vec<_>>(), vec![vec![0]]);
    }

    #[test]
    fn joint_action_count_reports_overflow() {
        assert_eq!(JointActions::new(vec![]).count_total(), Some(0));
        assert_eq!(JointActions::new(vec![4, 0]).count_total(), Some(0));
        assert_eq!(JointActions::new(vec![usize::MAX, 2]).count_total(), None);
        assert_eq!(JointActions::new(vec![1 << 20; 4]).count_total(), None);
    }

    #[test]
    fn brute_force_on_known_values() {
        let q = vec![vec![1.0, 4.0], vec![2.0, -1.0, 0.5]];
        let (joint, value) = best_joint_action(&q).unwrap();
        assert_eq!(joint, vec![1, 0]);
        assert_eq!(value, 6.0);
    }

    #[test]
    fn decentralized_greedy_matches_exhaustive_search() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..200 {
            let n_agents = rng.gen_range(1..=4);
            let per_agent: Vec<Vec<f64>> = (0..n_agents)
                .map(|_| {
                    let n_actions = rng.gen_range(1..=4);
                    (0..n_actions).map(|_| rng.gen_range(-10.0..10.0)).collect()
                })
                .collect();

            let local: Vec<usize> = per_agent
                .iter()
                .map(|q| greedy_action(q, None).unwrap())
                .collect();
            let local_value =
                team_value(&local.iter().zip(&per_agent).map(|(&a, q)| q[a]).collect::<Vec<_>>())
                    .unwrap();

            let (_, best_value) = best_joint_action(&per_agent).unwrap();
            assert!((local_value - best_value).abs() < 1e-9);
        }
    }

    #[test]
    fn team_act_uses_only_local_observations() {
        // Each agent prefers the action indexed by the first entry of its own
        // observation.
        let pick = |obs: &[f64]| {
            let mut v = vec![0.0; 3];
            v[obs[0] as usize] = 1.0;
            v
        };
        let team = Team::new(vec![
            Agent::with_id("a", FnValues::new(3, pick)),
            Agent::with_id("b", FnValues::new(3, pick)),
        ])
        .unwrap();

        let mut policies = vec![GreedyPolicy; 2];
        let actions = team
            .act(&mut policies, &[vec![2.0], vec![0.0]], None)
            .unwrap();
        assert_eq!(actions, vec![2, 0]);

        let masks = vec![vec![true, true, false], vec![false, true, true]];
        let actions = team
            .act(&mut policies, &[vec![2.0], vec![0.0]], Some(masks.as_slice()))
            .unwrap();
        assert_eq!(actions, vec![0, 1]);
    }

    #[test]
    fn team_act_rejects_count_mismatch() {
        let team = Team::new(vec![Agent::with_id(
            "a",
            FnValues::new(1, |_: &[f64]| vec![0.0]),
        )])
        .unwrap();
        let mut policies = vec![GreedyPolicy];
        assert!(team
            .act(&mut policies, &[vec![0.0], vec![0.0]], None)
            .is_err());
    }
}
