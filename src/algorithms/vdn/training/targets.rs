//! Team TD targets and errors for single transitions.
//!
//! Bootstraps from the target functions of every agent and mixes both the
//! chosen values and the bootstrap values into team values before comparing
//! them.

use crate::algorithms::vdn::agent::{ActionValueFunction, Team};
use crate::algorithms::vdn::config::VdnConfig;
use crate::algorithms::vdn::decomposer::team_error;
use crate::algorithms::vdn::error::{ensure_finite, expect_count, Result};
use crate::algorithms::vdn::policy::greedy_action;
use crate::algorithms::vdn::transition::JointTransition;
use crate::algorithms::ValueMixer;

/// Everything computed for one transition during a training step.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionEvaluation {
    /// Online action-values of the actions taken, in team order.
    pub chosen_values: Vec<f64>,
    /// Mixed team value of `chosen_values`.
    pub team_value: f64,
    /// Per-agent bootstrap values at the next step (empty when terminal).
    pub bootstrap_values: Vec<f64>,
    /// Team TD target.
    pub target: f64,
    /// `target - team_value`.
    pub error: f64,
}

/// One-step TD target: `reward + gamma · discount · next_team_value`.
pub fn td_target(reward: f64, gamma: f64, discount: f64, next_team_value: f64) -> f64 {
    reward + gamma * discount * next_team_value
}

/// Evaluates one transition against online and target functions.
///
/// For each agent the bootstrap value is the target function's value of the
/// best legal next action. With `config.double_q` the action is chosen by the
/// online function and valued by the target function. Terminal transitions
/// (`discount == 0`) skip bootstrapping entirely.
///
/// # Errors
///
/// Structural faults (team sizes, per-agent counts, action ranges, no legal
/// next action) and non-finite values are returned unchanged to the caller.
pub fn evaluate_transition<Q, M>(
    online: &Team<Q>,
    target: &Team<Q>,
    mixer: &M,
    transition: &JointTransition,
    config: &VdnConfig,
) -> Result<TransitionEvaluation>
where
    Q: ActionValueFunction,
    M: ValueMixer,
{
    let n = online.len();
    expect_count("target agents", n, target.len())?;
    transition.validate(n)?;

    let chosen_values = online
        .agents()
        .iter()
        .zip(&transition.observations)
        .zip(&transition.actions)
        .map(|((agent, obs), &action)| agent.value_of(obs, action))
        .collect::<Result<Vec<_>>>()?;
    let team_value = ensure_finite(|| "team value".to_string(), mixer.mix(&chosen_values)?)?;

    let (bootstrap_values, next_team_value) = if transition.is_terminal() {
        (Vec::new(), 0.0)
    } else {
        let bootstrap = bootstrap_values(online, target, transition, config.double_q)?;
        let next = ensure_finite(|| "next team value".to_string(), mixer.mix(&bootstrap)?)?;
        (bootstrap, next)
    };

    let target_value = td_target(
        transition.reward,
        config.discount,
        transition.discount,
        next_team_value,
    );
    ensure_finite(|| "team target".to_string(), target_value)?;
    let error = ensure_finite(
        || "team error".to_string(),
        team_error(team_value, target_value),
    )?;

    Ok(TransitionEvaluation {
        chosen_values,
        team_value,
        bootstrap_values,
        target: target_value,
        error,
    })
}

fn bootstrap_values<Q: ActionValueFunction>(
    online: &Team<Q>,
    target: &Team<Q>,
    transition: &JointTransition,
    double_q: bool,
) -> Result<Vec<f64>> {
    online
        .agents()
        .iter()
        .zip(target.agents())
        .zip(&transition.next_observations)
        .enumerate()
        .map(|(i, ((online_agent, target_agent), next_obs))| -> Result<f64> {
            let legal = transition.next_legal_for(i);
            let target_values = target_agent.values(next_obs)?;
            let action = if double_q {
                greedy_action(&online_agent.values(next_obs)?, legal)?
            } else {
                greedy_action(&target_values, legal)?
            };
            Ok(target_values[action])
        })
        .collect()
}
