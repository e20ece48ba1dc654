//! Centralized VDN trainer.
//!
//! Sees every agent's values during training, mixes them into team values,
//! and pushes the single team-level update signal back into each agent's
//! local function. Execution afterwards only needs each agent's own function.

use tracing::{debug, info, trace};

use super::targets::{evaluate_transition, TransitionEvaluation};
use crate::algorithms::vdn::agent::{ActionValueFunction, LearnableValues, Team};
use crate::algorithms::vdn::config::VdnConfig;
use crate::algorithms::vdn::decomposer::AdditiveMixer;
use crate::algorithms::vdn::error::{expect_count, CompositionFault, Result};
use crate::algorithms::vdn::transition::JointTransition;
use crate::algorithms::ValueMixer;

/// Outcome of evaluating (and possibly applying) one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingStep {
    /// Mean loss over the batch.
    pub loss: f64,
    /// Per-transition evaluations, in batch order.
    pub evaluations: Vec<TransitionEvaluation>,
    /// Per-transition team update signal (after clipping).
    pub update_signals: Vec<f64>,
    /// Whether the target functions were refreshed after this step.
    pub target_synced: bool,
}

impl TrainingStep {
    /// Team values of the batch, in order.
    pub fn team_values(&self) -> Vec<f64> {
        self.evaluations.iter().map(|e| e.team_value).collect()
    }

    /// Team errors of the batch, in order.
    pub fn errors(&self) -> Vec<f64> {
        self.evaluations.iter().map(|e| e.error).collect()
    }
}

/// Centralized trainer holding online and target functions for a team.
///
/// # Lifecycle
///
/// 1. Build a [`Team`] and call [`VdnTrainer::new`]; the target team starts
///    as a copy of the online team.
/// 2. Feed batches of [`JointTransition`]s to [`VdnTrainer::train`].
/// 3. Every `target_update_period` steps the target team is refreshed.
/// 4. Hand [`VdnTrainer::online`] agents to decentralized execution.
#[derive(Debug)]
pub struct VdnTrainer<Q, M = AdditiveMixer> {
    online: Team<Q>,
    target: Team<Q>,
    mixer: M,
    config: VdnConfig,
    steps: u64,
}

impl<Q> VdnTrainer<Q, AdditiveMixer>
where
    Q: ActionValueFunction + Clone,
{
    /// Creates a trainer using additive (VDN) mixing.
    pub fn new(team: Team<Q>, config: VdnConfig) -> Result<Self> {
        Self::with_mixer(team, AdditiveMixer, config)
    }
}

impl<Q, M> VdnTrainer<Q, M>
where
    Q: ActionValueFunction + Clone,
    M: ValueMixer,
{
    /// Creates a trainer with an explicit mixer.
    pub fn with_mixer(team: Team<Q>, mixer: M, config: VdnConfig) -> Result<Self> {
        config.validate()?;
        let target = team.clone();
        Ok(Self {
            online: team,
            target,
            mixer,
            config,
            steps: 0,
        })
    }

    /// Online team (used for acting and updated by training).
    pub fn online(&self) -> &Team<Q> {
        &self.online
    }

    /// Target team (used for bootstrapping).
    pub fn target(&self) -> &Team<Q> {
        &self.target
    }

    /// Training configuration.
    pub fn config(&self) -> &VdnConfig {
        &self.config
    }

    /// Number of completed training steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Consumes the trainer and returns the online team.
    pub fn into_online(self) -> Team<Q> {
        self.online
    }

    /// Copies the online functions into the target functions.
    pub fn sync_target(&mut self) {
        self.target = self.online.clone();
    }

    /// Computes targets, errors, loss and update signals without changing
    /// anything.
    ///
    /// # Errors
    ///
    /// [`CompositionFault::EmptyBatch`] for an empty batch; otherwise the first
    /// error raised by any transition.
    pub fn evaluate(&self, batch: &[JointTransition]) -> Result<TrainingStep> {
        if batch.is_empty() {
            return Err(CompositionFault::EmptyBatch.into());
        }

        let evaluations = batch
            .iter()
            .map(|t| evaluate_transition(&self.online, &self.target, &self.mixer, t, &self.config))
            .collect::<Result<Vec<_>>>()?;

        let loss = evaluations
            .iter()
            .map(|e| self.config.loss.loss(e.error))
            .sum::<f64>()
            / evaluations.len() as f64;

        let update_signals = evaluations
            .iter()
            .map(|e| self.clip(self.config.loss.update_signal(e.error)))
            .collect();

        Ok(TrainingStep {
            loss,
            evaluations,
            update_signals,
            target_synced: false,
        })
    }

    fn clip(&self, signal: f64) -> f64 {
        match self.config.max_update_magnitude {
            Some(max) => signal.clamp(-max, max),
            None => signal,
        }
    }
}

impl<Q, M> VdnTrainer<Q, M>
where
    Q: LearnableValues + Clone,
    M: ValueMixer,
{
    /// Runs one training step on a batch.
    ///
    /// The whole batch is evaluated before any function is touched. Each
    /// agent's online function then receives, for every transition, the team
    /// update signal weighted by the mixer's credit for that agent (1 for
    /// additive mixing).
    pub fn train(&mut self, batch: &[JointTransition]) -> Result<TrainingStep> {
        let mut step = self.evaluate(batch)?;

        let credits = step
            .evaluations
            .iter()
            .map(|e| -> Result<Vec<f64>> {
                let credit = self.mixer.credit(&e.chosen_values);
                expect_count("mixer credits", e.chosen_values.len(), credit.len())?;
                Ok(credit)
            })
            .collect::<Result<Vec<_>>>()?;

        for ((transition, credit), &signal) in
            batch.iter().zip(&credits).zip(&step.update_signals)
        {
            for (i, agent) in self.online.agents_mut().iter_mut().enumerate() {
                let weighted = credit[i] * signal;
                trace!(agent = %agent.id, action = transition.actions[i], weighted, "agent update");
                agent
                    .q
                    .apply_update(&transition.observations[i], transition.actions[i], weighted);
            }
        }

        self.steps += 1;
        if self.steps % self.config.target_update_period == 0 {
            self.sync_target();
            step.target_synced = true;
            info!(step = self.steps, "target functions synced");
        }

        debug!(
            step = self.steps,
            batch_size = batch.len(),
            loss = step.loss,
            mixer = self.mixer.name(),
            "training step"
        );

        Ok(step)
    }
}
