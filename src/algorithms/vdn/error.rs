use thiserror::Error;

use crate::Id;

/// Convenience alias used throughout the VDN module.
pub type Result<T> = std::result::Result<T, DecompositionError>;

/// Errors raised while decomposing or training on joint values.
///
/// None of these are transient: they signal a bug in whatever produced the
/// data (orchestration, environment wrapper, numerics) and are never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecompositionError {
    #[error("Invalid team composition: {0}")]
    InvalidTeamComposition(#[from] CompositionFault),

    #[error("Non-finite {context}: {value}")]
    NonFiniteValue { context: String, value: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DecompositionError {
    pub(crate) fn non_finite(context: impl Into<String>, value: f64) -> Self {
        DecompositionError::NonFiniteValue {
            context: context.into(),
            value,
        }
    }
}

/// Structural mismatch between the team and the per-agent data provided.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompositionFault {
    #[error("team has no agents")]
    EmptyTeam,

    #[error("expected {expected} per-agent {field}, found {found}")]
    CountMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("agent id appears more than once: {0}")]
    DuplicateAgent(Id),

    #[error("action {action} out of range for agent {agent} ({num_actions} actions)")]
    ActionOutOfRange {
        agent: Id,
        action: usize,
        num_actions: usize,
    },

    #[error("no legal actions available")]
    NoLegalActions,

    #[error("batch contains no transitions")]
    EmptyBatch,
}

/// Fails with [`CompositionFault::CountMismatch`] unless `found == expected`.
pub(crate) fn expect_count(field: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(CompositionFault::CountMismatch {
            field,
            expected,
            found,
        }
        .into())
    }
}

/// Fails with [`DecompositionError::NonFiniteValue`] for NaN or infinite values.
pub(crate) fn ensure_finite(context: impl FnOnce() -> String, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DecompositionError::non_finite(context(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_team_display() {
        let e = DecompositionError::from(CompositionFault::EmptyTeam);
        assert_eq!(e.to_string(), "Invalid team composition: team has no agents");
    }

    #[test]
    fn count_mismatch_display() {
        let e = DecompositionError::from(CompositionFault::CountMismatch {
            field: "observations",
            expected: 3,
            found: 2,
        });
        assert_eq!(
            e.to_string(),
            "Invalid team composition: expected 3 per-agent observations, found 2"
        );
    }

    #[test]
    fn action_out_of_range_display() {
        let e = CompositionFault::ActionOutOfRange {
            agent: "agent_0".to_string(),
            action: 7,
            num_actions: 4,
        };
        assert_eq!(
            e.to_string(),
            "action 7 out of range for agent agent_0 (4 actions)"
        );
    }

    #[test]
    fn non_finite_display() {
        let e = DecompositionError::non_finite("action value at position 1", f64::INFINITY);
        assert_eq!(e.to_string(), "Non-finite action value at position 1: inf");
    }

    #[test]
    fn expect_count_accepts_match() {
        assert!(expect_count("actions", 2, 2).is_ok());
        assert!(matches!(
            expect_count("actions", 2, 3),
            Err(DecompositionError::InvalidTeamComposition(
                CompositionFault::CountMismatch { found: 3, .. }
            ))
        ));
    }

    #[test]
    fn ensure_finite_rejects_nan() {
        assert_eq!(ensure_finite(|| "x".into(), 1.5), Ok(1.5));
        assert!(matches!(
            ensure_finite(|| "x".into(), f64::NAN),
            Err(DecompositionError::NonFiniteValue { .. })
        ));
    }
}
