//! Greedy action selection.

use super::trait_::Policy;
use crate::algorithms::vdn::error::{ensure_finite, expect_count, CompositionFault, Result};

/// Index of the highest-valued legal action.
///
/// Ties resolve to the lowest index.
///
/// # Errors
///
/// * [`CompositionFault::NoLegalActions`] if `values` is empty or the mask
///   rules out every action
/// * [`CompositionFault::CountMismatch`] if the mask length differs from
///   `values.len()`
/// * `NonFiniteValue` if a legal action's value is NaN or infinite
pub fn greedy_action(values: &[f64], legal: Option<&[bool]>) -> Result<usize> {
    if let Some(mask) = legal {
        expect_count("legal-action flags", values.len(), mask.len())?;
    }

    let mut best: Option<(usize, f64)> = None;
    for (a, &v) in values.iter().enumerate() {
        if legal.is_some_and(|mask| !mask[a]) {
            continue;
        }
        ensure_finite(|| format!("action value for action {}", a), v)?;
        match best {
            Some((_, best_v)) if v <= best_v => {}
            _ => best = Some((a, v)),
        }
    }

    best.map(|(a, _)| a)
        .ok_or_else(|| CompositionFault::NoLegalActions.into())
}

/// Highest legal action-value (the greedy bootstrap value).
pub fn greedy_value(values: &[f64], legal: Option<&[bool]>) -> Result<f64> {
    greedy_action(values, legal).map(|a| values[a])
}

/// Always picks the greedy action.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn select_action(&mut self, values: &[f64], legal: Option<&[bool]>) -> Result<usize> {
        greedy_action(values, legal)
    }

    fn name(&self) -> &str {
        "greedy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::vdn::DecompositionError;

    #[test]
    fn picks_maximum() {
        assert_eq!(greedy_action(&[0.1, 0.7, -2.0], None), Ok(1));
        assert_eq!(greedy_value(&[0.1, 0.7, -2.0], None), Ok(0.7));
    }

    #[test]
    fn ties_go_to_lowest_index() {
        assert_eq!(greedy_action(&[1.0, 3.0, 3.0], None), Ok(1));
    }

    #[test]
    fn respects_legal_mask() {
        let mask = [true, false, true];
        assert_eq!(greedy_action(&[0.0, 9.0, 1.0], Some(&mask[..])), Ok(2));
    }

    #[test]
    fn illegal_nan_is_ignored() {
        let mask = [true, false];
        assert_eq!(greedy_action(&[0.0, f64::NAN], Some(&mask[..])), Ok(0));
        assert!(matches!(
            greedy_action(&[0.0, f64::NAN], None),
            Err(DecompositionError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn no_legal_actions_is_an_error() {
        assert_eq!(
            greedy_action(&[1.0, 2.0], Some(&[false, false][..])),
            Err(DecompositionError::InvalidTeamComposition(
                CompositionFault::NoLegalActions
            ))
        );
        assert!(greedy_action(&[], None).is_err());
    }

    #[test]
    fn mask_length_must_match() {
        assert!(matches!(
            greedy_action(&[1.0, 2.0], Some(&[true][..])),
            Err(DecompositionError::InvalidTeamComposition(
                CompositionFault::CountMismatch { .. }
            ))
        ));
    }

    #[test]
    fn greedy_policy_delegates() {
        let mut policy = GreedyPolicy;
        assert_eq!(policy.select_action(&[3.0, 4.0], None), Ok(1));
        assert_eq!(policy.name(), "greedy");
    }
}
