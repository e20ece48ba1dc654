//! Tabular action values over discrete observations.

use std::collections::HashMap;

use super::agent::{ActionValueFunction, LearnableValues};

/// Learnable action-value table.
///
/// Observations are keyed by their exact bit pattern, so they should be
/// discrete encodings (state indices, one-hot vectors, ...). Unseen
/// observations read as `initial_value` for every action.
#[derive(Debug, Clone)]
pub struct QTable {
    table: HashMap<Vec<u64>, Vec<f64>>,
    num_actions: usize,
    initial_value: f64,
    learning_rate: f64,
}

impl QTable {
    /// Creates an empty table.
    ///
    /// # Arguments
    ///
    /// * `num_actions` - Size of the discrete action space
    /// * `initial_value` - Value of every unseen (observation, action) pair
    /// * `learning_rate` - Step size applied to update signals
    pub fn new(num_actions: usize, initial_value: f64, learning_rate: f64) -> Self {
        Self {
            table: HashMap::new(),
            num_actions,
            initial_value,
            learning_rate,
        }
    }

    fn key(observation: &[f64]) -> Vec<u64> {
        observation.iter().map(|x| x.to_bits()).collect()
    }

    /// Slot of `Q(observation, action)`, creating the row on first write.
    ///
    /// Returns `None` without touching the table if `action` is out of range.
    fn slot_mut(&mut self, observation: &[f64], action: usize) -> Option<&mut f64> {
        if action >= self.num_actions {
            return None;
        }
        let (n, init) = (self.num_actions, self.initial_value);
        self.table
            .entry(Self::key(observation))
            .or_insert_with(|| vec![init; n])
            .get_mut(action)
    }

    /// Overwrites `Q(observation, action)`. Out-of-range actions are ignored.
    pub fn set(&mut self, observation: &[f64], action: usize, value: f64) {
        if let Some(slot) = self.slot_mut(observation, action) {
            *slot = value;
        }
    }

    /// Number of distinct observations stored.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl ActionValueFunction for QTable {
    fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn action_values(&self, observation: &[f64]) -> Vec<f64> {
        self.table
            .get(&Self::key(observation))
            .cloned()
            .unwrap_or_else(|| vec![self.initial_value; self.num_actions])
    }
}

impl LearnableValues for QTable {
    fn apply_update(&mut self, observation: &[f64], action: usize, signal: f64) {
        let step = self.learning_rate * signal;
        if let Some(slot) = self.slot_mut(observation, action) {
            *slot += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_observation_reads_initial_value() {
        let q = QTable::new(3, 0.5, 0.1);
        assert_eq!(q.action_values(&[1.0, 2.0]), vec![0.5, 0.5, 0.5]);
        assert!(q.is_empty());
    }

    #[test]
    fn update_moves_value_by_learning_rate() {
        let mut q = QTable::new(2, 0.0, 0.5);
        q.apply_update(&[1.0], 1, 2.0);
        assert_eq!(q.action_values(&[1.0]), vec![0.0, 1.0]);
        assert_eq!(q.action_values(&[0.0]), vec![0.0, 0.0]);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn set_and_out_of_range_are_ignored_safely() {
        let mut q = QTable::new(2, 0.0, 1.0);
        q.set(&[0.0], 0, 3.0);
        q.set(&[0.0], 5, 9.0);
        q.apply_update(&[0.0], 7, 1.0);
        assert_eq!(q.action_values(&[0.0]), vec![3.0, 0.0]);
    }

    #[test]
    fn out_of_range_writes_do_not_create_rows() {
        let mut q = QTable::new(2, 0.0, 1.0);
        q.set(&[1.0], 2, 9.0);
        q.apply_update(&[2.0], 3, 1.0);
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
    }
}
