//! Ordering state for matching quizzes.
//!
//! A matching exercise pairs fixed prompts with reorderable options. The
//! state here is what the exercise screen drives: the displayed option
//! order, the permutation it encodes, and whether a submission has locked
//! the rows.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error types for matching quiz state.
#[derive(Debug, Error)]
pub enum MatchingError {
    /// Reply ordering length does not match the dataset
    #[error("Invalid ordering length: expected {expected}, got {got}")]
    InvalidOrdering { expected: usize, got: usize },

    /// Reply ordering references an option outside the dataset
    #[error("Ordering index {index} out of range for {len} options")]
    IndexOutOfRange { index: usize, len: usize },
}

/// One prompt/option pair of a matching dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingPair {
    pub prompt: String,
    pub option: String,
}

impl MatchingPair {
    pub fn new(prompt: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            option: option.into(),
        }
    }
}

/// The dataset of a matching attempt. Pair order is the attempt order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingDataset {
    pub pairs: Vec<MatchingPair>,
}

impl MatchingDataset {
    pub fn new(pairs: Vec<MatchingPair>) -> Self {
        Self { pairs }
    }

    /// Fixed prompts, in attempt order.
    pub fn prompts(&self) -> Vec<&str> {
        self.pairs.iter().map(|p| p.prompt.as_str()).collect()
    }

    /// Movable options, in attempt order.
    pub fn options(&self) -> Vec<&str> {
        self.pairs.iter().map(|p| p.option.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A submitted (or to-be-submitted) option ordering.
///
/// `ordering[row]` is the attempt index of the option displayed at `row`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingReply {
    pub ordering: Vec<usize>,
}

/// Reorderable option state for one matching attempt.
#[derive(Debug, Clone)]
pub struct MatchingState {
    ordered_options: Vec<String>,
    permutation: Vec<usize>,
    locked: bool,
}

impl MatchingState {
    /// Fresh state for an attempt: options in dataset order, identity
    /// permutation, rows movable.
    pub fn from_attempt(dataset: &MatchingDataset) -> Self {
        Self {
            ordered_options: dataset.pairs.iter().map(|p| p.option.clone()).collect(),
            permutation: (0..dataset.pairs.len()).collect(),
            locked: false,
        }
    }

    /// Apply a previous submission: each row shows the option its ordering
    /// entry names, and the rows lock until the submission is cleared.
    ///
    /// An ordering that does not fit the dataset leaves the state unchanged.
    pub fn apply_submission(
        &mut self,
        dataset: &MatchingDataset,
        reply: &MatchingReply,
    ) -> Result<(), MatchingError> {
        let options = dataset.options();

        if reply.ordering.len() != options.len() {
            return Err(MatchingError::InvalidOrdering {
                expected: options.len(),
                got: reply.ordering.len(),
            });
        }
        if let Some(&index) = reply.ordering.iter().find(|&&o| o >= options.len()) {
            return Err(MatchingError::IndexOutOfRange {
                index,
                len: options.len(),
            });
        }

        self.ordered_options = reply
            .ordering
            .iter()
            .map(|&o| options[o].to_string())
            .collect();
        self.permutation = reply.ordering.clone();
        self.locked = true;
        Ok(())
    }

    /// Drop the submission: back to the attempt ordering, rows movable.
    pub fn clear_submission(&mut self, dataset: &MatchingDataset) {
        *self = Self::from_attempt(dataset);
    }

    /// Move the option at `from` so it sits at `to`, keeping the
    /// permutation in step. Ignored while locked or out of range.
    pub fn move_option(&mut self, from: usize, to: usize) {
        if self.locked {
            debug!(from, to, "Ignoring move on locked matching state");
            return;
        }
        if from >= self.ordered_options.len() || to >= self.ordered_options.len() {
            debug!(from, to, "Ignoring out-of-range matching move");
            return;
        }

        let moving_option = self.ordered_options.remove(from);
        self.ordered_options.insert(to, moving_option);

        let moving_index = self.permutation.remove(from);
        self.permutation.insert(to, moving_index);
    }

    /// The reply the current ordering encodes.
    pub fn reply(&self) -> MatchingReply {
        MatchingReply {
            ordering: self.permutation.clone(),
        }
    }

    /// Options in display order.
    pub fn options(&self) -> &[String] {
        &self.ordered_options
    }

    /// Whether an applied submission is locking the rows.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> MatchingDataset {
        MatchingDataset::new(vec![
            MatchingPair::new("France", "Paris"),
            MatchingPair::new("Italy", "Rome"),
            MatchingPair::new("Spain", "Madrid"),
        ])
    }

    #[test]
    fn test_from_attempt_is_identity() {
        let data = dataset();
        let state = MatchingState::from_attempt(&data);

        assert_eq!(data.len(), 3);
        assert!(!data.is_empty());
        assert_eq!(data.prompts(), vec!["France", "Italy", "Spain"]);
        assert_eq!(state.options(), &["Paris", "Rome", "Madrid"]);
        assert_eq!(state.reply().ordering, vec![0, 1, 2]);
        assert!(!state.is_locked());
    }

    #[test]
    fn test_move_option_keeps_permutation_in_step() {
        let mut state = MatchingState::from_attempt(&dataset());

        // Drag "Madrid" to the top.
        state.move_option(2, 0);

        assert_eq!(state.options(), &["Madrid", "Paris", "Rome"]);
        assert_eq!(state.reply().ordering, vec![2, 0, 1]);
    }

    #[test]
    fn test_out_of_range_move_is_ignored() {
        let mut state = MatchingState::from_attempt(&dataset());
        state.move_option(0, 9);
        state.move_option(9, 0);

        assert_eq!(state.reply().ordering, vec![0, 1, 2]);
    }

    #[test]
    fn test_apply_submission_reorders_and_locks() {
        let dataset = dataset();
        let mut state = MatchingState::from_attempt(&dataset);

        state
            .apply_submission(&dataset, &MatchingReply { ordering: vec![1, 2, 0] })
            .unwrap();

        assert_eq!(state.options(), &["Rome", "Madrid", "Paris"]);
        assert_eq!(state.reply().ordering, vec![1, 2, 0]);
        assert!(state.is_locked());

        // Locked rows do not move.
        state.move_option(0, 2);
        assert_eq!(state.options(), &["Rome", "Madrid", "Paris"]);
    }

    #[test]
    fn test_apply_submission_rejects_bad_orderings() {
        let dataset = dataset();
        let mut state = MatchingState::from_attempt(&dataset);

        let too_short = state.apply_submission(&dataset, &MatchingReply { ordering: vec![0, 1] });
        assert!(matches!(
            too_short,
            Err(MatchingError::InvalidOrdering { expected: 3, got: 2 })
        ));

        let out_of_range =
            state.apply_submission(&dataset, &MatchingReply { ordering: vec![0, 1, 7] });
        assert!(matches!(
            out_of_range,
            Err(MatchingError::IndexOutOfRange { index: 7, len: 3 })
        ));

        // Failed applications leave the state untouched and unlocked.
        assert_eq!(state.options(), &["Paris", "Rome", "Madrid"]);
        assert!(!state.is_locked());
    }

    #[test]
    fn test_clear_submission_restores_attempt_order() {
        let dataset = dataset();
        let mut state = MatchingState::from_attempt(&dataset);

        state
            .apply_submission(&dataset, &MatchingReply { ordering: vec![2, 1, 0] })
            .unwrap();
        state.clear_submission(&dataset);

        assert_eq!(state.options(), &["Paris", "Rome", "Madrid"]);
        assert_eq!(state.reply().ordering, vec![0, 1, 2]);
        assert!(!state.is_locked());
    }
}
