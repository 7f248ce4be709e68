//! Quiz state machines.

pub mod matching;

pub use matching::{MatchingDataset, MatchingError, MatchingPair, MatchingReply, MatchingState};
