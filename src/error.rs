//! Error types for day-cycle lookups and table construction.

use thiserror::Error;

use crate::constants::MAX_TURNS_PER_DAY;

/// Errors raised by the day segment table.
///
/// `TurnOutOfRange` means the world state handed over a turn outside the
/// configured day. Turns are never clamped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DayCycleError {
    /// Turn number outside `[0, turns_per_day)`
    #[error("turn {turn} out of range for a {turns_per_day}-turn day")]
    TurnOutOfRange {
        /// The offending turn number
        turn: i32,
        /// Configured day length
        turns_per_day: u32,
    },

    /// Day length of zero or above [`MAX_TURNS_PER_DAY`]
    #[error("day length {turns_per_day} outside 1..={max}", max = MAX_TURNS_PER_DAY)]
    InvalidDayLength {
        /// The rejected day length
        turns_per_day: u32,
    },

    /// Segment table does not cover every turn of the day exactly once
    #[error("invalid day segment table: {reason}")]
    InvalidTable {
        /// Description of what is wrong with the table
        reason: String,
    },
}

impl DayCycleError {
    /// Create an invalid table error with a reason.
    pub fn invalid_table(reason: impl Into<String>) -> Self {
        Self::InvalidTable {
            reason: reason.into(),
        }
    }
}
