//! Error types for allocation validation.

use std::fmt;

use rm_model::AssignmentId;
use thiserror::Error;

/// A required proposal field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Engineer,
    Project,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engineer => f.write_str("engineer"),
            Self::Project => f.write_str("project"),
        }
    }
}

/// Reasons an allocation is rejected.
///
/// Messages are written to be shown inline next to the rejected input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The engineer or project was not chosen.
    #[error("All fields are required and capacity must be > 0 (missing {0}).")]
    MissingField(Field),

    /// Capacity is zero or negative.
    #[error("All fields are required and capacity must be > 0 (got {0}).")]
    InvalidCapacity(i32),

    /// The engineer's total would exceed 100%.
    #[error("Overbooking! This will exceed 100% ({0}%).")]
    OverCapacity(i32),

    /// The assignment being edited is not in the snapshot.
    #[error("Assignment '{0}' not found.")]
    UnknownAssignment(AssignmentId),
}

impl AllocationError {
    /// Returns true if the rejection is due to overbooking.
    pub fn is_over_capacity(&self) -> bool {
        matches!(self, Self::OverCapacity(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_capacity_message() {
        let err = AllocationError::OverCapacity(110);
        assert_eq!(err.to_string(), "Overbooking! This will exceed 100% (110%).");
        assert!(err.is_over_capacity());
    }

    #[test]
    fn test_missing_field_message_names_field() {
        let err = AllocationError::MissingField(Field::Project);
        assert!(err.to_string().contains("missing project"));
    }
}
