//! Error types for record parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing identifiers or record fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The identifier string is empty or whitespace.
    #[error("{kind} cannot be empty")]
    EmptyId { kind: &'static str },

    /// The role name is not one of the known roles.
    #[error("unknown role '{0}': expected Manager or Engineer")]
    UnknownRole(String),
}

impl ModelError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, ModelError::EmptyId { .. })
    }
}
