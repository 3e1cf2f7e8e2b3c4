//! Error types for the view engine.

use thiserror::Error;

/// Errors raised while building view configuration.
///
/// Recomputing a view never fails: malformed field values degrade to
/// neutral values instead. These errors only come from constructing
/// configuration that can never be valid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// A field path was empty or contained an empty segment.
    #[error("invalid field path '{0}'")]
    InvalidFieldPath(String),

    /// A page size of zero was requested.
    #[error("page size must be positive, got {0}")]
    InvalidPageSize(usize),

    /// A value kind name was not one of `number`, `date`, `string`.
    #[error("unknown value kind '{0}' (expected number, date or string)")]
    UnknownValueKind(String),

    /// A sort direction name was not `asc` or `desc`.
    #[error("unknown sort direction '{0}' (expected asc or desc)")]
    UnknownDirection(String),
}

/// Result type for view engine operations.
pub type Result<T> = std::result::Result<T, ViewError>;
