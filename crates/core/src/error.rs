//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Externally visible error category.
///
/// This is the contract callers program against: a failed operation carries
/// exactly one of these kinds. Everything that is not an identity failure or
/// a missing entity collapses into `Conflict`, and every `Conflict` is safe
/// to retry from scratch (no partial state is left behind).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Identity could not be established from the supplied credential.
    Unauthorized,
    /// A referenced entity does not exist.
    NotFound,
    /// Business-state, authorization-role, or persistence contention failure.
    Conflict,
}

/// Domain-level error.
///
/// Variants are kept finer-grained than `ErrorKind` so logs and tests can
/// tell a stale version from a wrong role from a storage outage; `kind()`
/// performs the lossy collapse at the service boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Identity cannot be established from the supplied credential.
    #[error("unauthorized")]
    Unauthorized,

    /// A referenced entity was not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A recognized actor lacks the role required for the operation.
    #[error("role invalid: {0}")]
    RoleInvalid(String),

    /// The target aggregate is not in a state that permits the operation.
    #[error("state invalid: {0}")]
    StateInvalid(String),

    /// A monetary amount failed validation.
    #[error("amount invalid: {0}")]
    AmountInvalid(String),

    /// Optimistic concurrency check failed (stale version token).
    #[error("version conflict: {0}")]
    VersionConflict(String),

    /// Unclassified persistence failure.
    #[error("storage failure: {0}")]
    Storage(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn role_invalid(msg: impl Into<String>) -> Self {
        Self::RoleInvalid(msg.into())
    }

    pub fn state_invalid(msg: impl Into<String>) -> Self {
        Self::StateInvalid(msg.into())
    }

    pub fn amount_invalid(msg: impl Into<String>) -> Self {
        Self::AmountInvalid(msg.into())
    }

    pub fn version_conflict(msg: impl Into<String>) -> Self {
        Self::VersionConflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Collapse into the externally visible category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Unauthorized => ErrorKind::Unauthorized,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::RoleInvalid(_)
            | DomainError::StateInvalid(_)
            | DomainError::AmountInvalid(_)
            | DomainError::VersionConflict(_)
            | DomainError::Storage(_)
            | DomainError::Validation(_) => ErrorKind::Conflict,
        }
    }
}
