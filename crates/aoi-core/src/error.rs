//! Error type shared by every `aoi-*` crate.
//!
//! Variants fall into four groups:
//!
//! - configuration errors, raised when an index is constructed;
//! - invalid-state errors, raised when an operation does not match the node's
//!   lifecycle state (no structural mutation happens);
//! - validation errors, raised for malformed arguments (the call is a no-op);
//! - listener failures, raised after structural mutation has already been
//!   committed and some deliveries may already have happened.

use std::sync::PoisonError;

use thiserror::Error;

use crate::{ListenerError, NodeHandle};

#[derive(Debug, Error)]
pub enum AoiError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0} is already registered")]
    AlreadyRegistered(NodeHandle),

    #[error("{0} is not registered")]
    NotRegistered(NodeHandle),

    #[error("{0} not found")]
    UnknownNode(NodeHandle),

    #[error("node spec has no listener bound")]
    MissingListener,

    #[error("range must be non-negative, got {0}")]
    NegativeRange(f32),

    #[error("invalid argument: {0}")]
    Validation(String),

    #[error("listener for {observer} failed: {source}")]
    Listener {
        observer: NodeHandle,
        #[source]
        source: ListenerError,
    },

    #[error("index lock poisoned")]
    Poisoned,
}

impl AoiError {
    /// `true` for errors caused by calling an operation in the wrong
    /// lifecycle state.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, AoiError::AlreadyRegistered(_) | AoiError::NotRegistered(_))
    }

    /// `true` for errors caused by a malformed argument.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AoiError::MissingListener | AoiError::NegativeRange(_) | AoiError::Validation(_)
        )
    }
}

impl<T> From<PoisonError<T>> for AoiError {
    fn from(_: PoisonError<T>) -> Self {
        AoiError::Poisoned
    }
}

/// Shorthand result type for all `aoi-*` crates.
pub type AoiResult<T> = Result<T, AoiError>;
