//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`NotFound`] thrown when a group, a user or a named group is missing.
//! - [`Validation`] thrown when a request breaks a domain rule (payer not a
//!   member, empty description, non-positive amount, ...).
//! - [`SplitMembers`] thrown when percentage splits do not cover exactly the
//!   current members of the group.
//! - [`InvalidPolicy`] thrown for unknown split policies and for equal splits
//!   over an empty member set.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`Validation`]: EngineError::Validation
//!  [`SplitMembers`]: EngineError::SplitMembers
//!  [`InvalidPolicy`]: EngineError::InvalidPolicy
use sea_orm::DbErr;
use thiserror::Error;

use crate::UserId;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Holds the full message, e.g. `group 3 not found`.
    #[error("{0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("splits must match group members: missing {missing:?}, unexpected {unexpected:?}")]
    SplitMembers {
        missing: Vec<UserId>,
        unexpected: Vec<UserId>,
    },
    #[error("Invalid split policy: {0}")]
    InvalidPolicy(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for every error caused by the request content rather
    /// than by missing rows or storage failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::SplitMembers { .. })
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (
                Self::SplitMembers {
                    missing: a_missing,
                    unexpected: a_unexpected,
                },
                Self::SplitMembers {
                    missing: b_missing,
                    unexpected: b_unexpected,
                },
            ) => a_missing == b_missing && a_unexpected == b_unexpected,
            (Self::InvalidPolicy(a), Self::InvalidPolicy(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
