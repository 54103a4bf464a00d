use crate::set::{SetError, SetId};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by [`crate::SetStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] SetError),

    #[error("Unknown id: {0}")]
    UnknownSet(SetId),

    #[error("Intersection of {0} and {1} is empty")]
    EmptyIntersection(SetId, SetId),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_bad_request(&self) -> bool {
        !matches!(self, StoreError::Storage(_))
    }
}
