//! Errors reported by the holders

use thiserror::Error;

/// The factory of a holder failed to build the instance.
///
/// Nothing is cached when this happens: the holder stays
/// uninitialized, and the next access runs the factory again.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InitError<E> {
    /// The factory returned an error
    #[error("singleton construction failed")]
    Construction(#[source] E),
}

impl<E> InitError<E> {
    /// Returns the error produced by the factory
    pub fn into_inner(self) -> E {
        match self {
            Self::Construction(err) => err,
        }
    }
}

/// Result of a fallible access to a holder
pub type InitResult<'a, T, E> = Result<&'a T, InitError<E>>;
