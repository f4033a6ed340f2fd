use serde::Serialize;
use thiserror::Error;

/// Coarse classification for transport adapters mapping errors to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request itself is unresolvable; retrying it cannot succeed.
    BadRequest,
    /// The upstream listing source failed; the same request may succeed later.
    Unavailable,
}

/// Clone + PartialEq so a shared in-flight fetch failure can fan out to every
/// waiter and tests can assert on the exact variant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("Unknown console: {0}")]
    UnknownConsole(String),
    #[error("Unknown category \"{category}\" for console {console}")]
    UnknownCategory { console: String, category: String },
    /// Display stays generic; the underlying cause is logged at the fetch
    /// site and kept here for Debug output only.
    #[error("Thumbnail listing temporarily unavailable, try again later")]
    ListingUnavailable { reason: String },
}

impl ResolveError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ResolveError::UnknownConsole(_) | ResolveError::UnknownCategory { .. } => {
                ErrorClass::BadRequest
            }
            ResolveError::ListingUnavailable { .. } => ErrorClass::Unavailable,
        }
    }
}

impl Serialize for ResolveError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
