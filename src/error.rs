//! Error types for siteledger.
//!
//! All errors flow through `anyhow`. An `ErrorKind` can be attached as context so that
//! callers (and tests) can classify a failure without string matching.

use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies a failure for reporting purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend is unreachable or the credentials are invalid. Fatal for the current
    /// operation, no retry.
    Connection,
    /// User input was rejected before the store was touched.
    Validation,
    /// A write to the store failed after validation passed. The attempted change is lost
    /// and the store keeps its prior state.
    Persist,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Connection => "connection error",
            ErrorKind::Validation => "validation error",
            ErrorKind::Persist => "persist error",
        };
        write!(f, "{s}")
    }
}

/// Attaches an `ErrorKind` to the error chain of a `Result`.
pub(crate) trait IntoResult<T> {
    fn kind(self, kind: ErrorKind) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn kind(self, kind: ErrorKind) -> Result<T> {
        self.map_err(|e| e.into().context(kind))
    }
}

/// Returns the `ErrorKind` attached to `e`, if any.
pub fn error_kind(e: &Error) -> Option<ErrorKind> {
    e.downcast_ref::<ErrorKind>().copied()
}
