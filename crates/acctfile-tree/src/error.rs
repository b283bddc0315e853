//! Errors that stop a parse.

use std::fmt;
use std::io;

use acctfile_parse::FormatError;

/// Why a parse stopped.
#[derive(Debug)]
pub enum Error {
    /// The input broke a grammar rule (strict mode only).
    Format(FormatError),
    /// The line source failed.
    Io(io::Error),
    /// The event stream broke an invariant the builder relies on.
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Format(err) => write!(f, "{err}"),
            Error::Io(err) => write!(f, "failed to read input: {err}"),
            Error::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Format(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Internal(_) => None,
        }
    }
}

impl From<FormatError> for Error {
    fn from(err: FormatError) -> Self {
        Error::Format(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
