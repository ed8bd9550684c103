use std::fmt;

/// Result type for stratus-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required parameter was not supplied and has no default
    MissingParameter(String),
    /// A string did not name a known severity level
    InvalidSeverity(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingParameter(name) => {
                write!(f, "missing mandatory parameter '{}'", name)
            }
            Error::InvalidSeverity(value) => {
                write!(
                    f,
                    "'{}' is not a log level (DEBUG, INFO, WARNING, ERROR, CRITICAL)",
                    value
                )
            }
        }
    }
}

impl std::error::Error for Error {}
