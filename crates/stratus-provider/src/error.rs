use std::fmt;

/// Result type for stratus-provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the provider boundary
#[derive(Debug)]
pub enum Error {
    /// Operation attempted before a successful authenticate call
    NotAuthenticated,

    /// No resource of the given kind with the given identifier
    NotFound { kind: &'static str, id: String },

    /// A resource with the same name already exists
    Conflict(String),

    /// The request was rejected (bad parameter value, unsupported option)
    InvalidRequest(String),

    /// IO operation failed (e.g. reading a local file for upload)
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotAuthenticated => {
                write!(f, "not authenticated, run 'auth login' first")
            }
            Error::NotFound { kind, id } => write!(f, "no {} with id '{}'", kind, id),
            Error::Conflict(msg) => write!(f, "conflict: {}", msg),
            Error::InvalidRequest(msg) => write!(f, "invalid request: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
