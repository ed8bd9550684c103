use std::fmt;

/// Result type for stratus-shell operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the shell core
#[derive(Debug)]
pub enum Error {
    /// A command with this name is already registered
    DuplicateCommand(String),

    /// Failed to spawn a background thread
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateCommand(name) => {
                write!(f, "command '{}' is already registered", name)
            }
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
