pub mod args;
pub mod error;
pub mod params;
pub mod severity;

pub use args::{ParsedArgs, parse_line};
pub use error::{Error, Result};
pub use params::{ParamSpec, check_params};
pub use severity::Severity;
