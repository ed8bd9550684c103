// SQLite command journal
// One row per shell session, one row per executed command

mod db;
mod error;
mod records;
mod schema;

// Public API
pub use db::Journal;
pub use error::{Error, Result};
pub use records::{CommandRecord, SessionRecord};
