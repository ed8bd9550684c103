use rusqlite::Connection;

use crate::Result;

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i32 = 1;

// NOTE: Journal Design Rationale
//
// Why append-only?
// - The journal is an audit trail; entries are never edited or deduplicated,
//   replaying a command yields a new row
// - A session row is written once at startup and never touched again
//
// Why pack retcode/severity into cmd_out?
// - The two-table layout (sessions, commands) is the owned contract of the
//   journal; readers split `retcode|SEVERITY|message` back apart
//
// Why per-call commits (no long transaction)?
// - A shell run is low-volume; losing batching buys crash-safety per command

pub fn init_schema(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version != SCHEMA_VERSION {
        drop_all_tables(conn)?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            sid TEXT PRIMARY KEY,
            t INTEGER NOT NULL,
            username TEXT NOT NULL,
            apikey TEXT NOT NULL,
            token TEXT NOT NULL,
            region TEXT NOT NULL,
            identity_type TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS commands (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sid TEXT NOT NULL,
            t INTEGER NOT NULL,
            cmd_in TEXT NOT NULL,
            cmd_out TEXT NOT NULL,
            FOREIGN KEY (sid) REFERENCES sessions(sid)
        );

        CREATE INDEX IF NOT EXISTS idx_commands_sid ON commands(sid);
        "#,
    )?;

    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}

fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS commands;
        DROP TABLE IF EXISTS sessions;
        "#,
    )?;
    Ok(())
}
