use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use stratus_types::Severity;

use crate::records::{CommandRecord, SessionRecord};
use crate::schema;
use crate::Result;

/// Handle to the on-disk journal. Every write commits immediately; the
/// connection never holds a long-lived transaction.
pub struct Journal {
    conn: Connection,
}

impl Journal {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let journal = Self { conn };
        journal.init_schema()?;
        Ok(journal)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let journal = Self { conn };
        journal.init_schema()?;
        Ok(journal)
    }

    pub fn init_schema(&self) -> Result<()> {
        schema::init_schema(&self.conn)
    }

    /// Persist the session row. Sessions are immutable: inserting the same
    /// sid twice is a constraint violation, not an update.
    pub fn record_session(&self, session: &SessionRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO sessions (sid, t, username, apikey, token, region, identity_type)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                &session.sid,
                &session.t,
                &session.username,
                &session.apikey,
                &session.token,
                &session.region,
                &session.identity_type
            ],
        )?;

        Ok(())
    }

    /// Append one command entry; returns the new row id.
    pub fn record_command(
        &self,
        sid: &str,
        cmd_in: &str,
        retcode: i64,
        severity: Severity,
        msg: &str,
    ) -> Result<i64> {
        let t = chrono::Utc::now().timestamp_millis();
        let cmd_out = CommandRecord::pack_output(retcode, severity, msg);
        self.conn.execute(
            r#"
            INSERT INTO commands (sid, t, cmd_in, cmd_out)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![sid, t, cmd_in, &cmd_out],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_session(&self, sid: &str) -> Result<Option<SessionRecord>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT sid, t, username, apikey, token, region, identity_type
                FROM sessions
                WHERE sid = ?1
                "#,
                [sid],
                |row| {
                    Ok(SessionRecord {
                        sid: row.get(0)?,
                        t: row.get(1)?,
                        username: row.get(2)?,
                        apikey: row.get(3)?,
                        token: row.get(4)?,
                        region: row.get(5)?,
                        identity_type: row.get(6)?,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    /// Entries for one session in insertion order.
    pub fn list_commands(&self, sid: &str) -> Result<Vec<CommandRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, sid, t, cmd_in, cmd_out
            FROM commands
            WHERE sid = ?1
            ORDER BY id
            "#,
        )?;

        let commands = stmt
            .query_map([sid], |row| {
                Ok(CommandRecord {
                    id: row.get(0)?,
                    sid: row.get(1)?,
                    t: row.get(2)?,
                    cmd_in: row.get(3)?,
                    cmd_out: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(commands)
    }

    /// All recorded sessions, oldest first.
    pub fn list_sessions(&self) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT sid, t, username, apikey, token, region, identity_type
            FROM sessions
            ORDER BY t, sid
            "#,
        )?;

        let sessions = stmt
            .query_map([], |row| {
                Ok(SessionRecord {
                    sid: row.get(0)?,
                    t: row.get(1)?,
                    username: row.get(2)?,
                    apikey: row.get(3)?,
                    token: row.get(4)?,
                    region: row.get(5)?,
                    identity_type: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    pub fn count_sessions(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Quick probe used at startup to fail early on an unusable database.
    pub fn check(&self) -> Result<()> {
        self.count_sessions().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session(sid: &str) -> SessionRecord {
        SessionRecord {
            sid: sid.to_string(),
            t: chrono::Utc::now().timestamp_millis(),
            username: "ops".to_string(),
            apikey: String::new(),
            token: String::new(),
            region: "LON".to_string(),
            identity_type: "keystone".to_string(),
        }
    }

    #[test]
    fn test_schema_initialization() {
        let journal = Journal::open_in_memory().unwrap();
        assert_eq!(journal.count_sessions().unwrap(), 0);
    }

    #[test]
    fn test_session_round_trip_with_empty_fields() {
        let journal = Journal::open_in_memory().unwrap();
        journal.record_session(&sample_session("sid-1")).unwrap();

        let stored = journal.get_session("sid-1").unwrap().unwrap();
        assert_eq!(stored.username, "ops");
        assert_eq!(stored.apikey, "");
        assert_eq!(stored.region, "LON");
    }

    #[test]
    fn test_session_rows_are_immutable() {
        let journal = Journal::open_in_memory().unwrap();
        journal.record_session(&sample_session("sid-1")).unwrap();
        assert!(journal.record_session(&sample_session("sid-1")).is_err());
    }

    #[test]
    fn test_two_commands_share_session_in_order() {
        let journal = Journal::open_in_memory().unwrap();
        journal.record_session(&sample_session("sid-1")).unwrap();

        journal
            .record_command("sid-1", "servers list", 0, Severity::Info, "1 server")
            .unwrap();
        journal
            .record_command("sid-1", "servers delete id:x", 1, Severity::Error, "no such server")
            .unwrap();

        let commands = journal.list_commands("sid-1").unwrap();
        assert_eq!(commands.len(), 2);
        assert!(commands[0].id < commands[1].id);
        assert_eq!(commands[0].cmd_in, "servers list");
        assert_eq!(
            commands[1].unpack_output(),
            Some((1, Severity::Error, "no such server"))
        );
    }

    #[test]
    fn test_replayed_commands_are_not_deduplicated() {
        let journal = Journal::open_in_memory().unwrap();
        journal.record_session(&sample_session("sid-1")).unwrap();

        for _ in 0..3 {
            journal
                .record_command("sid-1", "servers list", 0, Severity::Info, "1 server")
                .unwrap();
        }

        assert_eq!(journal.list_commands("sid-1").unwrap().len(), 3);
    }

    #[test]
    fn test_list_sessions_oldest_first() {
        let journal = Journal::open_in_memory().unwrap();
        let mut older = sample_session("sid-older");
        older.t -= 1000;
        journal.record_session(&sample_session("sid-newer")).unwrap();
        journal.record_session(&older).unwrap();

        let sessions = journal.list_sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].sid, "sid-older");
        assert_eq!(sessions[1].sid, "sid-newer");
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.db");

        {
            let journal = Journal::open(&path).unwrap();
            journal.record_session(&sample_session("sid-1")).unwrap();
            journal
                .record_command("sid-1", "dns list", 0, Severity::Info, "1 domain")
                .unwrap();
        }

        let reopened = Journal::open(&path).unwrap();
        assert_eq!(reopened.count_sessions().unwrap(), 1);
        assert_eq!(reopened.list_commands("sid-1").unwrap().len(), 1);
    }
}
