use stratus_types::Severity;

/// One shell run, written once at startup.
///
/// Identity fields hold whatever was known when the shell came up; empty
/// string stands in for absent values so every column stays NOT NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Session UUID, generated at process start.
    pub sid: String,
    /// Start timestamp, unix milliseconds.
    pub t: i64,
    pub username: String,
    pub apikey: String,
    pub token: String,
    pub region: String,
    pub identity_type: String,
}

/// One executed command, appended after the handler completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    /// Autoincrement row id; insertion order within a session.
    pub id: i64,
    /// Session this command belongs to.
    pub sid: String,
    /// Timestamp, unix milliseconds.
    pub t: i64,
    /// Raw input line as typed.
    pub cmd_in: String,
    /// Packed output column: `retcode|SEVERITY|message`.
    pub cmd_out: String,
}

impl CommandRecord {
    /// Pack return code, severity and message into the stored column form.
    pub fn pack_output(retcode: i64, severity: Severity, msg: &str) -> String {
        format!("{}|{}|{}", retcode, severity, msg)
    }

    /// Split the stored column back into (retcode, severity, message).
    /// Returns None for rows that do not follow the packed form.
    pub fn unpack_output(&self) -> Option<(i64, Severity, &str)> {
        let mut parts = self.cmd_out.splitn(3, '|');
        let retcode = parts.next()?.parse().ok()?;
        let severity = parts.next()?.parse().ok()?;
        let msg = parts.next()?;
        Some((retcode, severity, msg))
    }
}
