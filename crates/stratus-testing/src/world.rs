//! ShellWorld pattern for isolated shell integration tests.
//!
//! Each world owns a throwaway shell home wired in through the
//! `STRATUS_HOME` environment variable, so tests never touch the real
//! `~/.stratus` and never see each other's journals.

use anyhow::Result;
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use stratus_journal::Journal;
use tempfile::TempDir;

/// Isolated test environment for driving the stratus binary.
///
/// # Example
/// ```no_run
/// use stratus_testing::ShellWorld;
///
/// let world = ShellWorld::initialized();
/// let result = world.run_script("servers list\nexit\n", &[]).unwrap();
/// assert!(result.success());
/// ```
pub struct ShellWorld {
    temp_dir: TempDir,
    home: PathBuf,
}

impl Default for ShellWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellWorld {
    /// Create a new isolated environment. The shell home does not exist
    /// yet, so the next invocation is a first run.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let home = temp_dir.path().join(".stratus");
        Self { temp_dir, home }
    }

    /// Create an environment with the first-run setup already done, so
    /// invocations go straight to the shell.
    pub fn initialized() -> Self {
        let world = Self::new();
        world
            .command()
            .assert()
            .success()
            .stdout(predicates::str::contains("first run"));
        world
    }

    /// Shell home directory (`$STRATUS_HOME`).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Temp directory root backing this world.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.home.join("stratus.db")
    }

    pub fn config_path(&self) -> PathBuf {
        self.home.join("stratus.toml")
    }

    pub fn log_path(&self) -> PathBuf {
        self.home.join("stratus.log")
    }

    /// Replace this world's config file.
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).expect("Failed to write config");
    }

    /// A stratus invocation pointed at this world's home.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("stratus").expect("Failed to find stratus binary");
        cmd.env("STRATUS_HOME", &self.home);
        cmd
    }

    /// Pipe `script` through a shell session and capture the output.
    /// Extra command-line flags go in `args`.
    pub fn run_script(&self, script: &str, args: &[&str]) -> Result<ShellResult> {
        let mut cmd = self.command();
        cmd.args(args);
        cmd.write_stdin(script);

        let output = cmd.output()?;
        Ok(ShellResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Open this world's journal for direct assertions.
    pub fn journal(&self) -> Journal {
        Journal::open(&self.db_path()).expect("Failed to open journal")
    }
}

/// Result of one shell invocation.
#[derive(Debug)]
pub struct ShellResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ShellResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Parse scripting-mode `retcode|message` lines, skipping everything
    /// that does not follow the packed form.
    pub fn packed_lines(&self) -> Vec<(i64, String)> {
        self.stdout
            .lines()
            .filter_map(|line| {
                let (retcode, message) = line.split_once('|')?;
                Some((retcode.parse().ok()?, message.to_string()))
            })
            .collect()
    }
}
