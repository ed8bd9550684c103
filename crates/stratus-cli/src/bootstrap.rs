use anyhow::Result;
use std::path::{Path, PathBuf};
use stratus_journal::Journal;

use crate::config::Config;

pub const DB_FILE: &str = "stratus.db";
pub const CONFIG_FILE: &str = "stratus.toml";
pub const LOG_FILE: &str = "stratus.log";

/// Resolve the shell home directory.
///
/// Priority: explicit `--home-dir` flag, then the `STRATUS_HOME`
/// environment variable, then `~/.stratus`.
pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(env_home) = std::env::var("STRATUS_HOME") {
        if !env_home.is_empty() {
            return Ok(PathBuf::from(env_home));
        }
    }

    match dirs::home_dir() {
        Some(home) => Ok(home.join(".stratus")),
        None => anyhow::bail!("could not determine a home directory, pass --home-dir"),
    }
}

/// True when the shell has never been set up on this machine.
pub fn is_first_run(home: &Path) -> bool {
    !home.exists()
}

/// Create the shell home and everything the shell expects inside it:
/// the journal database, the config file and the log file. Pieces that
/// already exist are left untouched, so calling this on every start is
/// safe. Returns one report line per piece.
pub fn initialize(home: &Path) -> Result<Vec<String>> {
    let mut report = Vec::new();

    if !home.exists() {
        std::fs::create_dir_all(home)?;
        report.push(format!("created {}", home.display()));
    } else {
        report.push(format!("found {}", home.display()));
    }

    let db_path = home.join(DB_FILE);
    if !db_path.exists() {
        let journal = Journal::open(&db_path)?;
        journal.check()?;
        report.push(format!("created {}", db_path.display()));
    } else {
        report.push(format!("found {}", db_path.display()));
    }

    let config_path = home.join(CONFIG_FILE);
    if !config_path.exists() {
        Config::default().save_to(&config_path)?;
        report.push(format!("created {}", config_path.display()));
    } else {
        report.push(format!("found {}", config_path.display()));
    }

    let log_path = home.join(LOG_FILE);
    if !log_path.exists() {
        std::fs::File::create(&log_path)?;
        report.push(format!("created {}", log_path.display()));
    } else {
        report.push(format!("found {}", log_path.display()));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_home_prefers_explicit_path() {
        let home = resolve_home(Some(Path::new("/tmp/elsewhere"))).unwrap();
        assert_eq!(home, PathBuf::from("/tmp/elsewhere"));
    }

    #[test]
    fn test_initialize_creates_all_pieces() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join(".stratus");
        assert!(is_first_run(&home));

        let report = initialize(&home).unwrap();

        assert_eq!(report.len(), 4);
        assert!(report.iter().all(|line| line.starts_with("created ")));
        assert!(home.join(DB_FILE).exists());
        assert!(home.join(CONFIG_FILE).exists());
        assert!(home.join(LOG_FILE).exists());
        assert!(!is_first_run(&home));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join(".stratus");

        initialize(&home).unwrap();
        std::fs::write(home.join(CONFIG_FILE), "[main]\nverbose = true\n").unwrap();

        let report = initialize(&home).unwrap();

        assert!(report.iter().all(|line| line.starts_with("found ")));
        // an existing config survives re-initialization
        let config = Config::load_from(&home.join(CONFIG_FILE)).unwrap();
        assert!(config.main.verbose);
    }

    #[test]
    fn test_initialized_journal_is_usable() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join(".stratus");

        initialize(&home).unwrap();

        let journal = Journal::open(&home.join(DB_FILE)).unwrap();
        assert_eq!(journal.count_sessions().unwrap(), 0);
    }
}
