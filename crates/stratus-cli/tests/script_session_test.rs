use stratus_testing::ShellWorld;

/// Test: piped commands come back as `retcode|message` lines in input
/// order, one per executed command.
#[test]
fn test_scripted_session_emits_packed_lines() {
    let world = ShellWorld::initialized();

    let result = world
        .run_script(
            "auth login username:ops api_key:secret\nservers list\nexit\n",
            &[],
        )
        .expect("run");

    assert!(result.success(), "stderr: {}", result.stderr());
    let lines = result.packed_lines();
    assert_eq!(lines.len(), 2, "stdout: {}", result.stdout());
    assert_eq!(lines[0].0, 0);
    assert!(lines[0].1.contains("authenticated as ops (LON)"));
    assert_eq!(lines[1].0, 0);
    assert!(lines[1].1.contains("1 servers"));
}

/// Test: a command that fails still exits the shell cleanly; the failure
/// lives in the packed line, not the process status.
#[test]
fn test_unauthenticated_command_fails_in_band() {
    let world = ShellWorld::initialized();

    let result = world.run_script("servers list\nexit\n", &[]).expect("run");

    assert!(result.success(), "stderr: {}", result.stderr());
    let lines = result.packed_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0, 1);
    assert!(lines[0].1.contains("not authenticated"));
}

/// Test: an unknown first token is reported, not fatal.
#[test]
fn test_unknown_command_packs_retcode_one() {
    let world = ShellWorld::initialized();

    let result = world.run_script("frobnicate\nexit\n", &[]).expect("run");

    assert!(result.success());
    let lines = result.packed_lines();
    assert_eq!(lines[0].0, 1);
    assert!(lines[0].1.contains("unknown command 'frobnicate'"));
}

/// Test: end of input ends the session as cleanly as a typed exit.
#[test]
fn test_eof_ends_session_without_exit() {
    let world = ShellWorld::initialized();

    let result = world.run_script("auth status\n", &[]).expect("run");

    assert!(result.success(), "stderr: {}", result.stderr());
    assert_eq!(result.packed_lines().len(), 1);
}

/// Test: every executed command lands in the journal under the run's
/// session, input line and packed output both.
#[test]
fn test_journal_rows_match_script() {
    let world = ShellWorld::initialized();

    world
        .run_script(
            "auth login username:ops api_key:secret\nservers list\nexit\n",
            &[],
        )
        .expect("run");

    let journal = world.journal();
    let sessions = journal.list_sessions().expect("sessions");
    assert_eq!(sessions.len(), 1);

    let rows = journal.list_commands(&sessions[0].sid).expect("commands");
    assert_eq!(rows.len(), 2, "exit is not journaled");
    assert_eq!(rows[0].cmd_in, "auth login username:ops api_key:secret");
    assert!(rows[0].cmd_out.starts_with("0|INFO|"));
    assert_eq!(rows[1].cmd_in, "servers list");
    assert!(rows[1].cmd_out.contains("1 servers"));
}

/// Test: credentials on the command line log in before the first prompt.
#[test]
fn test_cli_credentials_log_in_at_startup() {
    let world = ShellWorld::initialized();

    let result = world
        .run_script("exit\n", &["-u", "ops", "-k", "secret", "-r", "DFW"])
        .expect("run");

    assert!(result.success(), "stderr: {}", result.stderr());
    assert!(result.stdout().contains("authenticated as ops (DFW)"));
}

/// Test: the config file supplies the region when no flag is given, and
/// a partial file still parses.
#[test]
fn test_config_region_applies_without_flag() {
    let world = ShellWorld::initialized();
    world.write_config("[provider]\nregion = \"SYD\"\n");

    let result = world
        .run_script("exit\n", &["-u", "ops", "-k", "secret"])
        .expect("run");

    assert!(result.success(), "stderr: {}", result.stderr());
    assert!(result.stdout().contains("authenticated as ops (SYD)"));
}

/// Test: a malformed config degrades to defaults with a warning instead
/// of refusing to start.
#[test]
fn test_malformed_config_warns_and_continues() {
    let world = ShellWorld::initialized();
    world.write_config("not toml at all [[[");

    let result = world.run_script("exit\n", &[]).expect("run");

    assert!(result.success(), "stderr: {}", result.stderr());
    assert!(result.stderr().contains("falling back to defaults"));
}

/// Test: shell activity reaches the log file, never the transcript.
#[test]
fn test_session_markers_reach_log_file() {
    let world = ShellWorld::initialized();

    let result = world.run_script("exit\n", &[]).expect("run");
    assert!(result.success());

    let log = std::fs::read_to_string(world.log_path()).expect("read log");
    assert!(log.contains("session"), "log: {}", log);
    assert!(!result.stdout().contains("session start"));
}

/// Test: plugin sub-loop navigation works line by line under a pipe.
#[test]
fn test_subloop_scripting() {
    let world = ShellWorld::initialized();

    let result = world
        .run_script(
            "auth login username:ops api_key:secret\nservers\nlist\nexit\nexit\n",
            &[],
        )
        .expect("run");

    assert!(result.success(), "stderr: {}", result.stderr());
    let lines = result.packed_lines();
    assert_eq!(lines.len(), 2, "stdout: {}", result.stdout());
    assert!(lines[1].1.contains("1 servers"));

    let journal = world.journal();
    let sessions = journal.list_sessions().expect("sessions");
    let rows = journal.list_commands(&sessions[0].sid).expect("commands");
    // the scoped `list` is journaled with its plugin prefix
    assert_eq!(rows[1].cmd_in, "servers list");
}
