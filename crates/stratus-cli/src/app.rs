use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::Result;
use is_terminal::IsTerminal;
use stratus_provider::{Credentials, ProviderClient};
use stratus_shell::notifier::DEFAULT_NOTIFY_POLL;
use stratus_shell::{AnsiTarget, CommandRegistry, EchoMode, Notifier, ShellContext};
use stratus_types::Severity;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;
use crate::bootstrap;
use crate::config::Config;
use crate::repl;

pub fn run(cli: Cli) -> Result<()> {
    let home = bootstrap::resolve_home(cli.home_dir.as_deref())?;

    // The very first run only sets up the home and reports what it did;
    // the shell itself starts on the next invocation.
    if bootstrap::is_first_run(&home) {
        println!("first run, setting up {}", home.display());
        for line in bootstrap::initialize(&home)? {
            println!("  {}", line);
        }
        println!("run 'stratus' again to start the shell");
        return Ok(());
    }
    bootstrap::initialize(&home)?;

    let (config, config_warning) = Config::load_lenient(&home.join(bootstrap::CONFIG_FILE));
    let threshold = echo_threshold(&cli, &config);
    init_tracing(&home, threshold);
    if let Some(warning) = config_warning {
        tracing::warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }
    if cli.http_debug || config.provider.http_debug {
        tracing::debug!("provider HTTP tracing enabled");
    }
    if cli.no_verify_ssl || config.provider.no_verify_ssl {
        tracing::warn!("TLS certificate verification disabled");
    }

    let interactive = std::io::stdin().is_terminal();
    let echo_mode = if interactive {
        EchoMode::Interactive
    } else {
        EchoMode::Script
    };

    let ctx = ShellContext::new(
        ProviderClient::mock(),
        home.join(bootstrap::DB_FILE),
        merge_credentials(&cli, &config),
        echo_mode,
    );
    ctx.set_echo_threshold(threshold);
    if ctx.journal().is_none() {
        eprintln!("Warning: command journaling disabled for this session");
    }
    tracing::info!("session {} start", ctx.sid());

    login_if_credentialed(&ctx);

    // Operator interrupt: flag the workers, then leave without joining.
    let flag = ctx.terminate_flag();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        std::process::exit(130);
    })?;

    // The screen-region notifier only makes sense at a TTY; under a pipe
    // worker messages stay queued and the transcript stays parseable.
    let _notifier = if interactive {
        Some(Notifier::spawn(
            ctx.queue().clone(),
            ctx.terminate_flag(),
            DEFAULT_NOTIFY_POLL,
            Box::new(AnsiTarget::new()),
        )?)
    } else {
        None
    };

    let mut registry = CommandRegistry::new();
    for diagnostic in registry.register_builtin() {
        tracing::warn!("{}", diagnostic);
        eprintln!("Warning: {}", diagnostic);
    }

    let result = repl::run(&ctx, Arc::new(registry), Some(home.join("history")));

    // Workers and the notifier stop at their next poll.
    ctx.request_terminate();
    tracing::info!("session {} end", ctx.sid());
    result
}

/// Echo threshold from flags and config: --verbose forces DEBUG,
/// otherwise --log-level wins over the config file.
fn echo_threshold(cli: &Cli, config: &Config) -> Severity {
    if cli.verbose || config.main.verbose {
        return Severity::Debug;
    }
    let level = cli.log_level.as_deref().unwrap_or(&config.main.log_level);
    match level.parse() {
        Ok(severity) => severity,
        Err(e) => {
            eprintln!("Warning: {}, using INFO", e);
            Severity::Info
        }
    }
}

/// File logging into `<home>/stratus.log`. `RUST_LOG` overrides the
/// computed level. Never writes to the terminal.
fn init_tracing(home: &Path, threshold: Severity) {
    let directive = match threshold {
        Severity::Debug => "debug",
        Severity::Info => "info",
        Severity::Warning => "warn",
        Severity::Error | Severity::Critical => "error",
    };
    let appender = tracing_appender::rolling::never(home, bootstrap::LOG_FILE);
    tracing_subscriber::fmt()
        .with_writer(appender)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .init();
}

fn merge_credentials(cli: &Cli, config: &Config) -> Credentials {
    Credentials {
        username: cli.username.clone().unwrap_or_default(),
        api_key: cli.api_key.clone().unwrap_or_default(),
        token: cli.token.clone().unwrap_or_default(),
        tenant_id: cli.tenant_id.clone().unwrap_or_default(),
        region: cli
            .region
            .clone()
            .unwrap_or_else(|| config.provider.region.clone()),
        identity_type: cli
            .identity_type
            .clone()
            .unwrap_or_else(|| config.provider.identity_type.clone()),
    }
}

/// Credentials supplied up front get one login attempt before the prompt,
/// so piped sessions work without an auth preamble.
fn login_if_credentialed(ctx: &ShellContext) {
    let credentials = ctx.credentials();
    if !credentials.is_complete() {
        return;
    }
    match ctx.provider().identity.authenticate(credentials) {
        Ok(true) => {
            let who = ctx.provider().identity.whoami().unwrap_or_default();
            println!("authenticated as {} ({})", who, credentials.region);
            tracing::info!("startup authentication ok for {}", who);
        }
        Ok(false) => {
            eprintln!("Warning: startup authentication failed, check the supplied credentials");
        }
        Err(e) => {
            eprintln!("Warning: startup authentication failed: {}", e);
        }
    }
}
