use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use is_terminal::IsTerminal;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use stratus_shell::{CommandRegistry, Outcome, ShellContext};
use stratus_types::Severity;

/// Commands handled by the REPL itself, not by a plugin.
const BUILTINS: &[&str] = &[
    "credits",
    "exit",
    "help",
    "list_plugins",
    "log_level",
    "plugin",
    "quit",
    "version",
];

/// Extra first words available inside a plugin sub-loop.
const SCOPED_BUILTINS: &[&str] = &["exit", "help", "quit"];

/// What the loop should do after a line has been handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Line-at-a-time REPL state, independent of where lines come from.
///
/// The interactive editor and the scripting loop both feed lines through
/// here, so prompts, plugin sub-loops and journaling behave identically
/// at a TTY and under a pipe.
pub struct ReplState {
    scope: Vec<String>,
}

impl ReplState {
    pub fn new() -> Self {
        Self { scope: Vec::new() }
    }

    pub fn prompt(&self) -> String {
        match self.scope.last() {
            Some(plugin) => format!("stratus {}> ", plugin),
            None => "stratus> ".to_string(),
        }
    }

    /// Name of the plugin sub-loop the shell is currently inside, if any.
    pub fn scope(&self) -> Option<&str> {
        self.scope.last().map(String::as_str)
    }

    /// Handle one input line.
    pub fn feed(&mut self, ctx: &ShellContext, registry: &CommandRegistry, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }

        if let Some(plugin) = self.scope.last().cloned() {
            return self.feed_scoped(ctx, registry, &plugin, line);
        }
        self.feed_root(ctx, registry, line)
    }

    fn feed_scoped(
        &mut self,
        ctx: &ShellContext,
        registry: &CommandRegistry,
        plugin: &str,
        line: &str,
    ) -> Flow {
        match line {
            // exit/quit leave the sub-loop, not the shell
            "exit" | "quit" => {
                self.scope.pop();
                return Flow::Continue;
            }
            "help" => {
                if let Some(command) = registry.get(plugin) {
                    println!("{}: {}", plugin, command.summary());
                    for sub in command.complete("") {
                        println!("  {}", sub);
                    }
                }
                return Flow::Continue;
            }
            _ => {}
        }

        let outcome = registry.dispatch(ctx, plugin, line);
        // journal the command the way it reads outside the sub-loop
        ctx.record(&format!("{} {}", plugin, line), &outcome);
        Flow::Continue
    }

    fn feed_root(&mut self, ctx: &ShellContext, registry: &CommandRegistry, line: &str) -> Flow {
        let (head, rest) = split_first(line);
        match head {
            "exit" | "quit" => Flow::Exit,
            "help" => {
                print_help(registry);
                Flow::Continue
            }
            "version" => {
                println!("stratus {}", env!("CARGO_PKG_VERSION"));
                Flow::Continue
            }
            "credits" => {
                println!("stratus {}", env!("CARGO_PKG_VERSION"));
                println!("an interactive shell for cloud infrastructure operations");
                println!("https://github.com/stratus-sh/stratus");
                Flow::Continue
            }
            "list_plugins" => {
                for name in registry.command_names() {
                    if let Some(command) = registry.get(name) {
                        println!("{:<16} {}", name, command.summary());
                    }
                }
                Flow::Continue
            }
            "log_level" => {
                let outcome = log_level(ctx, rest);
                ctx.record(line, &outcome);
                Flow::Continue
            }
            "plugin" => self.plugin_command(ctx, registry, rest, line),
            // a plugin name as the first token is shorthand for `plugin <name> ...`
            _ if registry.contains(head) => self.plugin_command(ctx, registry, line, line),
            _ => {
                let outcome = Outcome::failure(format!("unknown command '{}' (try 'help')", head));
                ctx.record(line, &outcome);
                Flow::Continue
            }
        }
    }

    /// `spec` is `<name> [command ...]`; `full_line` is what the operator
    /// actually typed, which is what the journal gets.
    fn plugin_command(
        &mut self,
        ctx: &ShellContext,
        registry: &CommandRegistry,
        spec: &str,
        full_line: &str,
    ) -> Flow {
        let (name, sub) = split_first(spec);
        if name.is_empty() {
            let outcome = Outcome::failure("usage: plugin <name> [command ...]");
            ctx.record(full_line, &outcome);
            return Flow::Continue;
        }
        if !registry.contains(name) {
            let outcome = Outcome::failure(format!("no plugin named '{}'", name));
            ctx.record(full_line, &outcome);
            return Flow::Continue;
        }
        if sub.is_empty() {
            self.scope.push(name.to_string());
            println!("entering {} (type 'exit' to leave)", name);
            return Flow::Continue;
        }

        let outcome = registry.dispatch(ctx, name, sub);
        ctx.record(full_line, &outcome);
        Flow::Continue
    }
}

impl Default for ReplState {
    fn default() -> Self {
        Self::new()
    }
}

fn split_first(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (line, ""),
    }
}

fn log_level(ctx: &ShellContext, rest: &str) -> Outcome {
    let level = rest.trim();
    if level.is_empty() {
        return Outcome::success(format!("echo threshold is {}", ctx.echo_threshold()));
    }
    match level.parse::<Severity>() {
        Ok(severity) => {
            ctx.set_echo_threshold(severity);
            Outcome::success(format!("echo threshold set to {}", severity))
        }
        Err(e) => Outcome::failure(e.to_string()),
    }
}

fn print_help(registry: &CommandRegistry) {
    println!("built-in commands:");
    println!("  help                     show this help");
    println!("  plugin <name> [cmd ...]  run a plugin command, or enter the plugin");
    println!("  list_plugins             list loaded plugins");
    println!("  log_level [LEVEL]        show or set the echo threshold");
    println!("  version                  print the version");
    println!("  credits                  print credits");
    println!("  exit | quit              leave the shell");
    println!();
    println!("plugins (the name alone also works as a first token):");
    for name in registry.command_names() {
        if let Some(command) = registry.get(name) {
            println!("  {:<16} {}", name, command.summary());
        }
    }
}

/// Completion candidates for `head`, the text before the cursor.
///
/// Returns the byte offset where the word being completed starts and the
/// candidate replacements. The first word completes over builtins and
/// plugin names; later words are delegated to the plugin named by the
/// first token, which yields its subcommands or `name:` parameter hints.
pub fn complete_input(
    registry: &CommandRegistry,
    scope: Option<&str>,
    head: &str,
) -> (usize, Vec<String>) {
    let word_start = head
        .rfind(char::is_whitespace)
        .map(|i| i + 1)
        .unwrap_or(0);
    let word = &head[word_start..];
    let before = head[..word_start].trim();

    let mut candidates = if let Some(plugin) = scope {
        let mut inner = match registry.get(plugin) {
            Some(command) => command.complete(head),
            None => Vec::new(),
        };
        if before.is_empty() {
            inner.extend(
                SCOPED_BUILTINS
                    .iter()
                    .filter(|b| b.starts_with(word))
                    .map(|b| b.to_string()),
            );
        }
        inner
    } else if before.is_empty() {
        BUILTINS
            .iter()
            .chain(registry.command_names().iter())
            .filter(|c| c.starts_with(word))
            .map(|c| c.to_string())
            .collect()
    } else if before == "plugin" {
        registry
            .command_names()
            .iter()
            .filter(|c| c.starts_with(word))
            .map(|c| c.to_string())
            .collect()
    } else {
        let (first, remainder) = split_first(head);
        let (plugin_name, plugin_line) = if first == "plugin" {
            split_first(remainder)
        } else {
            (first, remainder)
        };
        match registry.get(plugin_name) {
            Some(command) => command.complete(plugin_line),
            None => Vec::new(),
        }
    };

    candidates.sort_unstable();
    (word_start, candidates)
}

/// rustyline glue: completion driven by the registry, with the current
/// sub-loop scope mirrored in from the REPL loop after each line.
struct ShellHelper {
    registry: Arc<CommandRegistry>,
    scope: Arc<Mutex<Option<String>>>,
}

impl Completer for ShellHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let scope = self.scope.lock().unwrap().clone();
        Ok(complete_input(&self.registry, scope.as_deref(), &line[..pos]))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}
impl Validator for ShellHelper {}
impl Helper for ShellHelper {}

/// Run the REPL until exit or end of input. At a TTY this is a rustyline
/// editor with history and completion; under a pipe it reads stdin line
/// by line and never prompts.
pub fn run(
    ctx: &ShellContext,
    registry: Arc<CommandRegistry>,
    history: Option<PathBuf>,
) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        return run_script(ctx, &registry);
    }
    run_interactive(ctx, registry, history)
}

fn run_interactive(
    ctx: &ShellContext,
    registry: Arc<CommandRegistry>,
    history: Option<PathBuf>,
) -> Result<()> {
    let helper_scope = Arc::new(Mutex::new(None));
    let mut editor: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ShellHelper {
        registry: Arc::clone(&registry),
        scope: Arc::clone(&helper_scope),
    }));
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    let mut state = ReplState::new();
    loop {
        match editor.readline(&state.prompt()) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                if state.feed(ctx, &registry, &line) == Flow::Exit {
                    break;
                }
                *helper_scope.lock().unwrap() = state.scope().map(String::from);
                if ctx.is_terminating() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("interrupted, type 'exit' or press Ctrl-D to leave");
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
    Ok(())
}

fn run_script(ctx: &ShellContext, registry: &CommandRegistry) -> Result<()> {
    let stdin = std::io::stdin();
    let mut state = ReplState::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if state.feed(ctx, registry, &line) == Flow::Exit {
            break;
        }
        if ctx.is_terminating() {
            break;
        }
    }
    Ok(())
}
