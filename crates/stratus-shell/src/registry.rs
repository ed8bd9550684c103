use std::collections::HashMap;

use crate::command::{Command, Outcome};
use crate::context::ShellContext;
use crate::error::{Error, Result};
use crate::plugins;

/// Name -> command map behind the REPL.
///
/// Registration is checked: a name can only be bound once, and re-binding
/// is rejected rather than silently replaced. `reload` rebuilds the map
/// from scratch so no stale entry survives.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a command under its own name. Duplicate names are an error;
    /// the existing binding stays untouched.
    pub fn register(&mut self, command: Box<dyn Command>) -> Result<()> {
        let name = command.name();
        if self.commands.contains_key(name) {
            return Err(Error::DuplicateCommand(name.to_string()));
        }
        self.commands.insert(name.to_string(), command);
        Ok(())
    }

    /// Register the built-in plugin set. A module that fails to register
    /// is skipped and reported; the others still load. Returns one
    /// diagnostic line per skipped module.
    pub fn register_builtin(&mut self) -> Vec<String> {
        let mut skipped = Vec::new();
        for command in plugins::builtin() {
            let name = command.name();
            if let Err(e) = self.register(command) {
                skipped.push(format!("plugin '{}' not loaded: {}", name, e));
            }
        }
        skipped
    }

    /// Drop every binding and register the built-in set again.
    pub fn reload(&mut self) -> Vec<String> {
        self.commands.clear();
        self.register_builtin()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted. This is the completion surface: it always
    /// reflects exactly the current map contents.
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run `line` against the named command. An unknown name is a normal
    /// failed outcome, not an error; an empty registry is usable.
    pub fn dispatch(&self, ctx: &ShellContext, name: &str, line: &str) -> Outcome {
        match self.get(name) {
            Some(command) => command.execute(ctx, line),
            None => Outcome::failure(format!("unknown command '{}' (try 'help')", name)),
        }
    }
}
