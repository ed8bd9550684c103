// Built-in command modules
//
// Each module wires one provider surface to the shell: split the line,
// validate parameters, call through, report an outcome. The set is
// statically linked; the registry is the only place that knows the list.

mod auth;
mod autoscale;
mod databases;
mod dns;
mod files;
mod loadbalancers;
mod servers;
mod services;

pub use auth::AuthPlugin;
pub use autoscale::AutoscalePlugin;
pub use databases::DatabasesPlugin;
pub use dns::DnsPlugin;
pub use files::FilesPlugin;
pub use loadbalancers::LoadBalancersPlugin;
pub use servers::ServersPlugin;
pub use services::ServicesPlugin;

use stratus_types::{ParamSpec, ParsedArgs, check_params, parse_line};

use crate::command::{Command, Outcome};
use crate::context::ShellContext;

/// One boxed instance of every built-in module.
pub fn builtin() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(AuthPlugin),
        Box::new(ServersPlugin),
        Box::new(DnsPlugin),
        Box::new(LoadBalancersPlugin),
        Box::new(DatabasesPlugin),
        Box::new(AutoscalePlugin),
        Box::new(FilesPlugin),
        Box::new(ServicesPlugin),
    ]
}

/// Split a line into its first word and the trimmed remainder.
pub(crate) fn split_first(line: &str) -> (&str, &str) {
    let trimmed = line.trim_start();
    match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (trimmed, ""),
    }
}

/// Completion over a sub-command table: complete the sub-command word
/// itself, or the parameter hints of an already-typed sub-command,
/// filtered by the token typed so far.
pub(crate) fn complete_line(
    line: &str,
    subcommands: &[&str],
    params_for: fn(&str) -> &'static [ParamSpec],
) -> Vec<String> {
    let trimmed = line.trim_start();
    match trimmed.split_once(char::is_whitespace) {
        None => subcommands
            .iter()
            .filter(|s| s.starts_with(trimmed))
            .map(|s| s.to_string())
            .collect(),
        Some((sub, rest)) => {
            let word = rest.rsplit(char::is_whitespace).next().unwrap_or("");
            params_for(sub)
                .iter()
                .map(|p| p.hint())
                .filter(|h| h.starts_with(word))
                .collect()
        }
    }
}

/// Parse a handler argument line and enforce its parameter specs.
///
/// Malformed tokens were already dropped by the parser; each one is
/// echoed as a warning so the operator sees what was ignored. A missing
/// required parameter short-circuits into a failed outcome.
pub(crate) fn checked_args(
    ctx: &ShellContext,
    rest: &str,
    specs: &'static [ParamSpec],
) -> std::result::Result<ParsedArgs, Outcome> {
    let mut args = parse_line(rest);
    for token in &args.dropped {
        ctx.echo(&Outcome::warning(format!(
            "ignoring malformed token '{}'",
            token
        )));
    }
    match check_params(&mut args.kvarg, specs) {
        Ok(_) => Ok(args),
        Err(e) => Err(Outcome::failure(e.to_string())),
    }
}

/// Value of a validated parameter. Specs guarantee presence, so an
/// absent key only happens on a handler bug; empty string keeps that
/// from panicking.
pub(crate) fn arg<'a>(args: &'a ParsedArgs, key: &str) -> &'a str {
    args.kvarg.get(key).map(String::as_str).unwrap_or_default()
}

/// Numeric parameter value, as a failed outcome when it does not parse.
pub(crate) fn numeric_arg<T: std::str::FromStr>(
    args: &ParsedArgs,
    key: &str,
) -> std::result::Result<T, Outcome> {
    let value = arg(args, key);
    value.parse().map_err(|_| {
        Outcome::failure(format!("parameter '{}' must be a number, got '{}'", key, value))
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use stratus_types::ParamSpec;

    const SUBS: &[&str] = &["create", "delete", "list"];
    const CREATE: &[ParamSpec] = &[
        ParamSpec::required("name"),
        ParamSpec::required("flavor_id"),
        ParamSpec::required("image_id"),
    ];

    fn params(sub: &str) -> &'static [ParamSpec] {
        match sub {
            "create" => CREATE,
            _ => &[],
        }
    }

    #[test]
    fn test_split_first() {
        assert_eq!(split_first("create name:web"), ("create", "name:web"));
        assert_eq!(split_first("list"), ("list", ""));
        assert_eq!(split_first(""), ("", ""));
        assert_eq!(split_first("  reboot   id:s-1 "), ("reboot", "id:s-1 "));
    }

    #[test]
    fn test_complete_subcommand_word() {
        assert_eq!(complete_line("cr", SUBS, params), vec!["create"]);
        assert_eq!(complete_line("", SUBS, params).len(), 3);
    }

    #[test]
    fn test_complete_parameter_hints() {
        assert_eq!(complete_line("create fl", SUBS, params), vec!["flavor_id:"]);
        assert_eq!(complete_line("create ", SUBS, params).len(), 3);
        assert_eq!(
            complete_line("create name:web im", SUBS, params),
            vec!["image_id:"]
        );
    }

    #[test]
    fn test_complete_unknown_subcommand_has_no_hints() {
        assert!(complete_line("frob ", SUBS, params).is_empty());
    }

    #[test]
    fn test_numeric_arg_rejects_text() {
        let args = stratus_types::parse_line("port:http");
        let err = numeric_arg::<u16>(&args, "port").unwrap_err();
        assert_eq!(err.retcode, 1);
        assert!(err.message.contains("'port'"));
    }
}
