use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// `key:value` / `key=value` tokens. Keys are alphanumeric/underscore;
/// values additionally allow `~ / . - @`, or anything when they start
/// with `$`.
static KV_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_]+)[:=](\$\S+|[A-Za-z0-9_~/.@-]+)$").unwrap());

/// Bare positional tokens.
static BARE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

/// Result of parsing the trailing text of one command line.
///
/// `varg` keeps positional tokens in input order; `kvarg` keys are unique
/// (a repeated key keeps the last value); `dropped` collects tokens that
/// matched neither form, so callers can report them without aborting the
/// command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub varg: Vec<String>,
    pub kvarg: HashMap<String, String>,
    pub dropped: Vec<String>,
}

impl ParsedArgs {
    pub fn is_empty(&self) -> bool {
        self.varg.is_empty() && self.kvarg.is_empty()
    }
}

/// Parse a raw argument string into positional and key-value parts.
///
/// The line is split on whitespace; there is no quoting mechanism, so a
/// value can never contain embedded whitespace. Both `:` and `=` are
/// accepted as separators and may be mixed within one line. An empty line
/// yields an empty [`ParsedArgs`], not an error.
pub fn parse_line(line: &str) -> ParsedArgs {
    let mut parsed = ParsedArgs::default();
    for token in line.split_whitespace() {
        if let Some(caps) = KV_TOKEN.captures(token) {
            parsed
                .kvarg
                .insert(caps[1].to_string(), caps[2].to_string());
        } else if BARE_TOKEN.is_match(token) {
            parsed.varg.push(token.to_string());
        } else {
            parsed.dropped.push(token.to_string());
        }
    }
    parsed
}
