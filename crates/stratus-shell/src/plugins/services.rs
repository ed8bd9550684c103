use std::collections::BTreeMap;

use stratus_types::ParamSpec;

use crate::command::{Command, Outcome};
use crate::context::ShellContext;
use crate::plugins::{complete_line, split_first};

const SUBCOMMANDS: &[&str] = &["list"];

fn params_for(_sub: &str) -> &'static [ParamSpec] {
    &[]
}

/// Service catalog of the authenticated account, grouped by service.
pub struct ServicesPlugin;

impl ServicesPlugin {
    fn list(&self, ctx: &ShellContext) -> Outcome {
        match ctx.provider().identity.endpoints() {
            Ok(endpoints) => {
                let mut by_service: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
                for ep in &endpoints {
                    by_service.entry(&ep.service).or_default().push(&ep.url);
                }
                for (service, urls) in &by_service {
                    println!("{}:", service);
                    for url in urls {
                        println!("  {}", url);
                    }
                }
                Outcome::success(format!("{} services", by_service.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }
}

impl Command for ServicesPlugin {
    fn name(&self) -> &'static str {
        "services"
    }

    fn summary(&self) -> &'static str {
        "list provider services"
    }

    fn execute(&self, ctx: &ShellContext, line: &str) -> Outcome {
        let (sub, _rest) = split_first(line);
        match sub {
            "list" => self.list(ctx),
            "" => Outcome::failure("usage: services <list>"),
            other => Outcome::failure(format!("unknown services command '{}'", other)),
        }
    }

    fn complete(&self, line: &str) -> Vec<String> {
        complete_line(line, SUBCOMMANDS, params_for)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::testutil::authed_ctx;

    #[test]
    fn test_list_groups_catalog_by_service() {
        let ctx = authed_ctx();
        let outcome = ServicesPlugin.execute(&ctx, "list");
        assert_eq!(outcome.retcode, 0);
        assert_eq!(outcome.message, "6 services");
    }

    #[test]
    fn test_list_requires_login() {
        let ctx = crate::context::ShellContext::in_memory();
        let outcome = ServicesPlugin.execute(&ctx, "list");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("not authenticated"));
    }

    #[test]
    fn test_completion() {
        assert_eq!(ServicesPlugin.complete("l"), vec!["list"]);
    }
}
