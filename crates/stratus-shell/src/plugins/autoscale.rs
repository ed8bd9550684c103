use stratus_types::ParamSpec;

use crate::command::{Command, Outcome};
use crate::context::ShellContext;
use crate::plugins::{arg, checked_args, complete_line, numeric_arg, split_first};

const SUBCOMMANDS: &[&str] = &["create", "delete", "list"];

const CREATE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("name"),
    ParamSpec::required("min_entities"),
    ParamSpec::required("max_entities"),
    ParamSpec::optional("cooldown", "60"),
];
const DELETE_PARAMS: &[ParamSpec] = &[ParamSpec::required("id")];

fn params_for(sub: &str) -> &'static [ParamSpec] {
    match sub {
        "create" => CREATE_PARAMS,
        "delete" => DELETE_PARAMS,
        _ => &[],
    }
}

/// Autoscaling groups.
pub struct AutoscalePlugin;

impl AutoscalePlugin {
    fn list(&self, ctx: &ShellContext) -> Outcome {
        match ctx.provider().autoscale.list_groups() {
            Ok(groups) => {
                for g in &groups {
                    println!(
                        "{:<38} {:<16} {:>3}..{:<3} cooldown {}s",
                        g.id, g.name, g.min_entities, g.max_entities, g.cooldown
                    );
                }
                Outcome::success(format!("{} scaling groups", groups.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn create(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, CREATE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let min_entities: u32 = match numeric_arg(&args, "min_entities") {
            Ok(n) => n,
            Err(outcome) => return outcome,
        };
        let max_entities: u32 = match numeric_arg(&args, "max_entities") {
            Ok(n) => n,
            Err(outcome) => return outcome,
        };
        let cooldown: u32 = match numeric_arg(&args, "cooldown") {
            Ok(n) => n,
            Err(outcome) => return outcome,
        };
        match ctx.provider().autoscale.create_group(
            arg(&args, "name"),
            min_entities,
            max_entities,
            cooldown,
        ) {
            Ok(group) => {
                Outcome::success(format!("scaling group {} created, id {}", group.name, group.id))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn delete(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, DELETE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let id = arg(&args, "id");
        match ctx.provider().autoscale.delete_group(id) {
            Ok(()) => Outcome::success(format!("scaling group {} deleted", id)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }
}

impl Command for AutoscalePlugin {
    fn name(&self) -> &'static str {
        "autoscale"
    }

    fn summary(&self) -> &'static str {
        "manage scaling groups"
    }

    fn execute(&self, ctx: &ShellContext, line: &str) -> Outcome {
        let (sub, rest) = split_first(line);
        match sub {
            "list" => self.list(ctx),
            "create" => self.create(ctx, rest),
            "delete" => self.delete(ctx, rest),
            "" => Outcome::failure("usage: autoscale <list|create|delete>"),
            other => Outcome::failure(format!("unknown autoscale command '{}'", other)),
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
    fn test_list_seeded_group() {
        let ctx = authed_ctx();
        let outcome = AutoscalePlugin.execute(&ctx, "list");
        assert_eq!(outcome.retcode, 0);
        assert_eq!(outcome.message, "1 scaling groups");
    }

    #[test]
    fn test_create_with_default_cooldown() {
        let ctx = authed_ctx();
        let outcome =
            AutoscalePlugin.execute(&ctx, "create name:api-workers min_entities:1 max_entities:5");
        assert_eq!(outcome.retcode, 0, "{}", outcome.message);
        assert!(outcome.message.contains("api-workers"));
    }

    #[test]
    fn test_create_rejects_inverted_bounds() {
        let ctx = authed_ctx();
        let outcome =
            AutoscalePlugin.execute(&ctx, "create name:api-workers min_entities:5 max_entities:1");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("invalid request"));
    }

    #[test]
    fn test_delete_unknown_group() {
        let ctx = authed_ctx();
        let outcome = AutoscalePlugin.execute(&ctx, "delete id:as-none");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("'as-none'"));
    }

    #[test]
    fn test_completion_hints() {
        assert_eq!(AutoscalePlugin.complete("create mi"), vec!["min_entities:"]);
        assert_eq!(AutoscalePlugin.complete("create ma"), vec!["max_entities:"]);
    }
}
