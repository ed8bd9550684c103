use stratus_types::ParamSpec;

use crate::command::{Command, Outcome};
use crate::context::ShellContext;
use crate::plugins::{arg, checked_args, complete_line, numeric_arg, split_first};

const SUBCOMMANDS: &[&str] = &["create", "create_database", "delete", "list", "list_flavors"];

const CREATE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("name"),
    ParamSpec::required("flavor_id"),
    ParamSpec::required("volume_size"),
];
const CREATE_DATABASE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("instance_id"),
    ParamSpec::required("name"),
];
const DELETE_PARAMS: &[ParamSpec] = &[ParamSpec::required("id")];

fn params_for(sub: &str) -> &'static [ParamSpec] {
    match sub {
        "create" => CREATE_PARAMS,
        "create_database" => CREATE_DATABASE_PARAMS,
        "delete" => DELETE_PARAMS,
        _ => &[],
    }
}

/// Managed database instances and the databases inside them.
pub struct DatabasesPlugin;

impl DatabasesPlugin {
    fn list(&self, ctx: &ShellContext) -> Outcome {
        match ctx.provider().databases.list_instances() {
            Ok(instances) => {
                for i in &instances {
                    println!(
                        "{:<38} {:<16} flavor {:<4} {:>4} GB {:<8} {} databases",
                        i.id,
                        i.name,
                        i.flavor_id,
                        i.volume_size,
                        i.status,
                        i.databases.len()
                    );
                }
                Outcome::success(format!("{} instances", instances.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn list_flavors(&self, ctx: &ShellContext) -> Outcome {
        match ctx.provider().databases.list_flavors() {
            Ok(flavors) => {
                for f in &flavors {
                    println!("{:<6} {:<16} {:>6} MB", f.id, f.name, f.ram_mb);
                }
                Outcome::success(format!("{} flavors", flavors.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn create(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, CREATE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let volume_size: u32 = match numeric_arg(&args, "volume_size") {
            Ok(size) => size,
            Err(outcome) => return outcome,
        };
        match ctx.provider().databases.create_instance(
            arg(&args, "name"),
            arg(&args, "flavor_id"),
            volume_size,
        ) {
            Ok(instance) => Outcome::success(format!(
                "instance {} created, id {}",
                instance.name, instance.id
            )),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn create_database(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, CREATE_DATABASE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let name = arg(&args, "name");
        match ctx
            .provider()
            .databases
            .create_database(arg(&args, "instance_id"), name)
        {
            Ok(()) => Outcome::success(format!("database {} created", name)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn delete(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, DELETE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let id = arg(&args, "id");
        match ctx.provider().databases.delete_instance(id) {
            Ok(()) => Outcome::success(format!("instance {} deleted", id)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }
}

impl Command for DatabasesPlugin {
    fn name(&self) -> &'static str {
        "databases"
    }

    fn summary(&self) -> &'static str {
        "manage database instances"
    }

    fn execute(&self, ctx: &ShellContext, line: &str) -> Outcome {
        let (sub, rest) = split_first(line);
        match sub {
            "list" => self.list(ctx),
            "list_flavors" => self.list_flavors(ctx),
            "create" => self.create(ctx, rest),
            "create_database" => self.create_database(ctx, rest),
            "delete" => self.delete(ctx, rest),
            "" => Outcome::failure(
                "usage: databases <list|list_flavors|create|create_database|delete>",
            ),
            other => Outcome::failure(format!("unknown databases command '{}'", other)),
        }
    }

    fn complete(&self, line: &str) -> Vec<String> {
        complete_line(line, SUBCOMMANDS, params_for)
    }
}
