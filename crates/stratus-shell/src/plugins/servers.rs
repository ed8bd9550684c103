use stratus_types::ParamSpec;

use crate::command::{Command, Outcome};
use crate::context::ShellContext;
use crate::plugins::{arg, checked_args, complete_line, split_first};
use crate::workers::ServerBuildWatcher;

const SUBCOMMANDS: &[&str] = &[
    "create",
    "delete",
    "details",
    "list",
    "list_flavors",
    "list_images",
    "reboot",
];

const CREATE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("name"),
    ParamSpec::required("flavor_id"),
    ParamSpec::required("image_id"),
];
const DETAILS_PARAMS: &[ParamSpec] = &[ParamSpec::required("id")];
const REBOOT_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("id"),
    ParamSpec::optional("type", "SOFT"),
];
const DELETE_PARAMS: &[ParamSpec] = &[ParamSpec::required("id")];

fn params_for(sub: &str) -> &'static [ParamSpec] {
    match sub {
        "create" => CREATE_PARAMS,
        "details" => DETAILS_PARAMS,
        "reboot" => REBOOT_PARAMS,
        "delete" => DELETE_PARAMS,
        _ => &[],
    }
}

/// Server lifecycle: list, create (with a progress watcher), inspect,
/// reboot, delete.
pub struct ServersPlugin;

impl ServersPlugin {
    fn list(&self, ctx: &ShellContext) -> Outcome {
        match ctx.provider().compute.list_servers() {
            Ok(servers) => {
                for s in &servers {
                    println!(
                        "{:<38} {:<16} {:<8} {:>3}% {}",
                        s.id, s.name, s.status, s.progress, s.public_ip
                    );
                }
                Outcome::success(format!("{} servers", servers.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn list_flavors(&self, ctx: &ShellContext) -> Outcome {
        match ctx.provider().compute.list_flavors() {
            Ok(flavors) => {
                for f in &flavors {
                    println!(
                        "{:<6} {:<16} {:>6} MB {:>2} vcpus {:>4} GB",
                        f.id, f.name, f.ram_mb, f.vcpus, f.disk_gb
                    );
                }
                Outcome::success(format!("{} flavors", flavors.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn list_images(&self, ctx: &ShellContext) -> Outcome {
        match ctx.provider().compute.list_images() {
            Ok(images) => {
                for i in &images {
                    println!("{:<16} {}", i.id, i.name);
                }
                Outcome::success(format!("{} images", images.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    /// Create a server and hand the build to a watcher thread. The
    /// outcome reports the request; progress arrives via the notifier.
    fn create(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, CREATE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let name = arg(&args, "name");
        match ctx.provider().compute.create_server(
            name,
            arg(&args, "flavor_id"),
            arg(&args, "image_id"),
        ) {
            Ok(server) => {
                let watcher = ServerBuildWatcher::spawn(
                    ctx.provider_handle(),
                    ctx.queue().clone(),
                    ctx.terminate_flag(),
                    server.id.clone(),
                    ctx.build_poll(),
                );
                match watcher {
                    Ok(_detached) => Outcome::success(format!(
                        "server {} building, id {}",
                        server.name, server.id
                    )),
                    Err(e) => Outcome::warning(format!(
                        "server {} building, id {}, but the progress watcher did not start: {}",
                        server.name, server.id, e
                    )),
                }
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn details(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, DETAILS_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        match ctx.provider().compute.get_server(arg(&args, "id")) {
            Ok(server) => match serde_json::to_string_pretty(&server) {
                Ok(json) => {
                    println!("{}", json);
                    Outcome::success(format!("server {} is {}", server.name, server.status))
                }
                Err(e) => Outcome::failure(e.to_string()),
            },
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn reboot(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, REBOOT_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let id = arg(&args, "id");
        let kind = arg(&args, "type").to_ascii_uppercase();
        let hard = match kind.as_str() {
            "SOFT" => false,
            "HARD" => true,
            _ => return Outcome::failure("reboot type must be SOFT or HARD"),
        };
        match ctx.provider().compute.reboot_server(id, hard) {
            Ok(()) => Outcome::success(format!("server {} {} reboot requested", id, kind)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn delete(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, DELETE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let id = arg(&args, "id");
        match ctx.provider().compute.delete_server(id) {
            Ok(()) => Outcome::success(format!("server {} deleted", id)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }
}

impl Command for ServersPlugin {
    fn name(&self) -> &'static str {
        "servers"
    }

    fn summary(&self) -> &'static str {
        "manage cloud servers"
    }

    fn execute(&self, ctx: &ShellContext, line: &str) -> Outcome {
        let (sub, rest) = split_first(line);
        match sub {
            "list" => self.list(ctx),
            "list_flavors" => self.list_flavors(ctx),
            "list_images" => self.list_images(ctx),
            "create" => self.create(ctx, rest),
            "details" => self.details(ctx, rest),
            "reboot" => self.reboot(ctx, rest),
            "delete" => self.delete(ctx, rest),
            "" => Outcome::failure(
                "usage: servers <list|list_flavors|list_images|create|details|reboot|delete>",
            ),
            other => Outcome::failure(format!("unknown servers command '{}'", other)),
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
    use std::time::{Duration, Instant};

    #[test]
    fn test_list_reports_seeded_server() {
        let ctx = authed_ctx();
        let outcome = ServersPlugin.execute(&ctx, "list");
        assert_eq!(outcome.retcode, 0);
        assert_eq!(outcome.message, "1 servers");
    }

    #[test]
    fn test_list_requires_authentication() {
        let ctx = crate::context::ShellContext::in_memory();
        let outcome = ServersPlugin.execute(&ctx, "list");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("not authenticated"));
    }

    #[test]
    fn test_create_missing_parameter_fails_fast() {
        let ctx = authed_ctx();
        let outcome = ServersPlugin.execute(&ctx, "create name:web04");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("'flavor_id'"));
    }

    #[test]
    fn test_create_spawns_watcher_that_reports_progress() {
        let ctx = authed_ctx();
        let outcome = ServersPlugin.execute(&ctx, "create name:web04 flavor_id:2 image_id:ubuntu-2204");
        assert_eq!(outcome.retcode, 0, "{}", outcome.message);
        assert!(outcome.message.contains("web04"));

        // The watcher polls every millisecond here; wait for the build
        // to land on ACTIVE.
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut saw_active = false;
        while Instant::now() < deadline {
            if let Some(message) = ctx.queue().pop() {
                if message.contains("ACTIVE") {
                    saw_active = true;
                    break;
                }
            } else {
                std::thread::sleep(Duration::from_millis(5));
            }
        }
        assert!(saw_active, "no ACTIVE progress message arrived");
    }

    #[test]
    fn test_create_duplicate_name_is_conflict() {
        let ctx = authed_ctx();
        let outcome = ServersPlugin.execute(&ctx, "create name:web01 flavor_id:2 image_id:debian-12");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("conflict"));
    }

    #[test]
    fn test_details_unknown_id() {
        let ctx = authed_ctx();
        let outcome = ServersPlugin.execute(&ctx, "details id:s-none");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("'s-none'"));
    }

    #[test]
    fn test_reboot_defaults_to_soft() {
        let ctx = authed_ctx();
        let outcome = ServersPlugin.execute(&ctx, "reboot id:s-1001");
        assert_eq!(outcome.retcode, 0);
        assert!(outcome.message.contains("SOFT"));
    }

    #[test]
    fn test_reboot_rejects_bad_type() {
        let ctx = authed_ctx();
        let outcome = ServersPlugin.execute(&ctx, "reboot id:s-1001 type:MEDIUM");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("SOFT or HARD"));
    }

    #[test]
    fn test_delete_then_list_is_empty() {
        let ctx = authed_ctx();
        assert_eq!(ServersPlugin.execute(&ctx, "delete id:s-1001").retcode, 0);
        let outcome = ServersPlugin.execute(&ctx, "list");
        assert_eq!(outcome.message, "0 servers");
    }

    #[test]
    fn test_unknown_subcommand() {
        let ctx = authed_ctx();
        let outcome = ServersPlugin.execute(&ctx, "frobnicate");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("'frobnicate'"));
    }

    #[test]
    fn test_empty_line_prints_usage() {
        let ctx = authed_ctx();
        let outcome = ServersPlugin.execute(&ctx, "");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.starts_with("usage:"));
    }

    #[test]
    fn test_completion_covers_params() {
        assert_eq!(ServersPlugin.complete("create fl"), vec!["flavor_id:"]);
        assert_eq!(ServersPlugin.complete("li").len(), 3);
        assert_eq!(ServersPlugin.complete("reboot t"), vec!["type:"]);
    }
}
