use stratus_types::ParamSpec;

use crate::command::{Command, Outcome};
use crate::context::ShellContext;
use crate::plugins::{arg, checked_args, complete_line, split_first};

const SUBCOMMANDS: &[&str] = &[
    "create_container",
    "delete_container",
    "delete_object",
    "list_containers",
    "list_objects",
    "upload_object",
];

const CREATE_CONTAINER_PARAMS: &[ParamSpec] = &[ParamSpec::required("name")];
const DELETE_CONTAINER_PARAMS: &[ParamSpec] = &[ParamSpec::required("name")];
const LIST_OBJECTS_PARAMS: &[ParamSpec] = &[ParamSpec::required("container")];
const UPLOAD_OBJECT_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("container"),
    ParamSpec::required("src"),
    ParamSpec::required("dest"),
];
const DELETE_OBJECT_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("container"),
    ParamSpec::required("name"),
];

fn params_for(sub: &str) -> &'static [ParamSpec] {
    match sub {
        "create_container" => CREATE_CONTAINER_PARAMS,
        "delete_container" => DELETE_CONTAINER_PARAMS,
        "list_objects" => LIST_OBJECTS_PARAMS,
        "upload_object" => UPLOAD_OBJECT_PARAMS,
        "delete_object" => DELETE_OBJECT_PARAMS,
        _ => &[],
    }
}

/// Object storage containers and their objects.
pub struct FilesPlugin;

impl FilesPlugin {
    fn list_containers(&self, ctx: &ShellContext) -> Outcome {
        match ctx.provider().storage.list_containers() {
            Ok(containers) => {
                for c in &containers {
                    println!("{:<24} {:>6} objects {:>10} bytes", c.name, c.object_count, c.bytes);
                }
                Outcome::success(format!("{} containers", containers.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn create_container(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, CREATE_CONTAINER_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let name = arg(&args, "name");
        match ctx.provider().storage.create_container(name) {
            Ok(container) => Outcome::success(format!("container {} created", container.name)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn delete_container(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, DELETE_CONTAINER_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let name = arg(&args, "name");
        match ctx.provider().storage.delete_container(name) {
            Ok(()) => Outcome::success(format!("container {} deleted", name)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn list_objects(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, LIST_OBJECTS_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        match ctx.provider().storage.list_objects(arg(&args, "container")) {
            Ok(objects) => {
                for o in &objects {
                    println!("{:<32} {:>10} bytes", o.name, o.bytes);
                }
                Outcome::success(format!("{} objects", objects.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn upload_object(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, UPLOAD_OBJECT_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        match ctx.provider().storage.upload_object(
            arg(&args, "container"),
            arg(&args, "src"),
            arg(&args, "dest"),
        ) {
            Ok(object) => Outcome::success(format!(
                "uploaded {} to {} ({} bytes)",
                object.name, object.container, object.bytes
            )),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn delete_object(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, DELETE_OBJECT_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let name = arg(&args, "name");
        match ctx
            .provider()
            .storage
            .delete_object(arg(&args, "container"), name)
        {
            Ok(()) => Outcome::success(format!("object {} deleted", name)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }
}

impl Command for FilesPlugin {
    fn name(&self) -> &'static str {
        "files"
    }

    fn summary(&self) -> &'static str {
        "manage object storage"
    }

    fn execute(&self, ctx: &ShellContext, line: &str) -> Outcome {
        let (sub, rest) = split_first(line);
        match sub {
            "list_containers" => self.list_containers(ctx),
            "create_container" => self.create_container(ctx, rest),
            "delete_container" => self.delete_container(ctx, rest),
            "list_objects" => self.list_objects(ctx, rest),
            "upload_object" => self.upload_object(ctx, rest),
            "delete_object" => self.delete_object(ctx, rest),
            "" => Outcome::failure(
                "usage: files <list_containers|create_container|delete_container|list_objects|upload_object|delete_object>",
            ),
            other => Outcome::failure(format!("unknown files command '{}'", other)),
        }
    }

    fn complete(&self, line: &str) -> Vec<String> {
        complete_line(line, SUBCOMMANDS, params_for)
    }
}
