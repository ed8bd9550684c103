use stratus_provider::LbNode;
use stratus_types::ParamSpec;

use crate::command::{Command, Outcome};
use crate::context::ShellContext;
use crate::plugins::{arg, checked_args, complete_line, numeric_arg, split_first};

const SUBCOMMANDS: &[&str] = &["add_node", "create", "delete", "details", "list"];

const CREATE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("name"),
    ParamSpec::required("port"),
    ParamSpec::required("protocol"),
    ParamSpec::required("node_address"),
    ParamSpec::optional("node_port", "80"),
    ParamSpec::optional("virtual_ip_type", "PUBLIC"),
];
const DETAILS_PARAMS: &[ParamSpec] = &[ParamSpec::required("id")];
const DELETE_PARAMS: &[ParamSpec] = &[ParamSpec::required("id")];
const ADD_NODE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("id"),
    ParamSpec::required("address"),
    ParamSpec::required("port"),
];

fn params_for(sub: &str) -> &'static [ParamSpec] {
    match sub {
        "create" => CREATE_PARAMS,
        "details" => DETAILS_PARAMS,
        "delete" => DELETE_PARAMS,
        "add_node" => ADD_NODE_PARAMS,
        _ => &[],
    }
}

/// Load balancers and their backend nodes.
pub struct LoadBalancersPlugin;

impl LoadBalancersPlugin {
    fn list(&self, ctx: &ShellContext) -> Outcome {
        match ctx.provider().loadbalancers.list_load_balancers() {
            Ok(balancers) => {
                for lb in &balancers {
                    println!(
                        "{:<38} {:<16} {:<6} {:>5} {:<10} {} nodes",
                        lb.id,
                        lb.name,
                        lb.protocol,
                        lb.port,
                        lb.status,
                        lb.nodes.len()
                    );
                }
                Outcome::success(format!("{} load balancers", balancers.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn create(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, CREATE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let port: u16 = match numeric_arg(&args, "port") {
            Ok(port) => port,
            Err(outcome) => return outcome,
        };
        let node_port: u16 = match numeric_arg(&args, "node_port") {
            Ok(port) => port,
            Err(outcome) => return outcome,
        };
        let node = LbNode {
            address: arg(&args, "node_address").to_string(),
            port: node_port,
            condition: "ENABLED".to_string(),
        };
        match ctx.provider().loadbalancers.create_load_balancer(
            arg(&args, "name"),
            port,
            arg(&args, "protocol"),
            arg(&args, "virtual_ip_type"),
            node,
        ) {
            Ok(lb) => Outcome::success(format!("load balancer {} created, id {}", lb.name, lb.id)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn details(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, DETAILS_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        match ctx
            .provider()
            .loadbalancers
            .get_load_balancer(arg(&args, "id"))
        {
            Ok(lb) => match serde_json::to_string_pretty(&lb) {
                Ok(json) => {
                    println!("{}", json);
                    Outcome::success(format!("load balancer {} is {}", lb.name, lb.status))
                }
                Err(e) => Outcome::failure(e.to_string()),
            },
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn delete(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, DELETE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let id = arg(&args, "id");
        match ctx.provider().loadbalancers.delete_load_balancer(id) {
            Ok(()) => Outcome::success(format!("load balancer {} deleted", id)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn add_node(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, ADD_NODE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let port: u16 = match numeric_arg(&args, "port") {
            Ok(port) => port,
            Err(outcome) => return outcome,
        };
        let node = LbNode {
            address: arg(&args, "address").to_string(),
            port,
            condition: "ENABLED".to_string(),
        };
        match ctx
            .provider()
            .loadbalancers
            .add_node(arg(&args, "id"), node)
        {
            Ok(lb) => Outcome::success(format!(
                "load balancer {} now has {} nodes",
                lb.name,
                lb.nodes.len()
            )),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }
}

impl Command for LoadBalancersPlugin {
    fn name(&self) -> &'static str {
        "loadbalancers"
    }

    fn summary(&self) -> &'static str {
        "manage load balancers"
    }

    fn execute(&self, ctx: &ShellContext, line: &str) -> Outcome {
        let (sub, rest) = split_first(line);
        match sub {
            "list" => self.list(ctx),
            "create" => self.create(ctx, rest),
            "details" => self.details(ctx, rest),
            "delete" => self.delete(ctx, rest),
            "add_node" => self.add_node(ctx, rest),
            "" => Outcome::failure("usage: loadbalancers <list|create|details|delete|add_node>"),
            other => Outcome::failure(format!("unknown loadbalancers command '{}'", other)),
        }
    }

    fn complete(&self, line: &str) -> Vec<String> {
        complete_line(line, SUBCOMMANDS, params_for)
    }
}
