use stratus_types::ParamSpec;

use crate::command::{Command, Outcome};
use crate::context::ShellContext;
use crate::plugins::{arg, checked_args, complete_line, numeric_arg, split_first};

const SUBCOMMANDS: &[&str] = &[
    "add_record",
    "create",
    "delete",
    "delete_record",
    "list",
    "list_records",
];

const CREATE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("name"),
    ParamSpec::required("email_address"),
    ParamSpec::optional("ttl", "3600"),
];
const DELETE_PARAMS: &[ParamSpec] = &[ParamSpec::required("id")];
const LIST_RECORDS_PARAMS: &[ParamSpec] = &[ParamSpec::required("domain_id")];
const ADD_RECORD_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("domain_id"),
    ParamSpec::required("type"),
    ParamSpec::required("name"),
    ParamSpec::required("data"),
    ParamSpec::optional("ttl", "3600"),
];
const DELETE_RECORD_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("domain_id"),
    ParamSpec::required("record_id"),
];

fn params_for(sub: &str) -> &'static [ParamSpec] {
    match sub {
        "create" => CREATE_PARAMS,
        "delete" => DELETE_PARAMS,
        "list_records" => LIST_RECORDS_PARAMS,
        "add_record" => ADD_RECORD_PARAMS,
        "delete_record" => DELETE_RECORD_PARAMS,
        _ => &[],
    }
}

/// DNS domains and their records.
pub struct DnsPlugin;

impl DnsPlugin {
    fn list(&self, ctx: &ShellContext) -> Outcome {
        match ctx.provider().dns.list_domains() {
            Ok(domains) => {
                for d in &domains {
                    println!("{:<38} {:<24} {:<24} ttl {}", d.id, d.name, d.email, d.ttl);
                }
                Outcome::success(format!("{} domains", domains.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn create(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, CREATE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let ttl: u32 = match numeric_arg(&args, "ttl") {
            Ok(ttl) => ttl,
            Err(outcome) => return outcome,
        };
        match ctx
            .provider()
            .dns
            .create_domain(arg(&args, "name"), arg(&args, "email_address"), ttl)
        {
            Ok(domain) => Outcome::success(format!("domain {} created, id {}", domain.name, domain.id)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn delete(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, DELETE_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let id = arg(&args, "id");
        match ctx.provider().dns.delete_domain(id) {
            Ok(()) => Outcome::success(format!("domain {} deleted", id)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn list_records(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, LIST_RECORDS_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        match ctx.provider().dns.list_records(arg(&args, "domain_id")) {
            Ok(records) => {
                for r in &records {
                    println!(
                        "{:<38} {:<6} {:<28} {:<24} ttl {}",
                        r.id, r.record_type, r.name, r.data, r.ttl
                    );
                }
                Outcome::success(format!("{} records", records.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn add_record(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, ADD_RECORD_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let ttl: u32 = match numeric_arg(&args, "ttl") {
            Ok(ttl) => ttl,
            Err(outcome) => return outcome,
        };
        match ctx.provider().dns.add_record(
            arg(&args, "domain_id"),
            arg(&args, "type"),
            arg(&args, "name"),
            arg(&args, "data"),
            ttl,
        ) {
            Ok(record) => Outcome::success(format!(
                "{} record {} added, id {}",
                record.record_type, record.name, record.id
            )),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn delete_record(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, DELETE_RECORD_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let record_id = arg(&args, "record_id");
        match ctx
            .provider()
            .dns
            .delete_record(arg(&args, "domain_id"), record_id)
        {
            Ok(()) => Outcome::success(format!("record {} deleted", record_id)),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }
}

impl Command for DnsPlugin {
    fn name(&self) -> &'static str {
        "dns"
    }

    fn summary(&self) -> &'static str {
        "manage DNS domains and records"
    }

    fn execute(&self, ctx: &ShellContext, line: &str) -> Outcome {
        let (sub, rest) = split_first(line);
        match sub {
            "list" => self.list(ctx),
            "create" => self.create(ctx, rest),
            "delete" => self.delete(ctx, rest),
            "list_records" => self.list_records(ctx, rest),
            "add_record" => self.add_record(ctx, rest),
            "delete_record" => self.delete_record(ctx, rest),
            "" => Outcome::failure(
                "usage: dns <list|create|delete|list_records|add_record|delete_record>",
            ),
            other => Outcome::failure(format!("unknown dns command '{}'", other)),
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
    fn test_list_seeded_domain() {
        let ctx = authed_ctx();
        let outcome = DnsPlugin.execute(&ctx, "list");
        assert_eq!(outcome.retcode, 0);
        assert_eq!(outcome.message, "1 domains");
    }

    #[test]
    fn test_create_with_default_ttl() {
        let ctx = authed_ctx();
        let outcome = DnsPlugin.execute(&ctx, "create name:shop.example email_address:ops@example.com");
        assert_eq!(outcome.retcode, 0, "{}", outcome.message);
        assert!(outcome.message.contains("shop.example"));
    }

    #[test]
    fn test_create_rejects_non_numeric_ttl() {
        let ctx = authed_ctx();
        let outcome =
            DnsPlugin.execute(&ctx, "create name:shop.example email_address:ops@example.com ttl:soon");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("'ttl'"));
    }

    #[test]
    fn test_add_record_validates_type() {
        let ctx = authed_ctx();
        let outcome = DnsPlugin.execute(
            &ctx,
            "add_record domain_id:d-2001 type:BOGUS name:www.example.com data:203.0.113.9",
        );
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("invalid request"));
    }

    #[test]
    fn test_record_round_trip() {
        let ctx = authed_ctx();
        let added = DnsPlugin.execute(
            &ctx,
            "add_record domain_id:d-2001 type:A name:www.example.com data:203.0.113.9",
        );
        assert_eq!(added.retcode, 0, "{}", added.message);

        let listed = DnsPlugin.execute(&ctx, "list_records domain_id:d-2001");
        // Two seeded records plus the one just added.
        assert_eq!(listed.message, "3 records");

        let deleted = DnsPlugin.execute(&ctx, "delete_record domain_id:d-2001 record_id:r-2101");
        assert_eq!(deleted.retcode, 0);
    }

    #[test]
    fn test_delete_unknown_domain() {
        let ctx = authed_ctx();
        let outcome = DnsPlugin.execute(&ctx, "delete id:d-none");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("'d-none'"));
    }

    #[test]
    fn test_completion_hints() {
        assert_eq!(DnsPlugin.complete("create em"), vec!["email_address:"]);
        assert_eq!(DnsPlugin.complete("add_record d"), vec!["domain_id:", "data:"]);
    }
}
