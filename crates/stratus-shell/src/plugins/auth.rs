use stratus_provider::Credentials;
use stratus_types::ParamSpec;

use crate::command::{Command, Outcome};
use crate::context::ShellContext;
use crate::plugins::{arg, checked_args, complete_line, split_first};

const SUBCOMMANDS: &[&str] = &["endpoints", "login", "status", "token_login"];

const LOGIN_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("username"),
    ParamSpec::required("api_key"),
    ParamSpec::optional("identity_type", "keystone"),
    ParamSpec::optional("region", "LON"),
];
const TOKEN_LOGIN_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("token"),
    ParamSpec::required("tenant_id"),
    ParamSpec::optional("region", "LON"),
];

fn params_for(sub: &str) -> &'static [ParamSpec] {
    match sub {
        "login" => LOGIN_PARAMS,
        "token_login" => TOKEN_LOGIN_PARAMS,
        _ => &[],
    }
}

/// Authentication against the provider plus the service catalog.
pub struct AuthPlugin;

impl AuthPlugin {
    fn login(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, LOGIN_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let credentials = Credentials {
            username: arg(&args, "username").to_string(),
            api_key: arg(&args, "api_key").to_string(),
            region: arg(&args, "region").to_string(),
            identity_type: arg(&args, "identity_type").to_string(),
            ..Default::default()
        };
        self.authenticate(ctx, credentials)
    }

    fn token_login(&self, ctx: &ShellContext, rest: &str) -> Outcome {
        let args = match checked_args(ctx, rest, TOKEN_LOGIN_PARAMS) {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };
        let credentials = Credentials {
            token: arg(&args, "token").to_string(),
            tenant_id: arg(&args, "tenant_id").to_string(),
            region: arg(&args, "region").to_string(),
            identity_type: "token".to_string(),
            ..Default::default()
        };
        self.authenticate(ctx, credentials)
    }

    fn authenticate(&self, ctx: &ShellContext, credentials: Credentials) -> Outcome {
        match ctx.provider().identity.authenticate(&credentials) {
            Ok(true) => {
                let who = ctx
                    .provider()
                    .identity
                    .whoami()
                    .unwrap_or_else(|| "unknown".to_string());
                Outcome::success(format!(
                    "authenticated as {} ({})",
                    who, credentials.region
                ))
            }
            Ok(false) => Outcome::failure("authentication failed, check the supplied credentials"),
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    fn status(&self, ctx: &ShellContext) -> Outcome {
        if ctx.provider().identity.is_authenticated() {
            let who = ctx
                .provider()
                .identity
                .whoami()
                .unwrap_or_else(|| "unknown".to_string());
            Outcome::success(format!("authenticated as {}", who))
        } else {
            Outcome::success("not authenticated")
        }
    }

    fn endpoints(&self, ctx: &ShellContext) -> Outcome {
        match ctx.provider().identity.endpoints() {
            Ok(endpoints) => {
                for ep in &endpoints {
                    println!("{:<14} {:<6} {}", ep.service, ep.region, ep.url);
                }
                Outcome::success(format!("{} endpoints", endpoints.len()))
            }
            Err(e) => Outcome::failure(e.to_string()),
        }
    }
}

impl Command for AuthPlugin {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn summary(&self) -> &'static str {
        "authenticate and inspect the session"
    }

    fn execute(&self, ctx: &ShellContext, line: &str) -> Outcome {
        let (sub, rest) = split_first(line);
        match sub {
            "login" => self.login(ctx, rest),
            "token_login" => self.token_login(ctx, rest),
            "status" => self.status(ctx),
            "endpoints" => self.endpoints(ctx),
            "" => Outcome::failure("usage: auth <login|token_login|status|endpoints>"),
            other => Outcome::failure(format!("unknown auth command '{}'", other)),
        }
    }

    fn complete(&self, line: &str) -> Vec<String> {
        complete_line(line, SUBCOMMANDS, params_for)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ShellContext;

    #[test]
    fn test_login_with_default_region() {
        let ctx = ShellContext::in_memory();
        let outcome = AuthPlugin.execute(&ctx, "login username:ops api_key:secret");
        assert_eq!(outcome.retcode, 0, "{}", outcome.message);
        assert!(outcome.message.contains("ops"));
        assert!(outcome.message.contains("LON"));
        assert!(ctx.provider().identity.is_authenticated());
    }

    #[test]
    fn test_login_missing_api_key() {
        let ctx = ShellContext::in_memory();
        let outcome = AuthPlugin.execute(&ctx, "login username:ops");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("'api_key'"));
        assert!(!ctx.provider().identity.is_authenticated());
    }

    #[test]
    fn test_login_unknown_region() {
        let ctx = ShellContext::in_memory();
        let outcome = AuthPlugin.execute(&ctx, "login username:ops api_key:secret region:MARS");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("invalid request"));
    }

    #[test]
    fn test_token_login() {
        let ctx = ShellContext::in_memory();
        let outcome = AuthPlugin.execute(&ctx, "token_login token:tok-1 tenant_id:t-9");
        assert_eq!(outcome.retcode, 0, "{}", outcome.message);
        assert!(ctx.provider().identity.is_authenticated());
    }

    #[test]
    fn test_status_before_and_after_login() {
        let ctx = ShellContext::in_memory();
        let before = AuthPlugin.execute(&ctx, "status");
        assert_eq!(before.retcode, 0);
        assert_eq!(before.message, "not authenticated");

        AuthPlugin.execute(&ctx, "login username:ops api_key:secret");
        let after = AuthPlugin.execute(&ctx, "status");
        assert!(after.message.contains("ops"));
    }

    #[test]
    fn test_endpoints_requires_login() {
        let ctx = ShellContext::in_memory();
        let outcome = AuthPlugin.execute(&ctx, "endpoints");
        assert_eq!(outcome.retcode, 1);
        assert!(outcome.message.contains("not authenticated"));
    }

    #[test]
    fn test_endpoints_after_login() {
        let ctx = ShellContext::in_memory();
        AuthPlugin.execute(&ctx, "login username:ops api_key:secret");
        let outcome = AuthPlugin.execute(&ctx, "endpoints");
        assert_eq!(outcome.retcode, 0);
        assert!(outcome.message.ends_with("endpoints"));
    }

    #[test]
    fn test_completion_hints() {
        assert_eq!(AuthPlugin.complete("login us"), vec!["username:"]);
        assert_eq!(AuthPlugin.complete("token_login te"), vec!["tenant_id:"]);
        assert_eq!(AuthPlugin.complete("st"), vec!["status"]);
    }
}
