use std::collections::HashMap;

use crate::error::{Error, Result};

/// One expected-parameter rule: the parameter is either required or carries
/// a default, never both. The constructors are the only way to build a spec,
/// which keeps that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    name: &'static str,
    default: Option<&'static str>,
}

impl ParamSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            default: None,
        }
    }

    pub const fn optional(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default: Some(default),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Completion hint for this parameter, e.g. `id:`.
    pub fn hint(&self) -> String {
        format!("{}:", self.name)
    }
}

/// Check parsed key-value arguments against a list of specs.
///
/// Present keys are left untouched. An absent key with a default is filled
/// in. An absent required key fails immediately with a message naming the
/// parameter; later specs are not examined. Re-running over an unchanged
/// map with the same specs changes nothing, so callers may validate twice.
pub fn check_params(kvarg: &mut HashMap<String, String>, specs: &[ParamSpec]) -> Result<String> {
    for spec in specs {
        if kvarg.contains_key(spec.name) {
            continue;
        }
        match spec.default {
            Some(value) => {
                kvarg.insert(spec.name.to_string(), value.to_string());
            }
            None => return Err(Error::MissingParameter(spec.name.to_string())),
        }
    }
    Ok("all parameters resolved".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_fails_naming_parameter() {
        let mut kvarg = HashMap::new();
        let err = check_params(&mut kvarg, &[ParamSpec::required("x")]).unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_default_inserted_when_absent() {
        let mut kvarg = HashMap::new();
        check_params(&mut kvarg, &[ParamSpec::optional("y", "r")]).unwrap();
        assert_eq!(kvarg["y"], "r");
    }

    #[test]
    fn test_present_key_left_alone() {
        let mut kvarg = HashMap::new();
        kvarg.insert("y".to_string(), "given".to_string());
        check_params(&mut kvarg, &[ParamSpec::optional("y", "r")]).unwrap();
        assert_eq!(kvarg["y"], "given");
    }

    #[test]
    fn test_first_missing_wins() {
        let mut kvarg = HashMap::new();
        let specs = [
            ParamSpec::required("first"),
            ParamSpec::required("second"),
            ParamSpec::optional("third", "t"),
        ];
        let err = check_params(&mut kvarg, &specs).unwrap_err();
        assert_eq!(err, Error::MissingParameter("first".to_string()));
        // fail-fast: nothing past the failure was resolved
        assert!(!kvarg.contains_key("third"));
    }

    #[test]
    fn test_idempotent_over_resolved_map() {
        let mut kvarg = HashMap::new();
        kvarg.insert("name".to_string(), "web01".to_string());
        let specs = [
            ParamSpec::required("name"),
            ParamSpec::optional("ttl", "3600"),
        ];
        check_params(&mut kvarg, &specs).unwrap();
        let snapshot = kvarg.clone();
        check_params(&mut kvarg, &specs).unwrap();
        assert_eq!(kvarg, snapshot);
    }
}
