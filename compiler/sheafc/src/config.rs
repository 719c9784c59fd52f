//! Engine configuration.
//!
//! Defaults suit a library caller; the `sheaf` binary reads overrides from
//! the environment with [`EngineConfig::from_env`].

use sheaf_value::InternalErrorPolicy;

/// `panic` or `report`.
pub const INTERNAL_ERRORS_VAR: &str = "SHEAF_INTERNAL_ERRORS";
/// Worker threads for column evaluation; `0` uses the rayon default.
pub const THREADS_VAR: &str = "SHEAF_THREADS";
/// `1` to record operand results while evaluating.
pub const EXPLAIN_VAR: &str = "SHEAF_EXPLAIN";
/// Maximum diagnostics returned by a check; `0` for no limit.
pub const MAX_ERRORS_VAR: &str = "SHEAF_MAX_ERRORS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub internal_errors: InternalErrorPolicy,
    pub threads: usize,
    pub explain: bool,
    pub max_errors: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            internal_errors: InternalErrorPolicy::default(),
            threads: 0,
            explain: false,
            max_errors: 0,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by the `SHEAF_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    ///
    /// Unreadable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = EngineConfig::default();
        if let Some(value) = lookup(INTERNAL_ERRORS_VAR) {
            match InternalErrorPolicy::parse(&value) {
                Some(policy) => config.internal_errors = policy,
                None => ignored(INTERNAL_ERRORS_VAR, &value),
            }
        }
        if let Some(value) = lookup(THREADS_VAR) {
            match value.trim().parse() {
                Ok(threads) => config.threads = threads,
                Err(_) => ignored(THREADS_VAR, &value),
            }
        }
        if let Some(value) = lookup(EXPLAIN_VAR) {
            match parse_flag(&value) {
                Some(explain) => config.explain = explain,
                None => ignored(EXPLAIN_VAR, &value),
            }
        }
        if let Some(value) = lookup(MAX_ERRORS_VAR) {
            match value.trim().parse() {
                Ok(max) => config.max_errors = max,
                Err(_) => ignored(MAX_ERRORS_VAR, &value),
            }
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn ignored(name: &str, value: &str) {
    tracing::warn!(variable = name, value, "ignoring unreadable setting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_from(vars: &[(&str, &str)]) -> EngineConfig {
        EngineConfig::from_lookup(|name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())
        })
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(config_from(&[]), EngineConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            (INTERNAL_ERRORS_VAR, "report"),
            (THREADS_VAR, "4"),
            (EXPLAIN_VAR, "1"),
            (MAX_ERRORS_VAR, "10"),
        ]);
        assert_eq!(
            config,
            EngineConfig {
                internal_errors: InternalErrorPolicy::Report,
                threads: 4,
                explain: true,
                max_errors: 10,
            }
        );
    }

    #[test]
    fn unreadable_values_keep_defaults() {
        let config = config_from(&[(THREADS_VAR, "many"), (EXPLAIN_VAR, "perhaps")]);
        assert_eq!(config.threads, 0);
        assert!(!config.explain);
    }
}
