//! Environment variable expansion in `rw.toml` string values.
//!
//! `${VAR}` is replaced with the variable's value and `${VAR:-fallback}`
//! falls back when it is unset. A bare `$VAR` stays literal so paths and
//! URLs containing `$` are left alone.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `${...}` references in the value of config field `field`.
pub(crate) fn expand_env(value: &str, field: &'static str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |var: &str| std::env::var(var).map(Some);
    shellexpand::env_with_context(value, lookup)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field,
            var: e.var_name,
        })
}

/// Expand an optional field in place.
pub(crate) fn expand_opt(
    value: &mut Option<String>,
    field: &'static str,
) -> Result<(), ConfigError> {
    if let Some(raw) = value.as_deref() {
        *value = Some(expand_env(raw, field)?);
    }
    Ok(())
}
