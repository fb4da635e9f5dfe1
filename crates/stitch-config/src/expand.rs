//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Supports:
/// - `${VAR}` - expands to the value of VAR, errors if unset
/// - `${VAR:-default}` - expands to VAR if set, otherwise uses default
///
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        std::env::var(var).map(Some).map_err(|_| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Expand an optional string field.
pub(crate) fn expand_env_opt(
    value: Option<&String>,
    field: &str,
) -> Result<Option<String>, ConfigError> {
    value.map(|v| expand_env(v, field)).transpose()
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_plain_value_unchanged() {
        assert_eq!(expand_env("/docs", "f").unwrap(), "/docs");
        assert_eq!(expand_env("$HOME", "f").unwrap(), "$HOME");
    }

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("STITCH_TEST_PREFIX", "/v8.0");
        }
        let result = expand_env("${STITCH_TEST_PREFIX}/docs", "assembler.site_prefix").unwrap();
        assert_eq!(result, "/v8.0/docs");
        unsafe {
            std::env::remove_var("STITCH_TEST_PREFIX");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("STITCH_UNSET_VAR");
        }
        let result = expand_env("${STITCH_UNSET_VAR:-/docs}", "test.field").unwrap();
        assert_eq!(result, "/docs");
    }

    #[test]
    fn test_expand_missing_var_errors() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("STITCH_MISSING_VAR");
        }
        let err = expand_env("${STITCH_MISSING_VAR}", "codex.site_prefix").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EnvVar { ref field, ref message }
                if field == "codex.site_prefix" && message == "${STITCH_MISSING_VAR} not set"
        ));
    }

    #[test]
    fn test_expand_opt_none() {
        assert_eq!(expand_env_opt(None, "f").unwrap(), None);
    }
}
