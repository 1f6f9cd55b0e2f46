//! Home directory and environment variable expansion for path values.

use crate::ConfigError;

/// Expand `~` and environment variable references in a path value.
///
/// - `~` or `~/...` at the start expands to the home directory
/// - `${VAR}` expands to the value of VAR, errors if unset
/// - `${VAR:-default}` expands to VAR if set, otherwise uses default
///
/// Bare `$VAR` (without braces) is left as is.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    let value = if value.contains("${") {
        shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
            match std::env::var(var) {
                Ok(val) => Ok(Some(val)),
                Err(_) => Err(LookupError {
                    var_name: var.to_owned(),
                }),
            }
        })
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{0}}} not set", e.cause.var_name),
        })?
        .into_owned()
    } else {
        value.to_owned()
    };

    Ok(shellexpand::tilde(&value).into_owned())
}

struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_var_in_path() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DD_TEST_DECKS", "/srv/decks");
        }
        let result = expand_path("${DD_TEST_DECKS}/out.json", "build.output").unwrap();
        assert_eq!(result, "/srv/decks/out.json");
        unsafe {
            std::env::remove_var("DD_TEST_DECKS");
        }
    }

    #[test]
    fn test_expand_default_value() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DD_TEST_UNSET");
        }
        let result = expand_path("${DD_TEST_UNSET:-slides}/t.toml", "build.template").unwrap();
        assert_eq!(result, "slides/t.toml");
    }

    #[test]
    fn test_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DD_TEST_MISSING");
        }
        let err = expand_path("${DD_TEST_MISSING}/t.toml", "build.template").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("DD_TEST_MISSING"));
        assert!(err.to_string().contains("build.template"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_path("decks/$name.json", "build.output").unwrap();
        assert_eq!(result, "decks/$name.json");
    }

    #[test]
    fn test_tilde_expands_to_home() {
        if std::env::var_os("HOME").is_none() {
            return;
        }
        let result = expand_path("~/decks/out.json", "build.output").unwrap();
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("/decks/out.json"));
    }
}
