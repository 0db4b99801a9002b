use std::str::FromStr;

use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// An environment variable is set but its value could not be parsed.
#[derive(Debug, Error)]
#[error("Invalid value {value:?} for environment variable {name}: {message}")]
pub struct InvalidEnvVarError {
    pub name: String,
    pub value: String,
    pub message: String,
}

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

/// Reads an optional override from the environment.
///
/// Unset, empty and whitespace-only values all count as "no override", so a
/// variable can be cleared with `NAME=` without unsetting it.
pub fn env_override(name: &str) -> Option<String> {
    get_env_var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Like [`env_override`], but parses the value with [`FromStr`].
pub fn env_override_parsed<T>(name: &str) -> Result<Option<T>, InvalidEnvVarError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_override(name) {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|e| InvalidEnvVarError {
            name: name.to_string(),
            message: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // SAFETY (all tests): env mutation is serialised through `#[serial]`.

    #[test]
    #[serial]
    fn missing_var_is_reported_by_name() {
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_MISSING") };
        let err = get_env_var("SHARED_UTILS_TEST_MISSING").unwrap_err();
        assert_eq!(err.0, "SHARED_UTILS_TEST_MISSING");
        assert!(err.to_string().contains("SHARED_UTILS_TEST_MISSING"));
    }

    #[test]
    #[serial]
    fn blank_override_counts_as_unset() {
        unsafe { std::env::set_var("SHARED_UTILS_TEST_BLANK", "   ") };
        assert_eq!(env_override("SHARED_UTILS_TEST_BLANK"), None);
        unsafe { std::env::set_var("SHARED_UTILS_TEST_BLANK", " value ") };
        assert_eq!(env_override("SHARED_UTILS_TEST_BLANK").as_deref(), Some("value"));
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_BLANK") };
    }

    #[test]
    #[serial]
    fn parsed_override_reports_bad_values() {
        unsafe { std::env::set_var("SHARED_UTILS_TEST_NUM", "12") };
        assert_eq!(env_override_parsed::<u64>("SHARED_UTILS_TEST_NUM").unwrap(), Some(12));

        unsafe { std::env::set_var("SHARED_UTILS_TEST_NUM", "twelve") };
        let err = env_override_parsed::<u64>("SHARED_UTILS_TEST_NUM").unwrap_err();
        assert_eq!(err.name, "SHARED_UTILS_TEST_NUM");
        assert_eq!(err.value, "twelve");
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_NUM") };
    }
}
