//! Environment-derived account configuration

use snbench_core::CoreError;
use snbench_sync::Credentials;

pub const EMAIL_VAR: &str = "SN_EMAIL";
pub const PASSWORD_VAR: &str = "SN_PASSWORD";
pub const SERVER_VAR: &str = "SN_SERVER";

/// Read credentials from the process environment
pub fn credentials_from_env() -> Result<Credentials, CoreError> {
    credentials_from_lookup(|name| std::env::var(name).ok())
}

/// Read credentials through `lookup`. Email and password must be present
/// and non-empty; the server falls back to the public sync endpoint.
pub fn credentials_from_lookup<F>(lookup: F) -> Result<Credentials, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |name: &str| {
        lookup(name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| CoreError::Config(format!("environment variable {name} is required")))
    };

    let email = required(EMAIL_VAR)?;
    let password = required(PASSWORD_VAR)?;
    Ok(Credentials::new(email, password, lookup(SERVER_VAR)))
}
