use error_stack::Report;

use kernel::KernelError;

pub mod database;
pub mod error;
pub mod event;

/// Reads `key` from the process environment or a `.env` file. An unset variable is `None`.
pub(crate) fn env(key: &str) -> error_stack::Result<Option<String>, KernelError> {
    match dotenvy::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(None),
        Err(error) => Err(Report::new(error)
            .change_context(KernelError::Internal)
            .attach_printable(format!("Failed to read environment variable `{key}`"))),
    }
}

pub(crate) fn env_or(key: &str, default: &str) -> error_stack::Result<String, KernelError> {
    Ok(env(key)?.unwrap_or_else(|| default.to_string()))
}
