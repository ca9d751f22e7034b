//! Shared helpers for command handlers.

use serde_json::{Map, Value};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Turn a 404 into a `NotFound` that points at the matching list command.
pub fn or_not_found(
    err: hutch_api::Error,
    resource_type: &str,
    identifier: &str,
    list_command: &str,
) -> CliError {
    if err.is_not_found() {
        CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        }
    } else {
        err.into()
    }
}

/// Parse repeated `key=value` flags into an argument table.
///
/// Values that parse as JSON (numbers, booleans, objects) keep their type;
/// anything else is taken as a string.
pub fn parse_key_values(field: &str, pairs: &[String]) -> Result<Map<String, Value>, CliError> {
    let mut map = Map::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            return Err(CliError::Validation {
                field: field.into(),
                reason: format!("expected KEY=VALUE, got '{pair}'"),
            });
        };
        if key.is_empty() {
            return Err(CliError::Validation {
                field: field.into(),
                reason: format!("empty key in '{pair}'"),
            });
        }
        let value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        map.insert(key.to_owned(), value);
    }
    Ok(map)
}
