//! Request DTOs for the HTTP facade
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for `POST /resp/serialise`
///
/// # Fields
/// - `command`: The command name, e.g. `SET`
/// - `args`: Positional arguments (may be omitted)
#[derive(Debug, Clone, Deserialize)]
pub struct SerialiseRequest {
    /// The command name
    pub command: String,
    /// Arguments following the command
    #[serde(default)]
    pub args: Vec<String>,
}

impl SerialiseRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.command.trim().is_empty() {
            return Some("Command cannot be empty".to_string());
        }
        None
    }
}
