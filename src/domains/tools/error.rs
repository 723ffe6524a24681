//! Tool-specific error types.
//!
//! Only conditions that abort a call live here. Upstream HTTP errors and
//! empty result sets are not errors: the response mappers render them as
//! text.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Errors that abort a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments were absent, or a required one was missing.
    #[error("Missing arguments: {0}")]
    MissingArguments(String),

    /// An argument was present but could not be coerced to its declared type.
    #[error("Invalid type for argument '{name}': expected {expected}, got {found}")]
    InvalidArgumentType {
        name: String,
        expected: &'static str,
        found: String,
    },

    /// An argument the tool does not declare.
    #[error("Unknown argument '{argument}' for tool '{tool}'")]
    UnknownArgument { tool: String, argument: String },

    /// A second descriptor tried to register an existing name.
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// The upstream could not be reached (DNS, refused, timeout, broken body).
    #[error("Transport error: {0}")]
    Transport(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "missing arguments" error.
    pub fn missing_arguments(msg: impl Into<String>) -> Self {
        Self::MissingArguments(msg.into())
    }

    /// Create a new "invalid argument type" error.
    pub fn invalid_type(
        name: impl Into<String>,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::InvalidArgumentType {
            name: name.into(),
            expected,
            found: found.into(),
        }
    }

    /// Create a new "transport" error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller sent a bad request (as opposed to a server-side failure).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownTool(_)
                | Self::MissingArguments(_)
                | Self::InvalidArgumentType { .. }
                | Self::UnknownArgument { .. }
        )
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        if err.is_client_error() {
            McpError::invalid_params(err.to_string(), None)
        } else {
            McpError::internal_error(err.to_string(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        assert!(ToolError::unknown_tool("nope").is_client_error());
        assert!(ToolError::missing_arguments("drug_name").is_client_error());
        assert!(ToolError::invalid_type("limit", "integer", "\"ten\"").is_client_error());
        assert!(!ToolError::transport("connection refused").is_client_error());
        assert!(!ToolError::internal("boom").is_client_error());
    }

    #[test]
    fn test_invalid_type_message() {
        let err = ToolError::invalid_type("limit", "positive integer", "\"ten\"");
        assert_eq!(
            err.to_string(),
            "Invalid type for argument 'limit': expected positive integer, got \"ten\""
        );
    }
}
