//! Prompt-specific error types.

use thiserror::Error;

/// Errors raised while looking up or rendering a prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt not found: {0}")]
    NotFound(String),

    /// A required argument was absent or blank.
    #[error("Prompt '{prompt}' requires argument '{argument}'")]
    MissingArgument { prompt: String, argument: String },

    #[error("Template error: {0}")]
    TemplateError(String),
}

impl PromptError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn missing_argument(prompt: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            prompt: prompt.into(),
            argument: argument.into(),
        }
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::TemplateError(msg.into())
    }
}
