//! Prompt templates.
//!
//! Templates use plain `{{variable}}` placeholders. Rendering checks that
//! every required argument is supplied, substitutes the known ones and
//! drops placeholders left over for optional arguments.

use rmcp::model::PromptArgument;
use std::collections::HashMap;

use super::error::PromptError;

/// A prompt template that can be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The unique name of the prompt.
    pub name: String,

    /// A description of what the prompt does.
    pub description: Option<String>,

    /// The arguments that this prompt accepts.
    pub arguments: Vec<PromptArgument>,

    /// The template string with placeholders.
    pub template: String,
}

impl PromptTemplate {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        arguments: Vec<PromptArgument>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            arguments,
            template: template.into(),
        }
    }

    /// Render the template with the given arguments.
    pub fn render(&self, arguments: &HashMap<String, String>) -> Result<String, PromptError> {
        for arg in &self.arguments {
            let supplied = arguments.get(&arg.name).is_some_and(|v| !v.trim().is_empty());
            if arg.required.unwrap_or(false) && !supplied {
                return Err(PromptError::missing_argument(&self.name, &arg.name));
            }
        }

        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                return Err(PromptError::template(format!(
                    "Unclosed placeholder in prompt '{}'",
                    self.name
                )));
            };
            let key = after[..end].trim();
            if let Some(value) = arguments.get(key) {
                out.push_str(value);
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);

        Ok(out)
    }
}
