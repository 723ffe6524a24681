//! Prompt service implementation.
//!
//! The PromptService holds the registered prompt templates and renders them
//! on request. Prompts are defined in `definitions/` and registered via
//! `registry.rs`.

use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};
use std::collections::HashMap;
use tracing::info;

use super::error::PromptError;
use super::registry::get_all_prompts;
use super::templates::PromptTemplate;
use crate::core::config::PromptsConfig;

/// Service for listing and instantiating prompts.
pub struct PromptService {
    /// Registered prompts, in registration order.
    prompts: Vec<PromptTemplate>,
}

impl PromptService {
    /// Create a new PromptService with the given configuration.
    pub fn new(_config: PromptsConfig) -> Self {
        info!("Initializing PromptService");

        let prompts = get_all_prompts();
        for template in &prompts {
            info!("Registering prompt: {}", template.name);
        }

        Self { prompts }
    }

    fn find(&self, name: &str) -> Option<&PromptTemplate> {
        self.prompts.iter().find(|p| p.name == name)
    }

    /// List all available prompts.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts
            .iter()
            .map(|template| Prompt {
                name: template.name.clone(),
                title: None,
                description: template.description.clone(),
                arguments: Some(template.arguments.clone()),
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Get a prompt with arguments substituted.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let template = self.find(name).ok_or_else(|| PromptError::not_found(name))?;

        let content = template.render(&arguments.unwrap_or_default())?;

        Ok(GetPromptResult {
            description: template.description.clone(),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }
}
