//! Prompt definitions module.
//!
//! Each prompt is defined in its own file with its metadata, arguments and
//! template string, then registered in `registry.rs`.

use rmcp::model::PromptArgument;

mod drug_safety_report;

pub use drug_safety_report::DrugSafetyReportPrompt;

/// Trait for prompt definitions.
pub trait PromptDefinition {
    /// The unique name of the prompt.
    const NAME: &'static str;

    /// A description of what the prompt does.
    const DESCRIPTION: &'static str;

    /// The template string with {{variable}} placeholders.
    fn template() -> &'static str;

    /// The arguments this prompt accepts.
    fn arguments() -> Vec<PromptArgument>;
}
