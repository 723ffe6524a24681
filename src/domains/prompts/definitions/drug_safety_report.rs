//! Drug safety report prompt definition.

use super::PromptDefinition;
use rmcp::model::PromptArgument;

/// Asks the model to assemble a safety report from both openFDA tools.
pub struct DrugSafetyReportPrompt;

impl PromptDefinition for DrugSafetyReportPrompt {
    const NAME: &'static str = "drug_safety_report";
    const DESCRIPTION: &'static str = "Generate a template for a drug safety report.";

    fn template() -> &'static str {
        r#"Please generate a comprehensive safety report for the drug "{{drug_name}}".

Use the `search_drug_label` tool to find official warnings and usage instructions.
Use the `get_drug_adverse_events` tool to find reported adverse events.

Structure the report as follows:
1. **Executive Summary**: Brief overview of the drug and key safety concerns.
2. **Official Warnings**: Boxed warnings, contraindications, and major precautions from the label.
3. **Reported Adverse Events**: Summary of common and serious adverse events found in the FDA database.
4. **Conclusion**: Assessment of the safety profile based on the available data.
"#
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![PromptArgument {
            name: "drug_name".to_string(),
            title: None,
            description: Some("The name of the drug to report on".to_string()),
            required: Some(true),
        }]
    }
}
