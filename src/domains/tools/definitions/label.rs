//! Drug label search tool.
//!
//! Looks a drug up by brand or generic name in the openFDA structured
//! product label collection and reports indications, dosage and warnings.

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolContext, ToolHandler, parse_params};
use crate::domains::tools::mapper::{LabelMapper, ResponseMapper};
use crate::domains::tools::schema::ArgumentSpec;

fn default_limit() -> u32 {
    SearchDrugLabelTool::DEFAULT_LIMIT
}

/// Parameters for the label search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchDrugLabelParams {
    /// The name of the drug (generic or brand).
    #[schemars(description = "The name of the drug (e.g., 'ibuprofen', 'Advil').")]
    pub drug_name: String,

    /// Number of labels to return (default: 1).
    #[schemars(description = "Number of results to return (default 1).")]
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// openFDA drug label search.
#[derive(Debug, Clone, Default)]
pub struct SearchDrugLabelTool;

impl SearchDrugLabelTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_drug_label";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Search OpenFDA for drug labels by drug name (generic or brand name).";

    pub const DEFAULT_LIMIT: u32 = 1;

    /// Declared arguments, in schema order.
    pub fn arguments() -> Vec<ArgumentSpec> {
        vec![
            ArgumentSpec::required_string("drug_name"),
            ArgumentSpec::optional_integer("limit", Self::DEFAULT_LIMIT),
        ]
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SearchDrugLabelParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for SearchDrugLabelTool {
    async fn call(&self, arguments: JsonObject, ctx: &ToolContext) -> Result<String, ToolError> {
        let params: SearchDrugLabelParams = parse_params(arguments)?;
        info!("Searching drug labels for: {}", params.drug_name);

        let query = ctx.queries.label(&params.drug_name, params.limit);
        debug!("GET {}?{}", query.path(), query.redacted_query_string());
        let response = ctx.client.fetch(query.path(), &query.params()).await?;

        Ok(LabelMapper::render(&response, &params.drug_name))
    }
}
