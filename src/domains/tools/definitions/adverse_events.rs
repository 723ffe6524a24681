//! Adverse event lookup tool.
//!
//! Searches FAERS reports in the openFDA event collection for a medicinal
//! product name and summarizes seriousness, reactions and outcome per report.

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolContext, ToolHandler, parse_params};
use crate::domains::tools::mapper::{EventMapper, ResponseMapper};
use crate::domains::tools::schema::ArgumentSpec;

fn default_limit() -> u32 {
    DrugAdverseEventsTool::DEFAULT_LIMIT
}

/// Parameters for the adverse event lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DrugAdverseEventsParams {
    #[schemars(description = "The name of the drug.")]
    pub drug_name: String,

    #[schemars(description = "Number of results to return (default 5).")]
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, Default)]
pub struct DrugAdverseEventsTool;

impl DrugAdverseEventsTool {
    pub const NAME: &'static str = "get_drug_adverse_events";

    pub const DESCRIPTION: &'static str =
        "Search OpenFDA for adverse events associated with a drug.";

    pub const DEFAULT_LIMIT: u32 = 5;

    pub fn arguments() -> Vec<ArgumentSpec> {
        vec![
            ArgumentSpec::required_string("drug_name"),
            ArgumentSpec::optional_integer("limit", Self::DEFAULT_LIMIT),
        ]
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DrugAdverseEventsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for DrugAdverseEventsTool {
    async fn call(&self, arguments: JsonObject, ctx: &ToolContext) -> Result<String, ToolError> {
        let params: DrugAdverseEventsParams = parse_params(arguments)?;
        info!(
            "Fetching up to {} adverse event report(s) for: {}",
            params.limit, params.drug_name
        );

        let query = ctx.queries.adverse_events(&params.drug_name, params.limit);
        debug!("GET {}?{}", query.path(), query.redacted_query_string());
        let response = ctx.client.fetch(query.path(), &query.params()).await?;

        Ok(EventMapper::render(&response, &params.drug_name))
    }
}
