//! Tool handler contract.
//!
//! A handler receives arguments that already passed schema validation and
//! composes the query builder, the upstream client and its response mapper
//! into a report.

use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::client::UpstreamFetch;
use super::error::ToolError;
use super::query::QueryBuilder;

/// Everything a handler needs to reach openFDA. Shared read-only by all calls.
#[derive(Clone)]
pub struct ToolContext {
    pub queries: QueryBuilder,
    pub client: Arc<dyn UpstreamFetch>,
}

impl ToolContext {
    pub fn new(queries: QueryBuilder, client: Arc<dyn UpstreamFetch>) -> Self {
        Self { queries, client }
    }
}

/// Trait implemented by every tool definition.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with validated arguments, returning the report text.
    async fn call(&self, arguments: JsonObject, ctx: &ToolContext) -> Result<String, ToolError>;
}

/// Deserialize validated arguments into a tool's parameter struct.
pub fn parse_params<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, ToolError> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| ToolError::internal(format!("Validated arguments did not deserialize: {}", e)))
}
