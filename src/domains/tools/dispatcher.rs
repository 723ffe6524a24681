//! Tool dispatcher - registration, validation and dispatch for all tools.
//!
//! The dispatcher owns the registry of [`ToolDescriptor`]s (built once at
//! startup, immutable afterwards) and is the single entry point used by
//! every transport:
//! - `list_tools()` for metadata, in registration order
//! - `call_tool()` to validate arguments and run the matching handler

use rmcp::model::{Content, JsonObject, Tool};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::client::{RemoteClient, UpstreamFetch};
use super::definitions::{DrugAdverseEventsTool, SearchDrugLabelTool};
use super::error::ToolError;
use super::handlers::{ToolContext, ToolHandler};
use super::query::QueryBuilder;
use super::schema::{ArgumentSpec, validate_arguments};
use crate::core::config::Config;

/// A registered tool: metadata, declared arguments and handler.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub arguments: Vec<ArgumentSpec>,
    pub tool: Tool,
    pub handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    pub fn new(
        tool: Tool,
        name: &'static str,
        arguments: Vec<ArgumentSpec>,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name,
            arguments,
            tool,
            handler,
        }
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Registry of tools plus the shared upstream context they run against.
pub struct ToolDispatcher {
    tools: Vec<ToolDescriptor>,
    context: ToolContext,
}

impl ToolDispatcher {
    /// Build the dispatcher with the production openFDA client.
    pub fn new(config: &Config) -> Result<Self, ToolError> {
        let client = Arc::new(RemoteClient::new(&config.upstream));
        Self::with_client(config, client)
    }

    /// Build the dispatcher against any upstream implementation.
    pub fn with_client(config: &Config, client: Arc<dyn UpstreamFetch>) -> Result<Self, ToolError> {
        let queries = QueryBuilder::new(config.credentials.openfda_api_key.clone());
        let mut dispatcher = Self {
            tools: Vec::new(),
            context: ToolContext::new(queries, client),
        };

        dispatcher.register(ToolDescriptor::new(
            SearchDrugLabelTool::to_tool(),
            SearchDrugLabelTool::NAME,
            SearchDrugLabelTool::arguments(),
            Arc::new(SearchDrugLabelTool),
        ))?;
        dispatcher.register(ToolDescriptor::new(
            DrugAdverseEventsTool::to_tool(),
            DrugAdverseEventsTool::NAME,
            DrugAdverseEventsTool::arguments(),
            Arc::new(DrugAdverseEventsTool),
        ))?;

        Ok(dispatcher)
    }

    /// Add a descriptor. Names must be unique.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), ToolError> {
        if self.descriptor(descriptor.name).is_some() {
            return Err(ToolError::DuplicateTool(descriptor.name.to_string()));
        }
        info!("Registering tool: {}", descriptor.name);
        self.tools.push(descriptor);
        Ok(())
    }

    /// All descriptors, in registration order.
    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn descriptor(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|d| d.name == name)
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|d| d.name).collect()
    }

    /// Tool metadata for `tools/list`, in registration order.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|d| d.tool.clone()).collect()
    }

    /// Validate and execute a tool call.
    ///
    /// Validation failures and transport failures are returned as errors.
    /// Everything else, including upstream error statuses and empty result
    /// sets, comes back as a single text block.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<Vec<Content>, ToolError> {
        let descriptor = self.descriptor(name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", name);
            ToolError::unknown_tool(name)
        })?;

        let validated = validate_arguments(name, &descriptor.arguments, arguments.as_ref())
            .inspect_err(|e| warn!("Rejected call to {}: {}", name, e))?;

        let report = descriptor.handler.call(validated, &self.context).await?;
        Ok(vec![Content::text(report)])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domains::tools::client::UpstreamResponse;
    use rmcp::model::RawContent;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every request and answers with a canned response.
    pub(crate) struct StubUpstream {
        response: Option<UpstreamResponse>,
        pub requests: Mutex<Vec<(String, Vec<(&'static str, String)>)>>,
    }

    impl StubUpstream {
        pub(crate) fn json(body: serde_json::Value) -> Arc<Self> {
            Self::respond(UpstreamResponse::new(200, body.to_string()))
        }

        pub(crate) fn respond(response: UpstreamResponse) -> Arc<Self> {
            Arc::new(Self {
                response: Some(response),
                requests: Mutex::new(Vec::new()),
            })
        }

        /// A stub whose connection always fails.
        pub(crate) fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                response: None,
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl UpstreamFetch for StubUpstream {
        async fn fetch(
            &self,
            path: &str,
            params: &[(&'static str, String)],
        ) -> Result<UpstreamResponse, ToolError> {
            self.requests
                .lock()
                .unwrap()
                .push((path.to_string(), params.to_vec()));
            self.response
                .clone()
                .ok_or_else(|| ToolError::transport("Connection failed: connection refused"))
        }
    }

    fn dispatcher(stub: Arc<StubUpstream>) -> ToolDispatcher {
        ToolDispatcher::with_client(&Config::default(), stub).unwrap()
    }

    fn args(value: serde_json::Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    fn text_of(content: &[Content]) -> String {
        assert_eq!(content.len(), 1, "expected exactly one content block");
        match &content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[test]
    fn test_list_tools_order() {
        let d = dispatcher(StubUpstream::unreachable());
        let names: Vec<_> = d.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["search_drug_label", "get_drug_adverse_events"]);
        assert_eq!(d.tool_names(), vec!["search_drug_label", "get_drug_adverse_events"]);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut d = dispatcher(StubUpstream::unreachable());
        let result = d.register(ToolDescriptor::new(
            SearchDrugLabelTool::to_tool(),
            SearchDrugLabelTool::NAME,
            SearchDrugLabelTool::arguments(),
            Arc::new(SearchDrugLabelTool),
        ));
        assert!(matches!(result, Err(ToolError::DuplicateTool(_))));
        assert_eq!(d.descriptors().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_never_reaches_upstream() {
        let stub = StubUpstream::json(json!({ "results": [] }));
        let d = dispatcher(stub.clone());

        let err = d
            .call_tool("search_device_recalls", args(json!({ "drug_name": "x" })))
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::UnknownTool(ref n) if n == "search_device_recalls"));
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_arguments() {
        let stub = StubUpstream::json(json!({ "results": [] }));
        let d = dispatcher(stub.clone());

        let err = d.call_tool("search_drug_label", None).await.unwrap_err();
        assert!(matches!(err, ToolError::MissingArguments(_)));
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_limit() {
        let stub = StubUpstream::json(json!({ "results": [] }));
        let d = dispatcher(stub.clone());

        let err = d
            .call_tool(
                "get_drug_adverse_events",
                args(json!({ "drug_name": "aspirin", "limit": "many" })),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgumentType { .. }));
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_limit_defaults_per_tool() {
        let stub = StubUpstream::json(json!({ "results": [] }));
        let d = dispatcher(stub.clone());

        d.call_tool("search_drug_label", args(json!({ "drug_name": "a" })))
            .await
            .unwrap();
        d.call_tool("get_drug_adverse_events", args(json!({ "drug_name": "a" })))
            .await
            .unwrap();
        d.call_tool(
            "get_drug_adverse_events",
            args(json!({ "drug_name": "a", "limit": 12 })),
        )
        .await
        .unwrap();

        let requests = stub.requests.lock().unwrap();
        let limits: Vec<_> = requests
            .iter()
            .map(|(_, params)| {
                params
                    .iter()
                    .find(|(k, _)| *k == "limit")
                    .map(|(_, v)| v.clone())
                    .unwrap()
            })
            .collect();
        assert_eq!(limits, vec!["1", "5", "12"]);
        assert_eq!(requests[0].0, "/label.json");
        assert_eq!(requests[1].0, "/event.json");
    }

    #[tokio::test]
    async fn test_api_key_forwarded_when_configured() {
        let stub = StubUpstream::json(json!({ "results": [] }));
        let mut config = Config::default();
        config.credentials.openfda_api_key = Some("k3y".to_string());
        let d = ToolDispatcher::with_client(&config, stub.clone()).unwrap();

        d.call_tool("search_drug_label", args(json!({ "drug_name": "a" })))
            .await
            .unwrap();

        let requests = stub.requests.lock().unwrap();
        assert!(requests[0].1.contains(&("api_key", "k3y".to_string())));
    }

    #[tokio::test]
    async fn test_label_end_to_end() {
        let stub = StubUpstream::json(json!({
            "results": [{
                "openfda": { "brand_name": ["Advil"], "generic_name": ["Ibuprofen"] },
                "indications_and_usage": ["temporarily relieves minor aches and pains"],
                "dosage_and_administration": ["take 1 tablet every 4 to 6 hours"],
                "warnings": ["Allergy alert"]
            }]
        }));
        let d = dispatcher(stub.clone());

        let content = d
            .call_tool("search_drug_label", args(json!({ "drug_name": "ibuprofen" })))
            .await
            .unwrap();

        assert_eq!(
            text_of(&content),
            "Brand Name: Advil\nGeneric Name: Ibuprofen\n\n\
             Indications: temporarily relieves minor aches and pains...\n\n\
             Dosage: take 1 tablet every 4 to 6 hours...\n\n\
             Warnings: Allergy alert..."
        );

        let requests = stub.requests.lock().unwrap();
        assert_eq!(
            requests[0].1,
            vec![
                (
                    "search",
                    r#"(openfda.brand_name:"ibuprofen" openfda.generic_name:"ibuprofen")"#
                        .to_string()
                ),
                ("limit", "1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_adverse_events_end_to_end() {
        let stub = StubUpstream::json(json!({
            "results": [
                {
                    "serious": "1",
                    "patient": { "reaction": [
                        { "reactionmeddrapt": "Haemorrhage", "reactionoutcome": "1" },
                        { "reactionmeddrapt": "Anaemia", "reactionoutcome": "2" }
                    ] }
                },
                {
                    "serious": "2",
                    "patient": { "reaction": [ { "reactionmeddrapt": "Tinnitus" } ] }
                }
            ]
        }));
        let d = dispatcher(stub);

        let content = d
            .call_tool(
                "get_drug_adverse_events",
                args(json!({ "drug_name": "aspirin", "limit": 2 })),
            )
            .await
            .unwrap();

        let text = text_of(&content);
        let blocks: Vec<_> = text.split("\n---\n").collect();
        assert_eq!(
            blocks,
            vec![
                "Seriousness: Serious\nReactions: Haemorrhage, Anaemia\nOutcome: 1",
                "Seriousness: Non-serious\nReactions: Tinnitus\nOutcome: N/A",
            ]
        );
    }

    #[tokio::test]
    async fn test_quotes_in_name_sanitized_but_reported_verbatim() {
        let stub = StubUpstream::json(json!({ "results": [] }));
        let d = dispatcher(stub.clone());

        let content = d
            .call_tool("get_drug_adverse_events", args(json!({ "drug_name": "a\"b" })))
            .await
            .unwrap();

        assert_eq!(text_of(&content), "No adverse events found for drug: a\"b");
        let requests = stub.requests.lock().unwrap();
        assert_eq!(
            requests[0].1[0],
            ("search", r#"patient.drug.medicinalproduct:"a'b""#.to_string())
        );
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_text() {
        let stub = StubUpstream::respond(UpstreamResponse::new(429, "slow down"));
        let d = dispatcher(stub);

        let content = d
            .call_tool("search_drug_label", args(json!({ "drug_name": "x" })))
            .await
            .unwrap();
        assert_eq!(
            text_of(&content),
            "Error fetching drug labels: 429 - slow down"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_aborts_call() {
        let stub = StubUpstream::unreachable();
        let d = dispatcher(stub.clone());

        let err = d
            .call_tool("search_drug_label", args(json!({ "drug_name": "x" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Transport(_)));
        assert_eq!(stub.request_count(), 1);
    }
}
