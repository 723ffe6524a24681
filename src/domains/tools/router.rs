//! Tool Router - builds the rmcp ToolRouter from the dispatcher.
//!
//! Every registered descriptor becomes one dynamic route. All routes funnel
//! back into [`ToolDispatcher::call_tool`], so STDIO and HTTP share the same
//! validation and error mapping.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::CallToolResult,
};
use std::sync::Arc;

use super::dispatcher::ToolDispatcher;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(dispatcher: Arc<ToolDispatcher>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    dispatcher
        .descriptors()
        .iter()
        .fold(ToolRouter::new(), |router, descriptor| {
            let name = descriptor.name;
            let dispatcher = dispatcher.clone();
            router.with_route(ToolRoute::new_dyn(
                descriptor.tool.clone(),
                move |ctx: ToolCallContext<'_, S>| {
                    let arguments = ctx.arguments.clone();
                    let dispatcher = dispatcher.clone();
                    async move {
                        let content = dispatcher
                            .call_tool(name, arguments)
                            .await
                            .map_err(McpError::from)?;
                        Ok(CallToolResult::success(content))
                    }
                    .boxed()
                },
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::tools::dispatcher::tests::StubUpstream;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let dispatcher = Arc::new(
            ToolDispatcher::with_client(&Config::default(), StubUpstream::unreachable()).unwrap(),
        );
        let router: ToolRouter<TestServer> = build_tool_router(dispatcher.clone());
        let tools = router.list_all();
        assert_eq!(tools.len(), 2);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"search_drug_label"));
        assert!(names.contains(&"get_drug_adverse_events"));
    }

    #[test]
    fn test_dispatcher_matches_router() {
        let dispatcher = Arc::new(
            ToolDispatcher::with_client(&Config::default(), StubUpstream::unreachable()).unwrap(),
        );
        let router: ToolRouter<TestServer> = build_tool_router(dispatcher.clone());
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        let names = dispatcher.tool_names();
        assert_eq!(names.len(), router_names.len());
        for name in names {
            assert!(router_names.contains(&name));
        }
    }
}
