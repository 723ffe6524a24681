//! Tools domain module.
//!
//! This module handles the openFDA tools exposed to MCP clients. A call
//! flows through four stages:
//!
//! 1. `dispatcher.rs` - looks the tool up and validates its arguments (`schema.rs`)
//! 2. `query.rs` - builds the openFDA search expression and parameters
//! 3. `client.rs` - performs the single upstream GET
//! 4. `mapper.rs` - turns the JSON reply into the text report
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with its params struct,
//!    declared arguments and a `ToolHandler` impl
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in `ToolDispatcher::with_client()`
//!
//! The rmcp router (`router.rs`) is derived from the dispatcher, so no
//! other file needs to change.

pub mod client;
pub mod definitions;
pub mod dispatcher;
mod error;
mod handlers;
pub mod mapper;
pub mod query;
pub mod router;
pub mod schema;

pub use client::{RemoteClient, UpstreamFetch, UpstreamResponse};
pub use dispatcher::{ToolDescriptor, ToolDispatcher};
pub use error::ToolError;
pub use handlers::{ToolContext, ToolHandler};
pub use query::{Collection, QueryBuilder, QueryExpr, UpstreamQuery};
pub use router::build_tool_router;
