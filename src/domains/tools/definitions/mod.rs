//! Tool definitions module.
//!
//! One file per tool. Each definition provides its parameter struct (for
//! the advertised JSON schema), its declared arguments (for validation),
//! and a [`ToolHandler`](super::ToolHandler) implementation.

pub mod adverse_events;
pub mod label;

pub use adverse_events::{DrugAdverseEventsParams, DrugAdverseEventsTool};
pub use label::{SearchDrugLabelParams, SearchDrugLabelTool};
