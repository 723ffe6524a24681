//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: the openFDA lookups exposed to clients
//! - **prompts**: prompt templates built on top of those tools

pub mod prompts;
pub mod tools;
