//! Tool Module
//!
//! The execution context handed to every tool, the guarded-input
//! parameter pattern for sensitive fields, and the registry that
//! exposes tools to the inference layer.

mod context;
mod guarded;
mod registry;

pub use context::ToolContext;
pub use guarded::{guarded_schema, GuardedValue};
pub use registry::ToolRegistry;
