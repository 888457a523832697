//! Tool system
//!
//! Tools wrap an operation behind a name, a description and a JSON input
//! schema so that it can be listed and executed by name.

pub mod definition;
pub mod manager;
pub mod traits;

pub use definition::{SchemaBuilder, ToolDefinition};
pub use manager::ToolManager;
pub use traits::{Tool, ToolResult};
