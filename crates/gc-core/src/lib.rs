//! gc-core: shared building blocks for gcontacts
//!
//! Provides the error type, configuration loading and the tool system
//! that the contacts gateway plugs its operations into.

pub mod config;
pub mod error;
pub mod tool;

pub use config::{AuthConfig, Config, PeopleApiConfig};
pub use error::{Error, Result};
pub use tool::{SchemaBuilder, Tool, ToolDefinition, ToolManager, ToolResult};
