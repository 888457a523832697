//! Tool definitions and schema helpers

use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

/// Serializable description of a registered tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: JsonValue,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: JsonValue,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Helper functions for creating tool schemas
pub struct SchemaBuilder;

impl SchemaBuilder {
    /// Create an object schema with described properties
    ///
    /// # Arguments
    /// * `properties` - A list of tuples (name, type, description, required)
    ///
    /// # Example
    /// ```ignore
    /// let schema = SchemaBuilder::object_schema(vec![
    ///     ("query", "string", "Search text", true),
    ///     ("maxResults", "integer", "Page size", false),
    /// ]);
    /// ```
    pub fn object_schema(properties: Vec<(&str, &str, &str, bool)>) -> JsonValue {
        let props: serde_json::Map<String, JsonValue> = properties
            .iter()
            .map(|(name, type_str, desc, _)| {
                (
                    name.to_string(),
                    json!({"type": type_str, "description": desc}),
                )
            })
            .collect();

        let required: Vec<&str> = properties
            .iter()
            .filter(|(_, _, _, required)| *required)
            .map(|(name, _, _, _)| *name)
            .collect();

        json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }
}
