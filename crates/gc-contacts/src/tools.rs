//! Contacts tools
//!
//! Each gateway operation is exposed as a [`Tool`] taking the camelCase
//! JSON input callers already use and returning the flat result object.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use gc_core::{SchemaBuilder, Tool, ToolDefinition, ToolManager, ToolResult};

use crate::client::ContactsClient;
use crate::input;

/// Gateway operation exposed as a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Search,
    Get,
    OtherList,
    OtherSearch,
    Create,
    Update,
    Remove,
    DirectoryList,
    DirectorySearch,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::List,
        Operation::Search,
        Operation::Get,
        Operation::OtherList,
        Operation::OtherSearch,
        Operation::Create,
        Operation::Update,
        Operation::Remove,
        Operation::DirectoryList,
        Operation::DirectorySearch,
    ];

    pub fn tool_name(self) -> &'static str {
        match self {
            Operation::List => "contacts_list",
            Operation::Search => "contacts_search",
            Operation::Get => "contacts_get",
            Operation::OtherList => "contacts_other_list",
            Operation::OtherSearch => "contacts_other_search",
            Operation::Create => "contacts_create",
            Operation::Update => "contacts_update",
            Operation::Remove => "contacts_remove",
            Operation::DirectoryList => "contacts_directory_list",
            Operation::DirectorySearch => "contacts_directory_search",
        }
    }

    /// Definition of the tool, available without a client
    pub fn definition(self) -> ToolDefinition {
        ToolDefinition::new(self.tool_name(), self.description(), self.input_schema())
    }

    fn description(self) -> &'static str {
        match self {
            Operation::List => "List the user's contacts",
            Operation::Search => "Search the user's contacts by name, email or phone",
            Operation::Get => "Get a contact by resource name (people/..., otherContacts/...) or email address",
            Operation::OtherList => "List other contacts (people interacted with but not saved)",
            Operation::OtherSearch => "Search other contacts",
            Operation::Create => "Create a contact from a name, email and/or phone number",
            Operation::Update => "Update the given fields of an existing contact",
            Operation::Remove => "Delete a contact",
            Operation::DirectoryList => "List people in the organization directory",
            Operation::DirectorySearch => "Search the organization directory",
        }
    }

    fn input_schema(self) -> Value {
        let scope = (
            "scope",
            "string",
            "Scopes to request, comma or space separated or an array (default: contacts)",
            false,
        );
        let max_results = ("maxResults", "integer", "Maximum number of results", false);
        let query = ("query", "string", "Search text", true);
        let resource_name = ("resourceName", "string", "Contact resource name (people/...)", true);
        let contact = [
            ("givenName", "string", "Given name", false),
            ("familyName", "string", "Family name", false),
            ("email", "string", "Email address", false),
            ("phone", "string", "Phone number", false),
        ];

        let props = match self {
            Operation::List | Operation::OtherList | Operation::DirectoryList => {
                vec![max_results, scope]
            }
            Operation::Search | Operation::OtherSearch | Operation::DirectorySearch => {
                vec![query, max_results, scope]
            }
            Operation::Get => vec![
                (
                    "resourceNameOrEmail",
                    "string",
                    "Resource name or email address",
                    true,
                ),
                scope,
            ],
            Operation::Create => {
                let mut props = contact.to_vec();
                props.push(scope);
                props
            }
            Operation::Update => {
                let mut props = vec![resource_name];
                props.extend(contact);
                props.push(scope);
                props
            }
            Operation::Remove => vec![resource_name, scope],
        };

        let mut schema = SchemaBuilder::object_schema(props);
        // scope also takes an array of strings
        schema["properties"]["scope"]["type"] = json!(["string", "array"]);
        schema["properties"]["scope"]["items"] = json!({"type": "string"});
        schema
    }
}

/// Tool wrapping one gateway operation
pub struct ContactsTool {
    client: Arc<ContactsClient>,
    operation: Operation,
}

impl ContactsTool {
    pub fn new(client: Arc<ContactsClient>, operation: Operation) -> Self {
        Self { client, operation }
    }
}

#[async_trait]
impl Tool for ContactsTool {
    fn name(&self) -> &str {
        self.operation.tool_name()
    }

    fn description(&self) -> &str {
        self.operation.description()
    }

    fn input_schema(&self) -> Value {
        self.operation.input_schema()
    }

    async fn execute(&self, input: Value) -> gc_core::Result<ToolResult> {
        let client = &self.client;
        let result = match self.operation {
            Operation::List => client.list(input::list_options(&input)).await,
            Operation::Search => client.search(input::search_options(&input)).await,
            Operation::Get => client.get(input::get_options(&input)).await,
            Operation::OtherList => client.other_list(input::list_options(&input)).await,
            Operation::OtherSearch => client.other_search(input::search_options(&input)).await,
            Operation::Create => client.create(input::create_options(&input)).await,
            Operation::Update => client.update(input::update_options(&input)).await,
            Operation::Remove => client.remove(input::remove_options(&input)).await,
            Operation::DirectoryList => client.directory_list(input::list_options(&input)).await,
            Operation::DirectorySearch => {
                client.directory_search(input::search_options(&input)).await
            }
        }
        .map_err(|e| gc_core::Error::ToolExecution(e.to_string()))?;

        let output = serde_json::to_string(&result.to_json())?;
        Ok(if result.is_ok() {
            ToolResult::success(output)
        } else {
            ToolResult::error(output)
        })
    }
}

/// Register every contacts tool with the manager
pub fn register_contacts_tools(manager: &mut ToolManager, client: Arc<ContactsClient>) {
    for operation in Operation::ALL {
        manager.register(Arc::new(ContactsTool::new(client.clone(), operation)));
    }
}
