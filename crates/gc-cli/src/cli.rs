//! Command definitions and dispatch

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use gc_contacts::{
    ContactFields, ContactsClient, CreateOptions, GetOptions, ListOptions, OperationResult,
    Operation, RemoveOptions, ScopeSet, SearchOptions, UpdateOptions, register_contacts_tools,
};
use gc_core::{Config, ToolManager};
use serde_json::Value as JsonValue;
use tracing::info;

/// Manage Google contacts through the People API
#[derive(Debug, Parser)]
#[command(name = "gcontacts", version, about)]
pub struct Cli {
    /// Path to a TOML configuration file (default: ./gcontacts.toml if present)
    #[arg(long, global = true, env = "GCONTACTS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Scope override shared by every operation
#[derive(Debug, Clone, Default, Args)]
pub struct ScopeArgs {
    /// Scope to request; repeat for several (default: contacts)
    #[arg(long = "scope")]
    pub scopes: Vec<String>,
}

impl ScopeArgs {
    fn scope_set(&self) -> Option<ScopeSet> {
        ScopeSet::new(&self.scopes)
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct PageArgs {
    /// Page size (0 leaves it to the server)
    #[arg(long)]
    pub max_results: Option<u32>,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

impl PageArgs {
    fn list_options(&self) -> ListOptions {
        ListOptions {
            max_results: self.max_results,
            scopes: self.scope.scope_set(),
        }
    }

    fn search_options(&self, query: String) -> SearchOptions {
        SearchOptions {
            query,
            max_results: self.max_results,
            scopes: self.scope.scope_set(),
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ContactArgs {
    #[arg(long)]
    pub given_name: Option<String>,
    #[arg(long)]
    pub family_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

impl From<ContactArgs> for ContactFields {
    fn from(args: ContactArgs) -> Self {
        ContactFields {
            given_name: args.given_name,
            family_name: args.family_name,
            email: args.email,
            phone: args.phone,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List your contacts
    List(PageArgs),
    /// Search your contacts
    Search {
        query: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Get a contact by resource name or email address
    Get {
        resource_name_or_email: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// List other contacts
    OtherList(PageArgs),
    /// Search other contacts
    OtherSearch {
        query: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Create a contact
    Create {
        #[command(flatten)]
        contact: ContactArgs,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Update fields of a contact
    Update {
        resource_name: String,
        #[command(flatten)]
        contact: ContactArgs,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Delete a contact
    Remove {
        resource_name: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// List the organization directory
    DirectoryList(PageArgs),
    /// Search the organization directory
    DirectorySearch {
        query: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Print the tool definitions as JSON
    Tools,
    /// Run a tool by name with JSON input
    Call {
        tool: String,
        /// JSON object (default: {})
        input: Option<String>,
    },
}

/// Run one command, printing its JSON result. Returns whether it succeeded.
pub async fn run(command: Command, config: &Config) -> anyhow::Result<bool> {
    // Tool listing works without credentials
    if let Command::Tools = command {
        return print_tools();
    }

    let client = Arc::new(ContactsClient::from_config(config)?);

    let result = match command {
        Command::List(page) => client.list(page.list_options()).await?,
        Command::Search { query, page } => client.search(page.search_options(query)).await?,
        Command::Get {
            resource_name_or_email,
            scope,
        } => {
            client
                .get(GetOptions {
                    resource_name_or_email,
                    scopes: scope.scope_set(),
                })
                .await?
        }
        Command::OtherList(page) => client.other_list(page.list_options()).await?,
        Command::OtherSearch { query, page } => {
            client.other_search(page.search_options(query)).await?
        }
        Command::Create { contact, scope } => {
            client
                .create(CreateOptions {
                    fields: contact.into(),
                    scopes: scope.scope_set(),
                })
                .await?
        }
        Command::Update {
            resource_name,
            contact,
            scope,
        } => {
            client
                .update(UpdateOptions {
                    resource_name,
                    fields: contact.into(),
                    scopes: scope.scope_set(),
                })
                .await?
        }
        Command::Remove {
            resource_name,
            scope,
        } => {
            client
                .remove(RemoveOptions {
                    resource_name,
                    scopes: scope.scope_set(),
                })
                .await?
        }
        Command::DirectoryList(page) => client.directory_list(page.list_options()).await?,
        Command::DirectorySearch { query, page } => {
            client.directory_search(page.search_options(query)).await?
        }
        Command::Call { tool, input } => return call_tool(client, &tool, input.as_deref()).await,
        Command::Tools => return print_tools(),
    };

    print_result(&result)?;
    Ok(result.is_ok())
}

fn print_tools() -> anyhow::Result<bool> {
    let defs: Vec<_> = Operation::ALL.iter().map(|op| op.definition()).collect();
    println!("{}", serde_json::to_string_pretty(&defs)?);
    Ok(true)
}

async fn call_tool(
    client: Arc<ContactsClient>,
    tool: &str,
    input: Option<&str>,
) -> anyhow::Result<bool> {
    let mut manager = ToolManager::new();
    register_contacts_tools(&mut manager, client);
    anyhow::ensure!(
        manager.contains(tool),
        "unknown tool '{}', expected one of: {}",
        tool,
        manager.tool_names().join(", ")
    );
    info!("Calling tool {} ({} tools registered)", tool, manager.len());

    let input = parse_input(input)?;
    let result = manager.execute(tool, input).await?;

    let output: JsonValue = serde_json::from_str(&result.output)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(!result.is_error)
}

fn parse_input(input: Option<&str>) -> anyhow::Result<JsonValue> {
    let value: JsonValue = match input {
        Some(text) if !text.trim().is_empty() => serde_json::from_str(text)?,
        _ => JsonValue::Object(Default::default()),
    };
    anyhow::ensure!(value.is_object(), "tool input must be a JSON object");
    Ok(value)
}

fn print_result(result: &OperationResult) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&result.to_json())?);
    Ok(())
}
