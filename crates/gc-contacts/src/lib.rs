//! gc-contacts: People API contacts gateway
//!
//! This crate maps a small set of contact operations onto single
//! requests against the Google People API.
//!
//! ## Features
//!
//! - List, search and fetch contacts, "other contacts" and directory people
//! - Create, update (with a field mask) and delete contacts
//! - Pluggable token acquisition and HTTP transport
//! - Tool adapters for every operation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gc_contacts::{ContactFields, ContactsClient, CreateOptions, GetOptions};
//!
//! let config = gc_core::Config::load(None)?;
//! let client = ContactsClient::from_config(&config)?;
//!
//! // Look a contact up by email
//! let result = client.get(GetOptions::new("jane@example.com")).await?;
//!
//! // Create one
//! let fields = ContactFields::new()
//!     .with_given_name("Jane")
//!     .with_email("jane@example.com");
//! let result = client.create(CreateOptions::new(fields)).await?;
//! println!("{}", result.to_json());
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod input;
pub mod models;
pub mod query;
pub mod tools;
pub mod transport;

pub use auth::{
    Authenticator, RefreshTokenAuthenticator, StaticTokenAuthenticator, authenticator_from_config,
};
pub use client::ContactsClient;
pub use error::{ContactsError, Result};
pub use models::{
    ContactFields, CreateOptions, Failure, FailureKind, GetOptions, ListOptions, OperationResult,
    Person, RemoveOptions, ResourceIdentifier, ScopeSet, SearchOptions, UpdateOptions,
};
pub use tools::{ContactsTool, Operation, register_contacts_tools};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// Re-export the common types for easy use
pub mod prelude {
    pub use super::{
        ContactFields, ContactsClient, CreateOptions, GetOptions, ListOptions, OperationResult,
        RemoveOptions, SearchOptions, UpdateOptions,
    };
}
