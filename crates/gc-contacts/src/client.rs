//! People API client implementation

use std::sync::Arc;
use std::time::Duration;

use gc_core::{Config, PeopleApiConfig};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::{Authenticator, authenticator_from_config};
use crate::error::{ContactsError, Result};
use crate::models::{
    CreateOptions, GetOptions, ListOptions, OperationResult, Person, RemoveOptions,
    ResourceIdentifier, ScopeSet, SearchOptions, UpdateOptions,
};
use crate::query;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// A single call against the People API
struct ApiRequest<'a> {
    path: &'a str,
    method: Method,
    params: Vec<(&'static str, String)>,
    body: Option<Value>,
    scopes: Option<&'a ScopeSet>,
}

impl<'a> ApiRequest<'a> {
    fn get(path: &'a str, params: Vec<(&'static str, String)>, scopes: Option<&'a ScopeSet>) -> Self {
        Self {
            path,
            method: Method::GET,
            params,
            body: None,
            scopes,
        }
    }
}

/// Contacts gateway over the People API.
///
/// Every operation is one request/response round trip. Missing required
/// input and HTTP error statuses come back as a failed [`OperationResult`];
/// authentication and transport failures are returned as `Err`.
pub struct ContactsClient {
    auth: Arc<dyn Authenticator>,
    transport: Arc<dyn HttpTransport>,
    config: PeopleApiConfig,
    base_url: String,
    default_scopes: ScopeSet,
}

impl ContactsClient {
    /// Create a client from explicit collaborators
    pub fn new(
        config: PeopleApiConfig,
        auth: Arc<dyn Authenticator>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let default_scopes = ScopeSet::new(&config.default_scopes).ok_or_else(|| {
            ContactsError::Configuration("at least one default scope is required".to_string())
        })?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ContactsError::Configuration("base URL is empty".to_string()));
        }

        info!("Contacts client initialized for: {}", base_url);

        Ok(Self {
            auth,
            transport,
            config,
            base_url,
            default_scopes,
        })
    }

    /// Create a client with the reqwest transport and the authenticator
    /// selected by `config.auth`
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.people.timeout_secs);
        let auth = authenticator_from_config(&config.auth, timeout)?;
        let transport = Arc::new(ReqwestTransport::new(timeout)?);
        Self::new(config.people.clone(), auth, transport)
    }

    /// Base URL requests are joined onto
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the authenticated user's contacts
    pub async fn list(&self, opts: ListOptions) -> Result<OperationResult> {
        let mut params = vec![("personFields", self.config.read_mask.clone())];
        push_page_size(&mut params, opts.max_results);
        self.request(ApiRequest::get("people/me/connections", params, opts.scopes.as_ref()))
            .await
    }

    /// Search the user's contacts
    pub async fn search(&self, opts: SearchOptions) -> Result<OperationResult> {
        if opts.query.is_empty() {
            return Ok(OperationResult::local("search: query required"));
        }
        let params = self.search_params(&opts);
        self.request(ApiRequest::get("people:searchContacts", params, opts.scopes.as_ref()))
            .await
    }

    /// Fetch one contact by resource name or email address
    pub async fn get(&self, opts: GetOptions) -> Result<OperationResult> {
        if opts.resource_name_or_email.is_empty() {
            return Ok(OperationResult::local("get: resourceNameOrEmail required"));
        }

        match ResourceIdentifier::parse(&opts.resource_name_or_email) {
            ResourceIdentifier::Email(email) => {
                let search = SearchOptions {
                    query: email,
                    max_results: Some(1),
                    scopes: opts.scopes,
                };
                let result = self.search(search).await?;
                if !result.is_ok() {
                    return Ok(result);
                }
                let first = result
                    .data()
                    .and_then(|d| d.get("results"))
                    .and_then(Value::as_array)
                    .and_then(|results| results.first())
                    .cloned()
                    .unwrap_or(Value::Null);
                Ok(OperationResult::success(first))
            }
            ResourceIdentifier::OtherContact(path) => {
                let params = vec![("readMask", self.config.read_mask.clone())];
                self.request(ApiRequest::get(&path, params, opts.scopes.as_ref()))
                    .await
            }
            ResourceIdentifier::Person(path) => {
                let params = vec![("personFields", self.config.read_mask.clone())];
                self.request(ApiRequest::get(&path, params, opts.scopes.as_ref()))
                    .await
            }
        }
    }

    /// List "other contacts" (people interacted with but not saved)
    pub async fn other_list(&self, opts: ListOptions) -> Result<OperationResult> {
        let mut params = vec![("readMask", self.config.read_mask.clone())];
        push_page_size(&mut params, opts.max_results);
        self.request(ApiRequest::get("otherContacts", params, opts.scopes.as_ref()))
            .await
    }

    /// Search "other contacts"
    pub async fn other_search(&self, opts: SearchOptions) -> Result<OperationResult> {
        if opts.query.is_empty() {
            return Ok(OperationResult::local("otherSearch: query required"));
        }
        let params = self.search_params(&opts);
        self.request(ApiRequest::get("otherContacts:search", params, opts.scopes.as_ref()))
            .await
    }

    /// Create a contact from at least one of name, email or phone
    pub async fn create(&self, opts: CreateOptions) -> Result<OperationResult> {
        let person = Person::from_fields(&opts.fields);
        if person.is_empty() {
            return Ok(OperationResult::local("create: missing data"));
        }

        self.request(ApiRequest {
            path: "people:createContact",
            method: Method::POST,
            params: Vec::new(),
            body: Some(to_body(&person)?),
            scopes: opts.scopes.as_ref(),
        })
        .await
    }

    /// Update the supplied fields of a contact, leaving the rest untouched
    pub async fn update(&self, opts: UpdateOptions) -> Result<OperationResult> {
        if opts.resource_name.is_empty() {
            return Ok(OperationResult::local("update: resourceName required"));
        }

        let person = Person::from_fields(&opts.fields);
        let fields = person.changed_fields();
        if fields.is_empty() {
            return Ok(OperationResult::local("update: no fields provided"));
        }

        let path = format!("{}:updateContact", opts.resource_name);
        self.request(ApiRequest {
            path: &path,
            method: Method::PATCH,
            params: vec![("updatePersonFields", fields.join(","))],
            body: Some(to_body(&person)?),
            scopes: opts.scopes.as_ref(),
        })
        .await
    }

    /// Delete a contact
    pub async fn remove(&self, opts: RemoveOptions) -> Result<OperationResult> {
        if opts.resource_name.is_empty() {
            return Ok(OperationResult::local("remove: resourceName required"));
        }

        let path = format!("{}:deleteContact", opts.resource_name);
        self.request(ApiRequest {
            path: &path,
            method: Method::DELETE,
            params: Vec::new(),
            body: None,
            scopes: opts.scopes.as_ref(),
        })
        .await
    }

    /// Search the organization directory
    pub async fn directory_search(&self, opts: SearchOptions) -> Result<OperationResult> {
        if opts.query.is_empty() {
            return Ok(OperationResult::local("directorySearch: query required"));
        }
        self.directory_request(opts.query, opts.max_results, opts.scopes.as_ref())
            .await
    }

    /// List the organization directory (a search with an empty query)
    pub async fn directory_list(&self, opts: ListOptions) -> Result<OperationResult> {
        self.directory_request(String::new(), opts.max_results, opts.scopes.as_ref())
            .await
    }

    async fn directory_request(
        &self,
        query: String,
        max_results: Option<u32>,
        scopes: Option<&ScopeSet>,
    ) -> Result<OperationResult> {
        let mut params = vec![
            ("query", query),
            ("readMask", self.config.read_mask.clone()),
            ("sources", self.config.directory_source.clone()),
        ];
        push_page_size(&mut params, max_results);
        self.request(ApiRequest::get("people:searchDirectoryPeople", params, scopes))
            .await
    }

    fn search_params(&self, opts: &SearchOptions) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", opts.query.clone()),
            ("readMask", self.config.read_mask.clone()),
        ];
        push_page_size(&mut params, opts.max_results);
        params
    }

    async fn request(&self, req: ApiRequest<'_>) -> Result<OperationResult> {
        let scopes = req.scopes.unwrap_or(&self.default_scopes);
        let token = self.auth.acquire_token(scopes).await?;

        let path = req.path.strip_prefix('/').unwrap_or(req.path);
        let mut url = format!("{}/{}", self.base_url, path);
        if !req.params.is_empty() {
            let qs = query::encode(&req.params)?;
            if !qs.is_empty() {
                url.push('?');
                url.push_str(&qs);
            }
        }

        debug!("{} {}", req.method, url);

        let response = self
            .transport
            .send(HttpRequest {
                method: req.method,
                url,
                headers: vec![
                    ("Content-Type".to_string(), "application/json".to_string()),
                    ("Authorization".to_string(), format!("Bearer {}", token)),
                ],
                json_body: req.body,
            })
            .await?;

        Ok(normalize(response))
    }
}

fn push_page_size(params: &mut Vec<(&'static str, String)>, max_results: Option<u32>) {
    if let Some(n) = max_results.filter(|n| *n > 0) {
        params.push(("pageSize", n.to_string()));
    }
}

fn to_body(person: &Person) -> Result<Value> {
    serde_json::to_value(person).map_err(|e| ContactsError::ParseError(e.to_string()))
}

/// Map a transport response onto the result shape.
///
/// Success needs both a status below 400 and no explicit failure flag
/// from the transport.
fn normalize(response: HttpResponse) -> OperationResult {
    let ok = response.ok.unwrap_or(true) && response.status < 400;
    let data = response
        .json
        .or_else(|| {
            response
                .raw
                .clone()
                .filter(|r| !r.is_empty())
                .map(Value::String)
        })
        .unwrap_or(Value::Null);

    if ok {
        OperationResult::Success {
            status: Some(response.status),
            data,
            raw: response.raw,
        }
    } else {
        warn!("People API request failed with status {}", response.status);
        OperationResult::remote(response.status, data, response.raw)
    }
}
