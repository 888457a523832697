//! Data models for the People API gateway

use serde::Serialize;
use serde_json::{Value, json};

/// Person record as sent to the People API.
///
/// Only populated lists are serialized, so a partial record never clears
/// fields it does not mention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<PersonName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_addresses: Option<Vec<FieldValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<Vec<FieldValue>>,
}

/// Structured name entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub given_name: String,
    pub family_name: String,
}

/// Single-valued entry (email address, phone number)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValue {
    pub value: String,
}

impl FieldValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

impl Person {
    /// Build a sparse person from caller-supplied fields
    pub fn from_fields(fields: &ContactFields) -> Self {
        let given = supplied(&fields.given_name);
        let family = supplied(&fields.family_name);

        let names = (given.is_some() || family.is_some()).then(|| {
            vec![PersonName {
                given_name: given.unwrap_or_default().to_string(),
                family_name: family.unwrap_or_default().to_string(),
            }]
        });

        Self {
            names,
            email_addresses: supplied(&fields.email).map(|v| vec![FieldValue::new(v)]),
            phone_numbers: supplied(&fields.phone).map(|v| vec![FieldValue::new(v)]),
        }
    }

    /// Top-level field names present on this record, in mask order
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.names.is_some() {
            fields.push("names");
        }
        if self.email_addresses.is_some() {
            fields.push("emailAddresses");
        }
        if self.phone_numbers.is_some() {
            fields.push("phoneNumbers");
        }
        fields
    }

    /// Whether no field is populated
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Contact fields accepted by create and update. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_given_name(mut self, given_name: impl Into<String>) -> Self {
        self.given_name = Some(given_name.into());
        self
    }

    pub fn with_family_name(mut self, family_name: impl Into<String>) -> Self {
        self.family_name = Some(family_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Non-empty, duplicate-free list of permission scopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSet(Vec<String>);

impl ScopeSet {
    /// Build a scope set, trimming entries and dropping blanks and duplicates.
    ///
    /// Returns `None` when nothing usable remains.
    pub fn new<I, S>(scopes: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for scope in scopes {
            let scope = scope.as_ref().trim();
            if !scope.is_empty() && !out.iter().any(|s| s == scope) {
                out.push(scope.to_string());
            }
        }
        (!out.is_empty()).then_some(Self(out))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Identifier accepted by `get`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceIdentifier {
    /// Raw email address, resolved through a contact search
    Email(String),
    /// `otherContacts/...` resource
    OtherContact(String),
    /// Canonical `people/...` resource name (or any other literal path)
    Person(String),
}

impl ResourceIdentifier {
    pub const OTHER_CONTACTS_PREFIX: &'static str = "otherContacts/";

    /// Classify an identifier. `@` wins over the `otherContacts/` prefix.
    pub fn parse(value: &str) -> Self {
        if value.contains('@') {
            Self::Email(value.to_string())
        } else if value.starts_with(Self::OTHER_CONTACTS_PREFIX) {
            Self::OtherContact(value.to_string())
        } else {
            Self::Person(value.to_string())
        }
    }
}

/// Options for `list`, `other_list` and `directory_list`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Page size; `None` or `Some(0)` leaves it to the provider
    pub max_results: Option<u32>,
    pub scopes: Option<ScopeSet>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
        self.scopes = Some(scopes);
        self
    }
}

/// Options for `search`, `other_search` and `directory_search`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Search text; empty means missing
    pub query: String,
    pub max_results: Option<u32>,
    pub scopes: Option<ScopeSet>,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
        self.scopes = Some(scopes);
        self
    }
}

/// Options for `get`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    pub resource_name_or_email: String,
    pub scopes: Option<ScopeSet>,
}

impl GetOptions {
    pub fn new(resource_name_or_email: impl Into<String>) -> Self {
        Self {
            resource_name_or_email: resource_name_or_email.into(),
            scopes: None,
        }
    }

    pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
        self.scopes = Some(scopes);
        self
    }
}

/// Options for `create`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub fields: ContactFields,
    pub scopes: Option<ScopeSet>,
}

impl CreateOptions {
    pub fn new(fields: ContactFields) -> Self {
        Self { fields, scopes: None }
    }

    pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
        self.scopes = Some(scopes);
        self
    }
}

/// Options for `update`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    pub resource_name: String,
    pub fields: ContactFields,
    pub scopes: Option<ScopeSet>,
}

impl UpdateOptions {
    pub fn new(resource_name: impl Into<String>, fields: ContactFields) -> Self {
        Self {
            resource_name: resource_name.into(),
            fields,
            scopes: None,
        }
    }

    pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
        self.scopes = Some(scopes);
        self
    }
}

/// Options for `remove`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    pub resource_name: String,
    pub scopes: Option<ScopeSet>,
}

impl RemoveOptions {
    pub fn new(resource_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            scopes: None,
        }
    }

    pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
        self.scopes = Some(scopes);
        self
    }
}

/// Where a failure was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rejected before any request was made
    Local,
    /// The API answered with an error status
    Remote,
}

/// Details of a failed operation
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    pub status: Option<u16>,
    pub data: Option<Value>,
    pub raw: Option<String>,
}

/// Normalized outcome of a gateway operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    Success {
        status: Option<u16>,
        data: Value,
        raw: Option<String>,
    },
    Failure(Failure),
}

impl OperationResult {
    /// Success with no transport details attached
    pub fn success(data: Value) -> Self {
        Self::Success {
            status: None,
            data,
            raw: None,
        }
    }

    /// Validation failure; no request was made
    pub fn local(message: impl Into<String>) -> Self {
        Self::Failure(Failure {
            kind: FailureKind::Local,
            message: message.into(),
            status: None,
            data: None,
            raw: None,
        })
    }

    /// Error status returned by the API.
    ///
    /// The message is taken from the provider's `error.message` when present.
    pub fn remote(status: u16, data: Value, raw: Option<String>) -> Self {
        let message = data
            .pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status));

        Self::Failure(Failure {
            kind: FailureKind::Remote,
            message,
            status: Some(status),
            data: Some(data),
            raw,
        })
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status, .. } => *status,
            Self::Failure(f) => f.status,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure(f) => f.data.as_ref(),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Success { raw, .. } => raw.as_deref(),
            Self::Failure(f) => f.raw.as_deref(),
        }
    }

    /// Message of a failed operation
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(f) => Some(&f.message),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(f) => Some(f.kind),
        }
    }

    /// Render as a flat `{ ok, status, data, raw, error }` object.
    ///
    /// `error` is set for local failures and for any failure without an
    /// error status; failures with status >= 400 carry status and body only.
    pub fn to_json(&self) -> Value {
        let mut out = json!({ "ok": self.is_ok() });
        if let Some(status) = self.status() {
            out["status"] = json!(status);
        }
        if let Some(data) = self.data() {
            out["data"] = data.clone();
        }
        if let Some(raw) = self.raw() {
            out["raw"] = json!(raw);
        }
        if let Self::Failure(f) = self {
            if f.kind == FailureKind::Local || f.status.is_none_or(|s| s < 400) {
                out["error"] = json!(f.message);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_from_email_only() {
        let person = Person::from_fields(&ContactFields::new().with_email("x@y.com"));
        assert_eq!(
            serde_json::to_value(&person).unwrap(),
            json!({"emailAddresses": [{"value": "x@y.com"}]})
        );
        assert_eq!(person.changed_fields(), vec!["emailAddresses"]);
    }

    #[test]
    fn test_person_name_defaults_missing_half() {
        let person = Person::from_fields(&ContactFields::new().with_family_name("Doe"));
        assert_eq!(
            serde_json::to_value(&person).unwrap(),
            json!({"names": [{"givenName": "", "familyName": "Doe"}]})
        );
    }

    #[test]
    fn test_person_all_fields() {
        let fields = ContactFields::new()
            .with_given_name("Jane")
            .with_family_name("Doe")
            .with_email("jane@example.com")
            .with_phone("+1 555 0100");
        let person = Person::from_fields(&fields);
        assert_eq!(person.changed_fields(), vec!["names", "emailAddresses", "phoneNumbers"]);
        assert_eq!(person.phone_numbers.unwrap()[0].value, "+1 555 0100");
    }

    #[test]
    fn test_person_empty_strings_are_absent() {
        let fields = ContactFields::new().with_given_name("").with_email("");
        let person = Person::from_fields(&fields);
        assert!(person.is_empty());
        assert_eq!(serde_json::to_value(&person).unwrap(), json!({}));
    }

    #[test]
    fn test_scope_set() {
        assert!(ScopeSet::new(Vec::<String>::new()).is_none());
        assert!(ScopeSet::new([" ", ""]).is_none());

        let scopes = ScopeSet::new(["contacts", " directory ", "contacts"]).unwrap();
        assert_eq!(scopes.as_slice(), &["contacts".to_string(), "directory".to_string()]);
    }

    #[test]
    fn test_resource_identifier_parse() {
        assert_eq!(
            ResourceIdentifier::parse("a@b.com"),
            ResourceIdentifier::Email("a@b.com".to_string())
        );
        assert_eq!(
            ResourceIdentifier::parse("otherContacts/o1"),
            ResourceIdentifier::OtherContact("otherContacts/o1".to_string())
        );
        assert_eq!(
            ResourceIdentifier::parse("people/c1"),
            ResourceIdentifier::Person("people/c1".to_string())
        );
        // '@' takes precedence over the prefix
        assert_eq!(
            ResourceIdentifier::parse("otherContacts/a@b"),
            ResourceIdentifier::Email("otherContacts/a@b".to_string())
        );
    }

    #[test]
    fn test_local_failure_json() {
        let result = OperationResult::local("search: query required");
        assert!(!result.is_ok());
        assert_eq!(result.failure_kind(), Some(FailureKind::Local));
        assert_eq!(
            result.to_json(),
            json!({"ok": false, "error": "search: query required"})
        );
    }

    #[test]
    fn test_remote_failure_message() {
        let body = json!({"error": {"code": 404, "message": "Requested entity was not found."}});
        let result = OperationResult::remote(404, body.clone(), Some(body.to_string()));
        assert_eq!(result.status(), Some(404));
        assert_eq!(result.error(), Some("Requested entity was not found."));

        let json = result.to_json();
        assert_eq!(json["ok"], false);
        assert_eq!(json["status"], 404);
        assert_eq!(json["data"], body);
        assert!(json.get("error").is_none());

        let result = OperationResult::remote(500, Value::Null, None);
        assert_eq!(result.error(), Some("HTTP 500"));
    }

    #[test]
    fn test_remote_failure_below_400_has_error() {
        let result = OperationResult::remote(200, json!("rejected"), Some("rejected".to_string()));
        assert_eq!(
            result.to_json(),
            json!({
                "ok": false,
                "status": 200,
                "data": "rejected",
                "raw": "rejected",
                "error": "HTTP 200"
            })
        );
    }

    #[test]
    fn test_success_json() {
        let result = OperationResult::Success {
            status: Some(200),
            data: json!({"resourceName": "people/c1"}),
            raw: Some(r#"{"resourceName":"people/c1"}"#.to_string()),
        };
        assert!(result.is_ok());
        assert!(result.error().is_none());
        assert_eq!(
            result.to_json(),
            json!({
                "ok": true,
                "status": 200,
                "data": {"resourceName": "people/c1"},
                "raw": r#"{"resourceName":"people/c1"}"#
            })
        );
    }
}
