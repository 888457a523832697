//! Normalization of loosely-typed JSON input into operation options
//!
//! Field names follow the camelCase names callers already use
//! (`maxResults`, `resourceNameOrEmail`, ...). Coercion never fails:
//! unusable values fall back to "absent".

use serde_json::Value;

use crate::models::{
    ContactFields, CreateOptions, GetOptions, ListOptions, RemoveOptions, ScopeSet,
    SearchOptions, UpdateOptions,
};

/// Keys accepted for the scope list, in priority order
const SCOPE_KEYS: [&str; 3] = ["scope", "scopes", "services"];

/// Coerce a page-size value.
///
/// Numbers and numeric strings are truncated to an integer; zero,
/// negatives, non-numeric strings, booleans and null are `None`.
pub fn page_size(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    // pageSize is unsigned; negatives are dropped, not forwarded
    if !n.is_finite() || n < 1.0 {
        return None;
    }
    Some(n.min(u32::MAX as f64) as u32)
}

/// Resolve scopes from `scope`, `scopes` or `services`, first present wins.
///
/// Each may be a string (comma or whitespace separated) or an array of
/// strings.
pub fn scopes(input: &Value) -> Option<ScopeSet> {
    let value = SCOPE_KEYS
        .iter()
        .filter_map(|key| input.get(*key))
        .find(|v| !is_falsy(v))?;

    match value {
        Value::String(s) => ScopeSet::new(s.split(|c: char| c == ',' || c.is_whitespace())),
        Value::Array(items) => ScopeSet::new(items.iter().filter_map(Value::as_str)),
        _ => None,
    }
}

/// Read a string field; numbers are stringified, anything else is empty
pub fn string_field(input: &Value, key: &str) -> String {
    match input.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn optional_string(input: &Value, key: &str) -> Option<String> {
    Some(string_field(input, key)).filter(|s| !s.is_empty())
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

pub fn list_options(input: &Value) -> ListOptions {
    ListOptions {
        max_results: input.get("maxResults").and_then(page_size),
        scopes: scopes(input),
    }
}

pub fn search_options(input: &Value) -> SearchOptions {
    SearchOptions {
        query: string_field(input, "query"),
        max_results: input.get("maxResults").and_then(page_size),
        scopes: scopes(input),
    }
}

pub fn get_options(input: &Value) -> GetOptions {
    GetOptions {
        resource_name_or_email: string_field(input, "resourceNameOrEmail"),
        scopes: scopes(input),
    }
}

pub fn contact_fields(input: &Value) -> ContactFields {
    ContactFields {
        given_name: optional_string(input, "givenName"),
        family_name: optional_string(input, "familyName"),
        email: optional_string(input, "email"),
        phone: optional_string(input, "phone"),
    }
}

pub fn create_options(input: &Value) -> CreateOptions {
    CreateOptions {
        fields: contact_fields(input),
        scopes: scopes(input),
    }
}

pub fn update_options(input: &Value) -> UpdateOptions {
    UpdateOptions {
        resource_name: string_field(input, "resourceName"),
        fields: contact_fields(input),
        scopes: scopes(input),
    }
}

pub fn remove_options(input: &Value) -> RemoveOptions {
    RemoveOptions {
        resource_name: string_field(input, "resourceName"),
        scopes: scopes(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_size() {
        assert_eq!(page_size(&json!(5)), Some(5));
        assert_eq!(page_size(&json!(5.9)), Some(5));
        assert_eq!(page_size(&json!("25")), Some(25));
        assert_eq!(page_size(&json!(" 7 ")), Some(7));
        assert_eq!(page_size(&json!(0)), None);
        assert_eq!(page_size(&json!(-3)), None);
        assert_eq!(page_size(&json!("abc")), None);
        assert_eq!(page_size(&json!("")), None);
        assert_eq!(page_size(&json!(true)), None);
        assert_eq!(page_size(&Value::Null), None);
    }

    #[test]
    fn test_scopes_aliases() {
        let s = scopes(&json!({"scope": "contacts.readonly"})).unwrap();
        assert_eq!(s.as_slice(), &["contacts.readonly".to_string()]);

        let s = scopes(&json!({"scopes": ["contacts", "directory.readonly"]})).unwrap();
        assert_eq!(s.as_slice().len(), 2);

        let s = scopes(&json!({"services": "contacts, directory.readonly"})).unwrap();
        assert_eq!(
            s.as_slice(),
            &["contacts".to_string(), "directory.readonly".to_string()]
        );
    }

    #[test]
    fn test_scopes_priority_and_fallback() {
        let s = scopes(&json!({"scope": "a", "scopes": ["b"]})).unwrap();
        assert_eq!(s.as_slice(), &["a".to_string()]);

        // empty `scope` falls through to the next alias
        let s = scopes(&json!({"scope": "", "services": "c"})).unwrap();
        assert_eq!(s.as_slice(), &["c".to_string()]);

        assert!(scopes(&json!({})).is_none());
        assert!(scopes(&json!({"scopes": []})).is_none());
        assert!(scopes(&json!({"scope": 12})).is_none());
    }

    #[test]
    fn test_search_options() {
        let opts = search_options(&json!({"query": "a@b.com", "maxResults": "3"}));
        assert_eq!(opts.query, "a@b.com");
        assert_eq!(opts.max_results, Some(3));
        assert!(opts.scopes.is_none());

        let opts = search_options(&json!({}));
        assert!(opts.query.is_empty());
    }

    #[test]
    fn test_string_field_number() {
        assert_eq!(string_field(&json!({"query": 42}), "query"), "42");
        assert_eq!(string_field(&json!({"query": null}), "query"), "");
    }

    #[test]
    fn test_update_options() {
        let opts = update_options(&json!({
            "resourceName": "people/c1",
            "givenName": "Jane",
            "email": "",
            "phone": "123"
        }));
        assert_eq!(opts.resource_name, "people/c1");
        assert_eq!(opts.fields.given_name.as_deref(), Some("Jane"));
        assert!(opts.fields.email.is_none());
        assert_eq!(opts.fields.phone.as_deref(), Some("123"));
    }
}
