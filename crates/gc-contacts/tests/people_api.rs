//! End-to-end tests against a mock People API

use std::sync::Arc;
use std::time::Duration;

use gc_contacts::{
    ContactFields, ContactsClient, ContactsError, CreateOptions, FailureKind, GetOptions,
    ListOptions, RefreshTokenAuthenticator, RemoveOptions, ReqwestTransport, SearchOptions,
    StaticTokenAuthenticator, UpdateOptions,
};
use gc_core::{Config, PeopleApiConfig};
use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MASK: &str = "names,emailAddresses,phoneNumbers";

fn people_config(server: &MockServer) -> PeopleApiConfig {
    PeopleApiConfig {
        base_url: format!("{}/v1", server.uri()),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn static_client(server: &MockServer) -> ContactsClient {
    ContactsClient::new(
        people_config(server),
        Arc::new(StaticTokenAuthenticator::new("tok")),
        Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap()),
    )
    .unwrap()
}

#[tokio::test]
async fn list_sends_mask_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/people/me/connections"))
        .and(query_param("personFields", MASK))
        .and(query_param_is_missing("pageSize"))
        .and(header("authorization", "Bearer tok"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connections": [{"resourceName": "people/c1"}],
            "totalPeople": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = static_client(&server).list(ListOptions::new()).await.unwrap();
    assert!(result.is_ok());
    assert_eq!(result.status(), Some(200));
    assert_eq!(result.data().unwrap()["totalPeople"], 1);
    assert!(result.raw().unwrap().contains("people/c1"));
}

#[tokio::test]
async fn search_with_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/people:searchContacts"))
        .and(query_param("query", "a@b.com"))
        .and(query_param("readMask", MASK))
        .and(query_param("pageSize", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let result = static_client(&server)
        .search(SearchOptions::new("a@b.com").with_max_results(5))
        .await
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn get_by_email_goes_through_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/people:searchContacts"))
        .and(query_param("query", "jane@example.com"))
        .and(query_param("pageSize", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"person": {"resourceName": "people/c42"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = static_client(&server)
        .get(GetOptions::new("jane@example.com"))
        .await
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(result.data().unwrap()["person"]["resourceName"], "people/c42");
}

#[tokio::test]
async fn create_posts_sparse_person() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/people:createContact"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "names": [{"givenName": "Jane", "familyName": ""}],
            "phoneNumbers": [{"value": "+1 555 0100"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resourceName": "people/c7"})))
        .expect(1)
        .mount(&server)
        .await;

    let fields = ContactFields::new()
        .with_given_name("Jane")
        .with_phone("+1 555 0100");
    let result = static_client(&server)
        .create(CreateOptions::new(fields))
        .await
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(result.data().unwrap()["resourceName"], "people/c7");
}

#[tokio::test]
async fn update_patches_with_field_mask() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/people/c1:updateContact"))
        .and(query_param("updatePersonFields", "emailAddresses"))
        .and(body_json(json!({"emailAddresses": [{"value": "x@y.com"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resourceName": "people/c1"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = static_client(&server)
        .update(UpdateOptions::new(
            "people/c1",
            ContactFields::new().with_email("x@y.com"),
        ))
        .await
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn remove_with_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/people/c1:deleteContact"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = static_client(&server)
        .remove(RemoveOptions::new("people/c1"))
        .await
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(result.data(), Some(&serde_json::Value::Null));
}

#[tokio::test]
async fn directory_list_uses_empty_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/people:searchDirectoryPeople"))
        .and(query_param("query", ""))
        .and(query_param("sources", "DIRECTORY_SOURCE_TYPE_DOMAIN_PROFILE"))
        .and(query_param("readMask", MASK))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"people": []})))
        .expect(1)
        .mount(&server)
        .await;

    let result = static_client(&server)
        .directory_list(ListOptions::new())
        .await
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn error_status_is_a_remote_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/people/c404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let result = static_client(&server)
        .get(GetOptions::new("people/c404"))
        .await
        .unwrap();
    assert!(!result.is_ok());
    assert_eq!(result.failure_kind(), Some(FailureKind::Remote));
    assert_eq!(result.status(), Some(404));
    assert_eq!(result.error(), Some("Requested entity was not found."));
    assert_eq!(result.to_json()["data"]["error"]["status"], "NOT_FOUND");
}

#[tokio::test]
async fn refresh_token_grant_feeds_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=r-123"))
        .and(body_string_contains(
            "scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcontacts",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/otherContacts"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"otherContacts": []})))
        .expect(1)
        .mount(&server)
        .await;

    let auth = RefreshTokenAuthenticator::new("client", "secret", "r-123", Duration::from_secs(5))
        .unwrap()
        .with_token_url(format!("{}/token", server.uri()));
    let client = ContactsClient::new(
        people_config(&server),
        Arc::new(auth),
        Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap()),
    )
    .unwrap();

    let result = client.other_list(ListOptions::new()).await.unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn rejected_refresh_token_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Token has been expired or revoked."
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.people = people_config(&server);
    config.auth.client_id = Some("client".to_string());
    config.auth.client_secret = Some("secret".to_string());
    config.auth.refresh_token = Some("expired".to_string());
    config.auth.token_url = format!("{}/token", server.uri());

    let client = ContactsClient::from_config(&config).unwrap();
    let err = client.list(ListOptions::new()).await.unwrap_err();
    match err {
        ContactsError::Authentication(msg) => assert!(msg.contains("expired or revoked")),
        other => panic!("unexpected error: {other}"),
    }
}
