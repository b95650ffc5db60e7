//! Tests for the API client helpers

use super::http::{feedback_from_rows, user_from_login_reply};
use super::*;
use fms_core::Role;

#[test]
fn test_api_client_config_creation() {
    let config = ApiClientConfig::default();
    assert_eq!(config.base_url, fms_core::DEFAULT_API_URL);
    assert_eq!(config.timeout_seconds, 30);
    assert!(config.user_agent.starts_with("fms/"));

    let custom = ApiClientConfig::with_base_url("http://127.0.0.1:9000/api")
        .with_timeout(5)
        .with_header("x-client".to_string(), "cli".to_string());
    assert_eq!(custom.base_url, "http://127.0.0.1:9000/api");
    assert_eq!(custom.timeout_seconds, 5);
    assert_eq!(custom.headers.get("x-client").map(String::as_str), Some("cli"));
}

#[test]
fn test_client_rejects_invalid_base_url() {
    let result = HttpApiClient::new(ApiClientConfig::with_base_url("localhost without scheme"));
    assert!(matches!(result, Err(FmsError::Config { .. })));
}

#[test]
fn test_client_rejects_invalid_header() {
    let config = ApiClientConfig::with_base_url("http://localhost:8090")
        .with_header("bad header".to_string(), "x".to_string());
    assert!(HttpApiClient::new(config).is_err());
}

#[test]
fn test_login_reply_with_id_is_a_user() {
    let user = user_from_login_reply(
        r#"{"id":12,"name":"Asha","email":"asha@example.com","password":"secret","role":"CUSTOMER"}"#,
    )
    .unwrap();
    assert_eq!(user.id, "12");
    assert_eq!(user.role, Role::Customer);
}

#[test]
fn test_login_echo_without_id_is_rejected() {
    // Unknown credentials are echoed back verbatim by the server
    let result = user_from_login_reply(
        r#"{"id":null,"name":null,"email":"asha@example.com","password":"wrong","role":null}"#,
    );
    match result {
        Err(FmsError::Authentication { message, .. }) => {
            assert_eq!(message, "Invalid email or password")
        }
        other => panic!("expected authentication error, got {:?}", other),
    }

    assert!(user_from_login_reply("").is_err());
    assert!(user_from_login_reply("not json").is_err());
}

#[test]
fn test_unreadable_rows_are_skipped() {
    let rows = vec![
        serde_json::json!({"id": 1, "rating": 4, "comment": "ok", "service": "Amazon"}),
        serde_json::json!({"id": 2, "rating": 3, "comment": "?", "service": "Uber"}),
        serde_json::json!({"id": 3, "rating": -1, "comment": "?", "service": "SBI"}),
        serde_json::json!("not a record"),
    ];

    let items = feedback_from_rows(rows);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "1");
    assert!(feedback_from_rows(Vec::new()).is_empty());
}
