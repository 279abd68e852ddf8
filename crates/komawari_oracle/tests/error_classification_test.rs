use komawari_config::OracleConfig;
use komawari_core::{Message, OracleRequest};
use komawari_error::OracleErrorKind;
use komawari_interface::Oracle;
use komawari_oracle::{ChatCompletionsOracle, classify_error, classify_status};

#[test]
fn auth_statuses_are_fatal() {
    for code in [401, 403] {
        let kind = classify_status(code, "denied".to_string());
        assert!(kind.is_fatal(), "status {}", code);
        assert!(!kind.is_retryable(), "status {}", code);
        assert_eq!(classify_error(&kind), "auth");
    }
}

#[test]
fn transient_statuses_are_retryable() {
    for code in [408, 429, 500, 502, 503, 504] {
        let kind = classify_status(code, String::new());
        assert!(kind.is_retryable(), "status {}", code);
        assert!(!kind.is_fatal(), "status {}", code);
    }
    assert_eq!(classify_error(&classify_status(429, String::new())), "rate_limit");
    assert_eq!(classify_error(&classify_status(503, String::new())), "server");
}

#[test]
fn client_errors_are_neither_fatal_nor_retryable() {
    let kind = classify_status(400, "bad request".to_string());
    assert!(!kind.is_fatal());
    assert!(!kind.is_retryable());
    assert_eq!(classify_error(&kind), "http");
}

#[test]
fn other_kinds_have_metric_labels() {
    assert_eq!(classify_error(&OracleErrorKind::Timeout(120)), "timeout");
    assert_eq!(
        classify_error(&OracleErrorKind::Transport("reset".into())),
        "network"
    );
    assert_eq!(classify_error(&OracleErrorKind::EmptyResponse), "empty");
}

#[test]
fn endpoint_joins_base_url() {
    let oracle = ChatCompletionsOracle::new(
        "key".to_string(),
        "gpt-4o-mini".to_string(),
        "http://localhost:9/v1/",
        5,
        0,
    )
    .unwrap();
    assert_eq!(oracle.endpoint(), "http://localhost:9/v1/chat/completions");
    assert_eq!(oracle.provider_name(), "openai");
    assert_eq!(oracle.model_name(), "gpt-4o-mini");
}

#[test]
fn from_config_requires_api_key() {
    let config: OracleConfig = serde_json::from_value(serde_json::json!({
        "api_key_env": "KOMAWARI_ORACLE_TEST_KEY_NEVER_SET"
    }))
    .unwrap();
    let err = ChatCompletionsOracle::from_config(&config).unwrap_err();
    assert!(err.is_fatal());
}

#[tokio::test]
async fn unreachable_endpoint_is_a_window_local_failure() {
    // Port 9 (discard) is closed on test hosts; the connection is refused.
    let oracle = ChatCompletionsOracle::new(
        "key".to_string(),
        "m".to_string(),
        "http://127.0.0.1:9/v1",
        2,
        0,
    )
    .unwrap();
    let request = OracleRequest::new(vec![Message::user("x")]);
    let err = oracle.complete(&request).await.unwrap_err();
    assert!(!err.is_fatal());
}
