use reqwest::{
    header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, ORIGIN},
    Method, StatusCode,
};
use serde_json::{json, Value};

use super::common::{assert_common_fields, spawn_app};

#[tokio::test]
async fn test_echo_get_nested_path() {
    let server = spawn_app().await;

    let response = server
        .client
        .get(server.url("/foo/bar"))
        .header("x-test-header", "hello-header")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["path"], "/foo/bar");
    assert_eq!(body["method"], "GET");
    assert_eq!(body["body"], Value::Null);
    assert_eq!(body["headers"]["x-test-header"], "hello-header");
    assert!(body["headers"]["host"].is_string());

    let record = server.logs.last();
    assert_common_fields(&record, "GET", "/foo/bar", 200);
    assert_eq!(record["level"], "INFO");
    assert!(record.get("error").is_none());
}

#[tokio::test]
async fn test_echo_root_path() {
    let server = spawn_app().await;

    let body: Value = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["path"], "/");
}

#[tokio::test]
async fn test_echo_json_body_is_structured() {
    let server = spawn_app().await;

    let body: Value = server
        .client
        .post(server.url("/x"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"a":1}"#)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["method"], "POST");
    assert_eq!(body["body"], json!({"a": 1}));
}

#[tokio::test]
async fn test_echo_json_body_without_content_type() {
    let server = spawn_app().await;

    let body: Value = server
        .client
        .patch(server.url("/items/7"))
        .body("[1, 2, 3]")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["body"], json!([1, 2, 3]));
}

#[tokio::test]
async fn test_echo_raw_text_body() {
    let server = spawn_app().await;

    let body: Value = server
        .client
        .post(server.url("/x"))
        .header(CONTENT_TYPE, "text/plain")
        .body("hello")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["body"], "hello");
}

#[tokio::test]
async fn test_echo_empty_body_is_null() {
    let server = spawn_app().await;

    for method in [Method::PUT, Method::DELETE] {
        let response = server
            .client
            .request(method.clone(), server.url("/empty"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["method"], method.as_str());
        assert_eq!(body["body"], Value::Null);
    }
}

#[tokio::test]
async fn test_echo_head_has_diagnostic_headers() {
    let server = spawn_app().await;

    let response = server.client.head(server.url("/probe")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-process-time"));
    assert!(response.headers().contains_key("x-correlation-id"));

    let record = server.logs.last();
    assert_common_fields(&record, "HEAD", "/probe", 200);
}

#[tokio::test]
async fn test_error_paths_echo_other_methods() {
    let server = spawn_app().await;

    let response = server
        .client
        .post(server.url("/error/400"))
        .body("payload")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["path"], "/error/400");
    assert_eq!(body["method"], "POST");
    assert_eq!(body["body"], "payload");
}

#[tokio::test]
async fn test_plain_options_reaches_echo() {
    let server = spawn_app().await;

    let response = server
        .client
        .request(Method::OPTIONS, server.url("/x"))
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-correlation-id"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["path"], "/x");
    assert_eq!(body["method"], "OPTIONS");
    assert_eq!(body["body"], "hello");

    let record = server.logs.last();
    assert_common_fields(&record, "OPTIONS", "/x", 200);
}

#[tokio::test]
async fn test_cross_origin_options_without_preflight_reaches_echo() {
    let server = spawn_app().await;

    let response = server
        .client
        .request(Method::OPTIONS, server.url("/x"))
        .header(ORIGIN, "https://client.test")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://client.test"
    );

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["method"], "OPTIONS");
    assert_eq!(body["body"], Value::Null);
}

#[tokio::test]
async fn test_echo_path_is_percent_decoded() {
    let server = spawn_app().await;

    let body: Value = server
        .client
        .get(server.url("/foo%20bar"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["path"], "/foo bar");

    let record = server.logs.last();
    assert_common_fields(&record, "GET", "/foo bar", 200);
}
