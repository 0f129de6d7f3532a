//
//  basecamp-cli
//  tests/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! End-to-end requests through `ReqwestTransport` against a mock server.

use basecamp_cli::api::{
    ApiClient, ApiError, ApiResult, ClientConfig, DecodePolicy, Method, RequestBuilder,
    ResponseBody, ReqwestTransport, RouteStyle, Transport, TransportError,
};
use basecamp_cli::auth::{AuthCredential, Credentials};
use mockito::Matcher;
use serde_json::{json, Value};

fn bearer() -> Credentials {
    Credentials::new(AuthCredential::bearer("t0ken")).with_account("999")
}

fn client(url: &str, credentials: Credentials) -> ApiClient {
    let config = ClientConfig::new(url).with_route_style(RouteStyle::with_suffix(".json"));
    ApiClient::new(credentials, config).unwrap()
}

#[tokio::test]
async fn test_get_sends_filtered_query_and_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/projects.json")
        .match_query(Matcher::Exact("status=archived".to_string()))
        .match_header("authorization", "Bearer t0ken")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":1,"name":"HQ"}]"#)
        .create_async()
        .await;

    let result = client(&server.url(), bearer())
        .get_with("/projects", &json!({"status": "archived", "page": 0, "q": ""}))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        result,
        ApiResult::Success {
            status: 200,
            body: ResponseBody::Json(json!([{"id": 1, "name": "HQ"}]))
        }
    );
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/buckets/1/todolists/2/todos.json")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"content": "Ship it", "notify": false})))
        .with_status(201)
        .with_body(r#"{"id":7}"#)
        .create_async()
        .await;

    let result = client(&server.url(), bearer())
        .post("buckets/1/todolists/2/todos", &json!({"content": "Ship it", "notify": false}))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(result.is_success());
    assert_eq!(result.status(), 201);
    assert_eq!(result.body().as_json(), Some(&json!({"id": 7})));
}

#[tokio::test]
async fn test_api_key_headers_and_plain_routes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/people/me")
        .match_header("x-auth-email", "me@example.com")
        .match_header("x-auth-key", "k3y")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"id":5}"#)
        .create_async()
        .await;

    let credentials = Credentials::new(AuthCredential::api_key("k3y", "me@example.com"));
    let client = ApiClient::new(credentials, ClientConfig::new(server.url())).unwrap();

    let result = client.get("people/me").await.unwrap();

    mock.assert_async().await;
    assert!(result.is_success());
}

#[tokio::test]
async fn test_raw_string_body_is_sent_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/attachments")
        .match_body("plain payload")
        .with_status(204)
        .create_async()
        .await;

    let client = ApiClient::new(Credentials::anonymous(), ClientConfig::new(server.url())).unwrap();
    let result = client
        .put("attachments", &Value::String("plain payload".to_string()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.status(), 204);
    assert!(result.body().is_empty());
}

#[tokio::test]
async fn test_not_found_is_failure_not_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/projects/404.json")
        .with_status(404)
        .with_body(r#"{"error":"The resource you were looking for could not be found"}"#)
        .create_async()
        .await;

    let result = client(&server.url(), bearer()).get("projects/404").await.unwrap();

    assert!(!result.is_success());
    assert_eq!(
        result.api_message().as_deref(),
        Some("The resource you were looking for could not be found")
    );
    let err = result.into_result().unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Status: 404");
}

#[tokio::test]
async fn test_non_json_body_follows_decode_policy() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/ping")
        .with_status(200)
        .with_body("pong")
        .expect(2)
        .create_async()
        .await;

    let raw = ApiClient::new(bearer(), ClientConfig::new(server.url())).unwrap();
    let result = raw.get("ping").await.unwrap();
    assert_eq!(result.body(), &ResponseBody::Text("pong".to_string()));

    let null = ApiClient::new(
        bearer(),
        ClientConfig::new(server.url()).with_decode(DecodePolicy::NullOnError),
    )
    .unwrap();
    let result = null.get("ping").await.unwrap();
    assert!(result.is_success());
    assert_eq!(result.body(), &ResponseBody::Empty);
}

#[tokio::test]
async fn test_server_error_is_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("DELETE", "/projects/3.json")
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let result = client(&server.url(), bearer()).delete("projects/3").await.unwrap();

    match result {
        ApiResult::Failure {
            status,
            message,
            body,
        } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Status: 503");
            assert_eq!(body, ResponseBody::Text("upstream unavailable".to_string()));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = client("http://127.0.0.1:1", bearer());

    let err = client.get("projects").await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::Transport(TransportError::Network(_))
    ));
}

#[tokio::test]
async fn test_repeated_response_headers_are_kept() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/session")
        .with_status(200)
        .with_header("set-cookie", "a=1")
        .with_header("set-cookie", "b=2")
        .create_async()
        .await;

    let url = server.url();
    let style = RouteStyle::plain();
    let credentials = Credentials::anonymous();
    let request = RequestBuilder::new(&url, &style, &credentials)
        .build("session", &Value::Null, Method::Get)
        .unwrap();

    let response = ReqwestTransport::new().unwrap().send(&request).await.unwrap();

    assert_eq!(
        response.headers.get_all("set-cookie").collect::<Vec<_>>(),
        vec!["a=1", "b=2"]
    );
}
