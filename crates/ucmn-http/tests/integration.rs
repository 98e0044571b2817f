//! Integration tests for ucmn-http using mockito

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use ucmn_http::{
    HttpClient, HttpError, HttpResponse, HttpResult, TransportCall, TransportCallback,
    JSON_CONTENT_TYPE,
};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestPayload {
    name: String,
    value: i32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestResponse {
    success: bool,
    data: String,
}

type Outcome<T> = HttpResult<Option<HttpResponse<T>>>;

struct ChannelCallback<T> {
    sender: oneshot::Sender<Outcome<T>>,
}

impl<T: Send + 'static> TransportCallback<T> for ChannelCallback<T> {
    fn on_response(
        self: Box<Self>,
        _call: &dyn TransportCall<T>,
        response: Option<HttpResponse<T>>,
    ) {
        let _ = self.sender.send(Ok(response));
    }

    fn on_failure(self: Box<Self>, _call: &dyn TransportCall<T>, error: HttpError) {
        let _ = self.sender.send(Err(error));
    }
}

fn enqueue<T: Send + 'static>(call: Arc<dyn TransportCall<T>>) -> oneshot::Receiver<Outcome<T>> {
    let (sender, receiver) = oneshot::channel();
    call.enqueue(Box::new(ChannelCallback { sender }));
    receiver
}

// === HttpCall tests ===

#[tokio::test]
async fn test_call_enqueue_success() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/data")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "data": "hello"}"#)
        .create_async()
        .await;

    let client = HttpClient::new();
    let call = Arc::new(client.get(&format!("{}/api/data", server.url())).call::<TestResponse>());
    let outcome = enqueue(call.clone()).await.expect("callback invoked");

    let response = outcome
        .expect("call should succeed")
        .expect("response should be present");
    assert_eq!(response.status(), 200);
    assert!(response.is_success());
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(
        response.body(),
        Some(&TestResponse {
            success: true,
            data: "hello".to_string()
        })
    );
    assert!(call.is_executed());
    assert!(!call.is_canceled());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_call_empty_success_body() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("DELETE", "/api/item/1")
        .with_status(204)
        .create_async()
        .await;

    let client = HttpClient::new();
    let call = Arc::new(
        client
            .delete(&format!("{}/api/item/1", server.url()))
            .call::<TestResponse>(),
    );
    let response = enqueue(call)
        .await
        .expect("callback invoked")
        .expect("call should succeed")
        .expect("response should be present");

    assert_eq!(response.status(), 204);
    assert!(response.body().is_none());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_call_error_status_keeps_raw_body() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/missing")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "not found"}"#)
        .create_async()
        .await;

    let client = HttpClient::new();
    let call = Arc::new(
        client
            .get(&format!("{}/api/missing", server.url()))
            .call::<TestResponse>(),
    );
    let response = enqueue(call)
        .await
        .expect("callback invoked")
        .expect("an error status is still a response")
        .expect("response should be present");

    assert_eq!(response.status(), 404);
    assert!(response.is_client_error());
    assert!(response.body().is_none());

    let error_body = response.error_body().expect("error body kept");
    assert_eq!(error_body.content_type(), Some(JSON_CONTENT_TYPE));
    assert_eq!(
        error_body.text().expect("utf-8 body"),
        r#"{"error": "not found"}"#
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_call_invalid_json_is_failure() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/garbage")
        .with_status(200)
        .with_body("definitely not json")
        .create_async()
        .await;

    let client = HttpClient::new();
    let call = Arc::new(
        client
            .get(&format!("{}/api/garbage", server.url()))
            .call::<TestResponse>(),
    );
    let outcome = enqueue(call).await.expect("callback invoked");

    assert!(matches!(outcome, Err(HttpError::Serialization(_))));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_call_enqueue_twice() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/once")
        .with_status(200)
        .with_body(r#"{"success": true, "data": "once"}"#)
        .create_async()
        .await;

    let client = HttpClient::new();
    let call: Arc<dyn TransportCall<TestResponse>> = Arc::new(
        client
            .get(&format!("{}/api/once", server.url()))
            .call::<TestResponse>(),
    );

    let first = enqueue(call.clone());
    let second = enqueue(call.clone());

    let first = first.await.expect("callback invoked");
    let second = second.await.expect("callback invoked");
    assert!(first.is_ok());
    assert!(matches!(second, Err(HttpError::AlreadyExecuted)));
}

#[tokio::test]
async fn test_call_enqueue_after_cancel() {
    let client = HttpClient::new();
    let call = Arc::new(client.get("http://127.0.0.1:1/never").call::<TestResponse>());
    call.cancel();

    let outcome = enqueue(call.clone()).await.expect("callback invoked");
    assert!(matches!(outcome, Err(HttpError::Canceled)));
    assert!(!call.is_executed());
}

#[tokio::test]
async fn test_call_cancel_in_flight() {
    // Accepts the connection but never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let _server = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(60)).await;
    });

    let client = HttpClient::new();
    let call = Arc::new(
        client
            .get(&format!("http://{}/slow", addr))
            .call::<TestResponse>(),
    );
    let receiver = enqueue(call.clone());

    tokio::time::sleep(Duration::from_millis(50)).await;
    call.cancel();

    let outcome = receiver.await.expect("callback invoked");
    assert!(matches!(outcome, Err(HttpError::Canceled)));
    assert!(call.is_canceled());
    assert!(call.is_executed());
}

#[tokio::test]
async fn test_call_connection_refused() {
    let client = HttpClient::new();
    // Port 1 is never bound in the test environment
    let call = Arc::new(client.get("http://127.0.0.1:1/").call::<TestResponse>());
    let outcome = enqueue(call).await.expect("callback invoked");

    assert!(matches!(
        outcome,
        Err(HttpError::Connection(_)) | Err(HttpError::Other(_))
    ));
}

// === RequestBuilder tests ===

#[tokio::test]
async fn test_send_returns_error_statuses() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/error")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let client = HttpClient::new();
    let response = client
        .get(&format!("{}/api/error", server.url()))
        .send::<TestResponse>()
        .await
        .expect("send should succeed");

    assert!(response.is_server_error());
    let error_body = response.error_body().expect("error body kept");
    assert_eq!(error_body.text().expect("utf-8"), "Internal Server Error");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_request_builder_with_headers_and_query() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/search")
        .match_query(mockito::Matcher::UrlEncoded("q".into(), "rust".into()))
        .match_header("authorization", "Bearer secret")
        .match_header("x-custom", "value")
        .with_status(200)
        .with_body(r#"{"success": true, "data": "found"}"#)
        .create_async()
        .await;

    let client = HttpClient::new();
    let result: TestResponse = client
        .get(&format!("{}/api/search", server.url()))
        .query(&[("q", "rust")])
        .bearer_auth("secret")
        .header("x-custom", "value")
        .send_json()
        .await
        .expect("request should succeed");

    assert_eq!(result.data, "found");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_put_form() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("PUT", "/api/form")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body("name=test&value=42")
        .with_status(200)
        .with_body(r#"{"success": true, "data": "stored"}"#)
        .create_async()
        .await;

    let client = HttpClient::new();
    let payload = TestPayload {
        name: "test".to_string(),
        value: 42,
    };
    let result: TestResponse = client
        .put(&format!("{}/api/form", server.url()))
        .form(&payload)
        .send_json()
        .await
        .expect("form PUT should succeed");

    assert_eq!(result.data, "stored");

    mock.assert_async().await;
}

// === HttpClient convenience tests ===

#[tokio::test]
async fn test_fetch_success() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/data")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "data": "hello"}"#)
        .create_async()
        .await;

    let client = HttpClient::new();
    let response: TestResponse = client
        .fetch(&format!("{}/api/data", server.url()))
        .await
        .expect("Fetch should succeed");

    assert!(response.success);
    assert_eq!(response.data, "hello");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_error_status() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/error")
        .with_status(404)
        .with_body("Not Found")
        .create_async()
        .await;

    let client = HttpClient::new();
    let result: Result<TestResponse, _> = client
        .fetch(&format!("{}/api/error", server.url()))
        .await;

    if let Err(HttpError::Status { status, message }) = result {
        assert_eq!(status, 404);
        assert_eq!(message, "Not Found");
    } else {
        panic!("Expected HttpError::Status");
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_post_json_success() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/submit")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "name": "test",
            "value": 42
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "data": "received"}"#)
        .create_async()
        .await;

    let client = HttpClient::new();
    let payload = TestPayload {
        name: "test".to_string(),
        value: 42,
    };
    let response: TestResponse = client
        .post_json(&format!("{}/api/submit", server.url()), &payload)
        .await
        .expect("POST JSON should succeed");

    assert!(response.success);
    assert_eq!(response.data, "received");

    mock.assert_async().await;
}
