use serde_json::json;
use textgen::{Client, ClientConfig, Error, TokenChunk};
use tokio_stream::StreamExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::with_config(
        ClientConfig::new("test-key")
            .with_base_url(server.uri())
            .with_default_model("local-mini"),
    )
    .expect("client")
}

fn sse_event(text: &str) -> String {
    format!(
        "data: {}\n\n",
        json!({ "choices": [{ "text": text, "index": 0 }] })
    )
}

fn sse_body(texts: &[&str], done: bool) -> String {
    let mut body: String = texts.iter().map(|t| sse_event(t)).collect();
    if done {
        body.push_str("data: [DONE]\n\n");
    }
    body
}

#[tokio::test]
async fn chunks_arrive_in_upstream_order_then_terminate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .and(header("Accept", "text/event-stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["The", " cat", " sat"], true), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client.stream("tell me about a cat");

    let mut texts = Vec::new();
    while let Some(item) = stream.next().await {
        texts.push(item.expect("chunk").text);
    }
    assert_eq!(texts, vec!["The", " cat", " sat"]);

    // The body the stream sent carries the streaming flag and resolved model.
    let requests = server.received_requests().await.expect("recorded requests");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("JSON body");
    assert_eq!(body["model"], "local-mini");
    assert_eq!(body["stream"], true);
}

#[tokio::test]
async fn delivered_chunks_survive_a_mid_stream_failure() {
    let server = MockServer::start().await;

    let body = format!("{}data: this is not json\n\n", sse_event("The"));
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client.stream("hi");

    let first = stream.next().await.expect("first item").expect("chunk");
    assert_eq!(
        first,
        TokenChunk {
            text: "The".to_string()
        }
    );

    let second = stream.next().await.expect("terminal item");
    assert!(
        matches!(second, Err(Error::InvalidResponseShape { .. })),
        "expected InvalidResponseShape, got {second:?}"
    );
    assert!(stream.next().await.is_none(), "stream must end after the error");
}

#[tokio::test]
async fn stream_open_rejection_is_classified_like_a_buffered_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": { "message": "Incorrect API key provided" } })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client.stream("hi");

    let first = stream.next().await.expect("terminal item");
    assert!(
        matches!(first, Err(Error::Authentication { .. })),
        "expected Authentication, got {first:?}"
    );
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn upstream_close_without_done_still_terminates_cleanly() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["only", " two"], false), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client.stream("hi");

    let mut texts = Vec::new();
    while let Some(item) = stream.next().await {
        texts.push(item.expect("chunk").text);
    }
    assert_eq!(texts, vec!["only", " two"]);
}

#[tokio::test]
async fn unconsumed_stream_performs_no_network_io() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&["x"], true), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stream = client.stream("never polled");
    drop(stream);

    let requests = server.received_requests().await.expect("recorded requests");
    assert!(requests.is_empty(), "no request may leave before first poll");
}

#[tokio::test]
async fn dropping_mid_stream_stops_consumption() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["one", "two", "three"], true), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client.stream("hi");

    let first = stream.next().await.expect("first item").expect("chunk");
    assert_eq!(first.text, "one");
    // Dropping the stream drops the underlying response; no pending
    // operation survives it.
    drop(stream);
}
