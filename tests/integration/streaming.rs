//! Integration tests for server-sent-event streams

use crate::mock_server::{MockServerFixture, ScriptedTransport};
use futures::StreamExt;
use opencode_sdk::api::DirectoryParams;
use opencode_sdk::pipeline::PipelineError;
use opencode_sdk::types::{EventType, PartType};
use opencode_sdk::{Error, ErrorClass, RequestContext};

#[tokio::test]
async fn test_event_stream_yields_typed_events() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_sse(
            "/event",
            &[
                r#"data: {"type":"server.connected","properties":{}}"#,
                ": keep-alive",
                r#"data: {"type":"message.part.updated","properties":{"delta":"Hi","part":{"id":"prt_1","sessionID":"s","messageID":"m","type":"text","text":"Hi"}}}"#,
                r#"data: {"type":"session.idle","properties":{"sessionID":"s"}}"#,
            ],
        )
        .await;

    let client = fixture.client(2);
    let ctx = RequestContext::new();
    let mut stream = client.event().subscribe(&ctx, &DirectoryParams::default()).await;

    let mut kinds = Vec::new();
    while stream.next().await {
        let event = stream.current().unwrap();
        kinds.push(event.kind().clone());
        if event.kind() == &EventType::MessagePartUpdated {
            let part = event.as_message_part_updated().unwrap().properties.part;
            assert_eq!(part.kind(), &PartType::Text);
            assert_eq!(part.as_text().unwrap().text, "Hi");
        }
    }

    assert!(stream.err().is_none(), "{:?}", stream.err());
    assert_eq!(
        kinds,
        vec![EventType::ServerConnected, EventType::MessagePartUpdated, EventType::SessionIdle]
    );
}

#[tokio::test]
async fn test_stream_error_status_is_eager() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.lock().await;
        server
            .mock("GET", "/event")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_header("x-request-id", "req_sse")
            .with_body(r#"{"message":"slow down"}"#)
            .expect(1)
            .create_async()
            .await
    };

    let client = fixture.client(3);
    let ctx = RequestContext::new();
    let mut stream = client.event().subscribe(&ctx, &DirectoryParams::default()).await;

    // the error is there before the first pull
    let err = stream.err().expect("stored error");
    assert!(err.is(ErrorClass::RateLimited));
    let api = err.as_api().unwrap();
    assert_eq!(api.message, "slow down");
    assert_eq!(api.request_id.as_deref(), Some("req_sse"));

    assert!(!stream.next().await);
    assert!(stream.current().is_none());
    assert!(!stream.is_open());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_event_ends_stream() {
    let transport = ScriptedTransport::new().respond(
        200,
        "data: {\"type\":\"server.connected\",\"properties\":{}}\n\n\
         event: error\ndata: {\"message\":\"bus closed\"}\n\n\
         data: {\"type\":\"session.idle\",\"properties\":{\"sessionID\":\"s\"}}\n\n",
    );
    let client = transport.client("http://opencode.test", 0);
    let ctx = RequestContext::new();
    let mut stream = client.event().subscribe(&ctx, &DirectoryParams::default()).await;

    assert!(stream.next().await);
    assert_eq!(stream.current().unwrap().kind(), &EventType::ServerConnected);
    assert!(!stream.next().await);
    match stream.err() {
        Some(Error::Pipeline(PipelineError::ServerEvent { message })) => assert_eq!(message, "bus closed"),
        other => panic!("unexpected: {:?}", other),
    }
    assert!(!stream.next().await);

    let seen = &transport.requests()[0];
    assert_eq!(seen.headers.get("accept").unwrap(), "text/event-stream");
}

#[tokio::test]
async fn test_stream_adapts_to_futures_stream() {
    let transport = ScriptedTransport::new().respond(
        200,
        "data: {\"type\":\"file.edited\",\"properties\":{\"file\":\"a.rs\"}}\r\n\r\n\
         data: {\"type\":\"ide.installed\",\"properties\":{\"ide\":\"vscode\"}}\r\n\r\n",
    );
    let client = transport.client("http://opencode.test", 0);
    let ctx = RequestContext::new();

    let events: Vec<_> = client
        .event()
        .subscribe(&ctx, &DirectoryParams::new("/w"))
        .await
        .into_stream()
        .collect()
        .await;

    assert_eq!(events.len(), 2);
    let first = events[0].as_ref().unwrap();
    assert_eq!(first.as_file_edited().unwrap().properties.file, "a.rs");
    assert_eq!(transport.requests()[0].url.query(), Some("directory=%2Fw"));
}

#[tokio::test]
async fn test_cancelled_context_closes_stream() {
    let transport = ScriptedTransport::new()
        .respond(200, "data: {\"type\":\"server.connected\",\"properties\":{}}\n\n");
    let client = transport.client("http://opencode.test", 0);
    let ctx = RequestContext::new();
    let mut stream = client.event().subscribe(&ctx, &DirectoryParams::default()).await;

    ctx.cancel();
    assert!(!stream.next().await);
    assert!(stream.err().unwrap().is_cancelled());
}
