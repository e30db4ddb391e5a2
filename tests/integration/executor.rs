//! Integration tests for request execution, retry and error mapping

use crate::mock_server::{MockServerFixture, ScriptedTransport};
use mockito::Matcher;
use opencode_sdk::api::{DirectoryParams, SessionUpdateParams};
use opencode_sdk::{ApiRequest, Error, ErrorClass, RequestContext, RequestOption};
use serde_json::json;
use std::time::{Duration, Instant};

const SESSION: &str = r#"{"id":"ses_1","projectID":"p","directory":"/w","title":"t","version":"1",
    "time":{"created":1,"updated":2}}"#;

#[tokio::test]
async fn test_retry_bound_on_server_error() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.lock().await;
        server
            .mock("GET", "/session")
            .with_status(500)
            .with_header("retry-after-ms", "1")
            .with_body(r#"{"message":"boom"}"#)
            .expect(4)
            .create_async()
            .await
    };

    let client = fixture.client(3);
    let err = client
        .session()
        .list(&RequestContext::new(), &DirectoryParams::default())
        .await
        .unwrap_err();

    mock.assert_async().await;
    let api = err.as_api().expect("api error");
    assert_eq!(api.status, 500);
    assert_eq!(api.message, "boom");
    assert!(err.is(ErrorClass::Internal));
}

#[tokio::test]
async fn test_no_retry_on_plain_client_error() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json("GET", "/session", 400, r#"{"data":{"message":"bad directory"}}"#, 1)
        .await;

    let client = fixture.client(5);
    let err = client
        .session()
        .list(&RequestContext::new(), &DirectoryParams::default())
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(err.is(ErrorClass::InvalidRequest));
    assert_eq!(err.as_api().unwrap().message, "bad directory");
}

#[tokio::test]
async fn test_retry_after_ms_is_honoured() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.lock().await;
        server
            .mock("GET", "/config")
            .with_status(429)
            .with_header("retry-after-ms", "100")
            .expect(2)
            .create_async()
            .await
    };

    let client = fixture.client(1);
    let start = Instant::now();
    let err = client
        .config_api()
        .get(&RequestContext::new(), &DirectoryParams::default())
        .await
        .unwrap_err();

    assert!(start.elapsed() >= Duration::from_millis(100));
    mock.assert_async().await;
    assert!(err.as_api().unwrap().is_rate_limited());
}

#[tokio::test]
async fn test_should_retry_header_vetoes_retry() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.lock().await;
        server
            .mock("GET", "/path")
            .with_status(503)
            .with_header("x-should-retry", "false")
            .expect(1)
            .create_async()
            .await
    };

    let err = fixture
        .client(3)
        .path()
        .get(&RequestContext::new(), &DirectoryParams::default())
        .await
        .unwrap_err();
    mock.assert_async().await;
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_retry_then_success() {
    let transport = ScriptedTransport::new()
        .respond_with(502, &[("retry-after-ms", "1")], "bad gateway")
        .respond(200, &format!("[{}]", SESSION));

    let client = transport.client("http://opencode.test", 2);
    let sessions = client
        .session()
        .list(&RequestContext::new(), &DirectoryParams::default())
        .await
        .unwrap();

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, "ses_1");
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_query_merge_prefers_call_parameters() {
    let transport = ScriptedTransport::new().respond(200, "[]");
    let client = transport.client("http://opencode.test/?directory=old&keep=1", 0);

    client
        .session()
        .list(&RequestContext::new(), &DirectoryParams::new("/new"))
        .await
        .unwrap();

    let url = &transport.requests()[0].url;
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs.iter().filter(|(k, _)| k == "directory").count(), 1);
    assert!(pairs.contains(&("directory".into(), "/new".into())));
    assert!(pairs.contains(&("keep".into(), "1".into())));
    assert_eq!(url.path(), "/session");
}

#[tokio::test]
async fn test_no_query_means_no_question_mark() {
    let transport = ScriptedTransport::new().respond(200, "[]");
    let client = transport.client("http://opencode.test", 0);

    client
        .project()
        .list(&RequestContext::new(), &DirectoryParams::default())
        .await
        .unwrap();

    let url = &transport.requests()[0].url;
    assert_eq!(url.query(), None);
    assert_eq!(url.as_str(), "http://opencode.test/project");
}

#[tokio::test]
async fn test_pre_cancelled_context_makes_no_attempt() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json("GET", "/session", 200, "[]", 0).await;

    let ctx = RequestContext::new();
    ctx.cancel();
    let err = fixture
        .client(2)
        .session()
        .list(&ctx, &DirectoryParams::default())
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_deadline_cuts_backoff_short() {
    let transport = ScriptedTransport::new().respond(500, "");
    let client = transport.client("http://opencode.test", 5);

    let ctx = RequestContext::new().with_timeout(Duration::from_millis(50));
    let start = Instant::now();
    let err = client
        .session()
        .list(&ctx, &DirectoryParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DeadlineExceeded), "{}", err);
    assert!(start.elapsed() < Duration::from_millis(500));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_default_user_agent_and_override() {
    let fixture = MockServerFixture::new().await;
    let default_ua = {
        let mut server = fixture.lock().await;
        server
            .mock("GET", "/command")
            .match_header("user-agent", Matcher::Regex("^opencode-sdk-rust/".into()))
            .match_header("accept", "application/json")
            .with_body("[]")
            .expect(1)
            .create_async()
            .await
    };
    let client = fixture.client(0);
    client
        .command()
        .list(&RequestContext::new(), &DirectoryParams::default())
        .await
        .unwrap();
    default_ua.assert_async().await;

    let custom_ua = {
        let mut server = fixture.lock().await;
        server
            .mock("GET", "/agent")
            .match_header("user-agent", "my-tool/2.0")
            .with_body("[]")
            .expect(1)
            .create_async()
            .await
    };
    client
        .app()
        .with_option(RequestOption::header("User-Agent", "my-tool/2.0"))
        .agents(&RequestContext::new(), &DirectoryParams::default())
        .await
        .unwrap();
    custom_ua.assert_async().await;
}

#[tokio::test]
async fn test_absent_fields_are_omitted_from_body() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.lock().await;
        server
            .mock("PATCH", "/session/ses_1")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"title": "renamed"})))
            .with_body(SESSION)
            .create_async()
            .await
    };

    let params = SessionUpdateParams {
        title: Some("renamed".into()),
        directory: None,
    };
    let session = fixture
        .client(0)
        .session()
        .update(&RequestContext::new(), "ses_1", &params)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(session.id, "ses_1");
}

#[tokio::test]
async fn test_validation_happens_before_network() {
    let transport = ScriptedTransport::new().respond(200, SESSION);
    let client = transport.client("http://opencode.test", 0);

    let err = client
        .session()
        .get(&RequestContext::new(), "", &DirectoryParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(err.context().and_then(|c| c.field_path.as_deref()), Some("path.id"));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_per_call_transport_override() {
    let fixture = MockServerFixture::new().await;
    let untouched = fixture.mock_json("GET", "/project/current", 200, "{}", 0).await;

    let transport = ScriptedTransport::new()
        .respond(200, r#"{"id":"p1","worktree":"/w","vcs":"git","time":{"created":1}}"#);
    let project = fixture
        .client(0)
        .project()
        .with_option(RequestOption::transport(transport.clone()))
        .current(&RequestContext::new(), &DirectoryParams::default())
        .await
        .unwrap();

    assert_eq!(project.vcs.as_deref(), Some("git"));
    assert_eq!(transport.requests().len(), 1);
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_request_id_and_body_are_kept() {
    let transport = ScriptedTransport::new().respond_with(
        404,
        &[("x-request-id", "req_42")],
        r#"{"name":"NotFoundError","data":{"message":"Session not found: ses_x"}}"#,
    );
    let client = transport.client("http://opencode.test", 2);

    let err = client
        .session()
        .get(&RequestContext::new(), "ses_x", &DirectoryParams::default())
        .await
        .unwrap_err();

    let api = err.as_api().unwrap();
    assert!(api.is_not_found());
    assert_eq!(api.request_id.as_deref(), Some("req_42"));
    assert_eq!(api.message, "Session not found: ses_x");
    assert!(api.body.as_deref().unwrap().contains("NotFoundError"));
    assert_eq!(api.method, "GET");
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_undecodable_success_body() {
    let transport = ScriptedTransport::new().respond(200, r#"{"not":"a list"}"#);
    let client = transport.client("http://opencode.test", 0);

    let err = client
        .session()
        .list(&RequestContext::new(), &DirectoryParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_raw_execute_with_options() {
    let transport = ScriptedTransport::new().respond(200, "true");
    let client = transport.client("http://opencode.test/base/", 0);

    let request = ApiRequest::post("tui/open-help").query_pair("directory", "/w");
    let ok: bool = client
        .execute(
            &RequestContext::new(),
            request,
            &[
                RequestOption::query_add("trace", "1"),
                RequestOption::header("x-extra", "yes"),
            ],
        )
        .await
        .unwrap();

    assert!(ok);
    let seen = &transport.requests()[0];
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.url.path(), "/base/tui/open-help");
    assert_eq!(seen.url.query(), Some("directory=%2Fw&trace=1"));
    assert_eq!(seen.headers.get("x-extra").unwrap(), "yes");
}
