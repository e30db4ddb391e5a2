//! Resource services: paths, methods, bodies and typed results

use crate::mock_server::ScriptedTransport;
use opencode_sdk::api::{
    AppLogParams, DirectoryParams, FileListParams, FileReadParams, FindTextParams, LogLevel,
    SessionPermissionParams, SessionPromptParams, ToastVariant, ToolListParams, TuiShowToastParams,
};
use opencode_sdk::types::{Auth, FileNodeType, FileStatus, MessageRole, PermissionResponse};
use opencode_sdk::{Error, RequestContext};
use serde_json::{json, Value};

fn body_json(body: &Option<String>) -> Value {
    serde_json::from_str(body.as_deref().expect("body")).expect("json body")
}

#[tokio::test]
async fn test_prompt_posts_parts_and_decodes_reply() {
    let reply = r#"{"info":{"id":"msg_2","sessionID":"ses_1","role":"assistant","parentID":"msg_1",
        "time":{"created":1},"providerID":"anthropic","modelID":"claude","mode":"build",
        "path":{"cwd":"/w","root":"/w"},"cost":0,"tokens":{"input":1,"output":1}},
        "parts":[{"id":"prt_1","sessionID":"ses_1","messageID":"msg_2","type":"text","text":"Hello!"}]}"#;
    let transport = ScriptedTransport::new().respond(200, reply);
    let client = transport.client("http://opencode.test", 0);

    let mut params = SessionPromptParams::text("hi").unwrap();
    params.directory = Some("/w".into());
    let out = client
        .session()
        .prompt(&RequestContext::new(), "ses_1", &params)
        .await
        .unwrap();

    assert_eq!(out.info.kind(), &MessageRole::Assistant);
    assert_eq!(out.parts[0].as_text().unwrap().text, "Hello!");

    let seen = &transport.requests()[0];
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.url.path(), "/session/ses_1/message");
    assert_eq!(seen.url.query(), Some("directory=%2Fw"));
    assert_eq!(seen.headers.get("content-type").unwrap(), "application/json");
    assert_eq!(
        body_json(&seen.body),
        json!({"parts": [{"type": "text", "text": "hi"}]})
    );
}

#[tokio::test]
async fn test_permission_response() {
    let transport = ScriptedTransport::new().respond(200, "true");
    let client = transport.client("http://opencode.test", 0);

    let params = SessionPermissionParams {
        response: PermissionResponse::Once,
        directory: None,
    };
    assert!(client
        .session()
        .respond_permission(&RequestContext::new(), "ses_1", "per_9", &params)
        .await
        .unwrap());

    let seen = &transport.requests()[0];
    assert_eq!(seen.url.path(), "/session/ses_1/permissions/per_9");
    assert_eq!(body_json(&seen.body), json!({"response": "once"}));

    let err = client
        .session()
        .respond_permission(&RequestContext::new(), "ses_1", "", &params)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_auth_set_sends_union_body() {
    let transport = ScriptedTransport::new().respond(200, "true");
    let client = transport.client("http://opencode.test", 0);

    let auth = Auth::api_key("sk-123").unwrap();
    client
        .auth()
        .set(&RequestContext::new(), "anthropic", &auth, &DirectoryParams::default())
        .await
        .unwrap();

    let seen = &transport.requests()[0];
    assert_eq!(seen.method, "PUT");
    assert_eq!(seen.url.path(), "/auth/anthropic");
    assert_eq!(body_json(&seen.body), json!({"type": "api", "key": "sk-123"}));
}

#[tokio::test]
async fn test_required_query_parameters() {
    let transport = ScriptedTransport::new().respond(200, r#"{"type":"raw","content":"fn main() {}"}"#);
    let client = transport.client("http://opencode.test", 0);
    let ctx = RequestContext::new();

    let err = client.file().read(&ctx, &FileReadParams::default()).await.unwrap_err();
    assert_eq!(err.context().and_then(|c| c.field_path.as_deref()), Some("query.path"));
    assert!(transport.requests().is_empty());

    let content = client
        .file()
        .read(
            &ctx,
            &FileReadParams {
                path: "src/main.rs".into(),
                directory: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(content.kind, "raw");
    assert_eq!(transport.requests()[0].url.query(), Some("path=src%2Fmain.rs"));
}

#[tokio::test]
async fn test_find_text_and_toast() {
    let transport = ScriptedTransport::new().respond(200, "[]").respond(200, "true");
    let client = transport.client("http://opencode.test", 0);
    let ctx = RequestContext::new();

    let matches = client
        .find()
        .text(
            &ctx,
            &FindTextParams {
                pattern: "fn main".into(),
                directory: Some("/w".into()),
            },
        )
        .await
        .unwrap();
    assert!(matches.is_empty());

    let toast = TuiShowToastParams {
        title: None,
        message: "done".into(),
        variant: ToastVariant::Success,
        directory: None,
    };
    assert!(client.tui().show_toast(&ctx, &toast).await.unwrap());

    let seen = transport.requests();
    assert_eq!(seen[0].url.path(), "/find");
    assert_eq!(seen[0].url.query(), Some("directory=%2Fw&pattern=fn+main"));
    assert_eq!(seen[1].url.path(), "/tui/show-toast");
    assert_eq!(body_json(&seen[1].body), json!({"message": "done", "variant": "success"}));
}

#[tokio::test]
async fn test_session_lifecycle_paths() {
    let session = r#"{"id":"ses_1","projectID":"p","directory":"/w","title":"t","version":"1",
        "time":{"created":1,"updated":2},"share":{"url":"https://opncd.ai/s/1"}}"#;
    let transport = ScriptedTransport::new()
        .respond(200, session)
        .respond(200, "[]")
        .respond(200, "true");
    let client = transport.client("http://opencode.test", 0);
    let ctx = RequestContext::new();
    let none = DirectoryParams::default();

    let shared = client.session().share(&ctx, "ses_1", &none).await.unwrap();
    assert_eq!(shared.share.unwrap().url, "https://opncd.ai/s/1");
    assert!(client.session().children(&ctx, "ses_1", &none).await.unwrap().is_empty());
    assert!(client.session().delete(&ctx, "ses_1", &none).await.unwrap());

    let seen: Vec<(String, String)> = transport
        .requests()
        .into_iter()
        .map(|r| (r.method, r.url.path().to_string()))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("POST".to_string(), "/session/ses_1/share".to_string()),
            ("GET".to_string(), "/session/ses_1/children".to_string()),
            ("DELETE".to_string(), "/session/ses_1".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_log_tools_and_file_listing() {
    let transport = ScriptedTransport::new()
        .respond(200, "true")
        .respond(200, r#"["bash","read"]"#)
        .respond(200, r#"[{"id":"bash","description":"Run a command","parameters":{"type":"object"}}]"#)
        .respond(200, r#"[{"name":"src","path":"src","absolute":"/w/src","type":"directory"}]"#)
        .respond(200, r#"[{"path":"src/lib.rs","added":3,"removed":1,"status":"modified"}]"#);
    let client = transport.client("http://opencode.test", 0);
    let ctx = RequestContext::new();

    let entry = AppLogParams {
        service: "demo".into(),
        level: LogLevel::Warn,
        message: "hi".into(),
        extra: None,
        directory: Some("/w".into()),
    };
    assert!(client.app().log(&ctx, &entry).await.unwrap());

    let ids = client.tool().ids(&ctx, &DirectoryParams::default()).await.unwrap();
    assert_eq!(ids, vec!["bash", "read"]);

    let missing = client.tool().list(&ctx, &ToolListParams::default()).await.unwrap_err();
    assert_eq!(missing.context().and_then(|c| c.field_path.as_deref()), Some("query.provider"));
    let tools = client
        .tool()
        .list(
            &ctx,
            &ToolListParams {
                provider: "anthropic".into(),
                model: "claude".into(),
                directory: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(tools[0].id, "bash");

    let nodes = client
        .file()
        .list(
            &ctx,
            &FileListParams {
                path: "src".into(),
                directory: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(nodes[0].node_type, FileNodeType::Directory);
    assert!(!nodes[0].ignored);

    let changed = client.file().status(&ctx, &DirectoryParams::default()).await.unwrap();
    assert_eq!(changed[0].status, FileStatus::Modified);

    let seen = transport.requests();
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0].url.path(), "/log");
    assert_eq!(seen[0].url.query(), Some("directory=%2Fw"));
    assert_eq!(
        body_json(&seen[0].body),
        json!({"service": "demo", "level": "warn", "message": "hi"})
    );
    assert_eq!(seen[1].url.path(), "/experimental/tool/ids");
    assert_eq!(seen[2].url.query(), Some("model=claude&provider=anthropic"));
    assert_eq!(seen[3].url.as_str(), "http://opencode.test/file?path=src");
    assert_eq!(seen[4].url.path(), "/file/status");
}

#[tokio::test]
async fn test_ids_with_separators_stay_in_their_segment() {
    let session = r#"{"id":"abc/message","projectID":"p","directory":"/w","title":"t","version":"1",
        "time":{"created":1,"updated":2}}"#;
    let transport = ScriptedTransport::new().respond(200, session);
    let client = transport.client("http://opencode.test", 0);
    let ctx = RequestContext::new();
    let none = DirectoryParams::default();

    let fetched = client.session().get(&ctx, "abc/message", &none).await.unwrap();
    assert_eq!(fetched.id, "abc/message");
    assert_eq!(
        transport.requests()[0].url.as_str(),
        "http://opencode.test/session/abc%2Fmessage"
    );

    let err = client.session().get(&ctx, "..", &none).await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    let err = client
        .auth()
        .set(&ctx, ".", &Auth::api_key("k").unwrap(), &none)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(transport.requests().len(), 1);
}
