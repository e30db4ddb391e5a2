//! Discriminated union decoding through the public API

use opencode_sdk::types::{
    BashPermission, ConfigMcp, ConfigMcpType, Event, EventType, Message, Part, PermissionPattern,
    ToolStatus,
};
use opencode_sdk::{JsonShape, VariantError};
use serde_json::Value;

#[test]
fn test_event_round_trip_is_verbatim() {
    let raw = r#"{"type":"installation.updated","properties":{"version":"1.2.3","future_field":[1,{"a":null}]}}"#;
    let event: Event = serde_json::from_str(raw).unwrap();
    assert_eq!(event.kind(), &EventType::InstallationUpdated);

    let encoded = serde_json::to_string(&event).unwrap();
    let a: Value = serde_json::from_str(raw).unwrap();
    let b: Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_round_trip_inside_containers() {
    let raw = r#"[{"type":"session.idle","properties":{"sessionID":"a"}},{"type":"brand.new","x":1}]"#;
    let events: Vec<Event> = serde_json::from_str(raw).unwrap();
    assert!(events[0].kind().is_known());
    assert!(!events[1].kind().is_known());
    assert_eq!(serde_json::to_string(&events).unwrap(), raw);
}

#[test]
fn test_config_mcp_wrong_variant_versus_malformed() {
    let mcp: ConfigMcp = r#"{"type":"local","command":"not-an-array"}"#.parse().unwrap();
    assert_eq!(mcp.kind(), &ConfigMcpType::Local);

    match mcp.as_local() {
        Err(VariantError::Malformed { union, variant, source }) => {
            assert_eq!(union, "ConfigMcp");
            assert_eq!(variant, "local");
            assert!(source.is_data());
        }
        other => panic!("expected malformed, got {:?}", other),
    }
    match mcp.as_remote() {
        Err(VariantError::WrongVariant { expected, actual, .. }) => {
            assert_eq!(expected, "remote");
            assert_eq!(actual, "local");
        }
        other => panic!("expected wrong variant, got {:?}", other),
    }
}

#[test]
fn test_decode_fails_only_on_syntax_or_tag_type() {
    assert!("{\"type\":".parse::<ConfigMcp>().is_err());
    assert!(r#"{"type":["local"]}"#.parse::<ConfigMcp>().is_err());

    let untagged: ConfigMcp = r#"{"command":["x"]}"#.parse().unwrap();
    assert_eq!(untagged.kind().as_str(), "");
    assert!(untagged.as_local().unwrap_err().is_wrong_variant());

    let null_tag: ConfigMcp = r#"{"type":null}"#.parse().unwrap();
    assert_eq!(null_tag.kind(), &ConfigMcpType::default());
}

#[test]
fn test_accessors_are_repeatable() {
    let part: Part = r#"{"type":"tool","callID":"c","tool":"read","state":{"status":"pending"}}"#
        .parse()
        .unwrap();
    let first = part.as_tool().unwrap();
    let second = part.as_tool().unwrap();
    assert_eq!(first.call_id, second.call_id);
    assert_eq!(first.state.kind(), &ToolStatus::Pending);
    assert_eq!(first.state.raw_json(), second.state.raw_json());
}

#[test]
fn test_nested_unions_in_message_event() {
    let raw = r#"{"type":"message.updated","properties":{"info":{"id":"msg_1","sessionID":"s",
        "role":"user","time":{"created":1}}}}"#;
    let event: Event = raw.parse().unwrap();
    let info: Message = event.as_message_updated().unwrap().properties.info;
    assert_eq!(info.id(), "msg_1");
    assert_eq!(info.as_user().unwrap().session_id, "s");
}

#[test]
fn test_shape_unions() {
    let pattern: PermissionPattern = r#"["rm *"]"#.parse().unwrap();
    assert_eq!(pattern.shape(), JsonShape::Array);
    assert_eq!(pattern.as_array().unwrap(), vec!["rm *"]);
    assert!(pattern.as_string().unwrap_err().is_wrong_variant());

    let bash = BashPermission::from_value("ask").unwrap();
    assert_eq!(bash.shape(), JsonShape::String);
    assert_eq!(serde_json::to_string(&bash).unwrap(), r#""ask""#);

    let empty = PermissionPattern::default();
    assert_eq!(serde_json::to_string(&empty).unwrap(), "null");
}
