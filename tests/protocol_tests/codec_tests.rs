//! Codec Tests
//!
//! Tests for the JSON command payload format.

use cmdhandler::protocol::{decode_command, encode_command, Action, Command};
use cmdhandler::HandlerError;

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_add_item() {
    let encoded = encode_command(&Command::add("key1", "value1")).unwrap();

    assert_eq!(
        String::from_utf8(encoded).unwrap(),
        r#"{"Action":0,"Key":"key1","Value":"value1"}"#
    );
}

#[test]
fn test_encode_empty_value() {
    let encoded = encode_command(&Command::get("key1")).unwrap();

    assert_eq!(
        String::from_utf8(encoded).unwrap(),
        r#"{"Action":2,"Key":"key1","Value":""}"#
    );
}

#[test]
fn test_encode_unknown_action_keeps_code() {
    let command = Command {
        action: Action::Unknown(42),
        key: String::new(),
        value: String::new(),
    };
    let encoded = encode_command(&command).unwrap();

    assert_eq!(
        String::from_utf8(encoded).unwrap(),
        r#"{"Action":42,"Key":"","Value":""}"#
    );
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_add_item() {
    let command = decode_command(br#"{"Action":0,"Key":"key1","Value":"value1"}"#).unwrap();

    assert_eq!(command, Command::add("key1", "value1"));
}

#[test]
fn test_decode_every_known_action() {
    let cases = [
        (0, Action::AddItem),
        (1, Action::DeleteItem),
        (2, Action::GetItem),
        (3, Action::GetAllItems),
    ];

    for (code, expected) in cases {
        let json = format!(r#"{{"Action":{},"Key":"k"}}"#, code);
        let command = decode_command(json.as_bytes()).unwrap();
        assert_eq!(command.action, expected);
        assert_eq!(command.action.code(), code);
    }
}

#[test]
fn test_decode_missing_key_and_value_default_to_empty() {
    let command = decode_command(br#"{"Action":3}"#).unwrap();

    assert_eq!(command, Command::get_all());
}

#[test]
fn test_decode_unknown_action() {
    let command = decode_command(br#"{"Action":13,"Key":"k","Value":"v"}"#).unwrap();

    assert_eq!(command.action, Action::Unknown(13));
    assert_eq!(command.action.to_string(), "unknownAction: 13");
}

#[test]
fn test_decode_negative_action_is_unknown() {
    let command = decode_command(br#"{"Action":-1}"#).unwrap();

    assert_eq!(command.action, Action::Unknown(-1));
}

#[test]
fn test_decode_missing_action_fails() {
    let result = decode_command(br#"{"Key":"k","Value":"v"}"#);

    assert!(matches!(result, Err(HandlerError::Json(_))));
}

#[test]
fn test_decode_garbage_fails() {
    assert!(matches!(decode_command(b"not json"), Err(HandlerError::Json(_))));
    assert!(matches!(decode_command(b""), Err(HandlerError::Json(_))));
}

#[test]
fn test_decode_string_action_fails() {
    let result = decode_command(br#"{"Action":"addItem","Key":"k"}"#);

    assert!(result.is_err());
}

// =============================================================================
// Action Display Tests
// =============================================================================

#[test]
fn test_action_labels() {
    assert_eq!(Action::AddItem.to_string(), "addItem");
    assert_eq!(Action::DeleteItem.to_string(), "deleteItem");
    assert_eq!(Action::GetItem.to_string(), "getItem");
    assert_eq!(Action::GetAllItems.to_string(), "getAllItems");
    assert_eq!(Action::Unknown(7).to_string(), "unknownAction: 7");
}

#[test]
fn test_action_from_code() {
    assert_eq!(Action::from(1), Action::DeleteItem);
    assert_eq!(Action::from(4), Action::Unknown(4));
    assert_eq!(i64::from(Action::GetAllItems), 3);
}
