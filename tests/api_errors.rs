// API error path tests
// These test error surfacing, conversions and diagnostics in the API layer

use c_ast_json::ast::{child, BinaryOp, Compound, Node, ID};
use c_ast_json::config::TEXT_MAX_DEPTH;
use c_ast_json::error::{AstJsonError, DecodeError, EncodeError};
use c_ast_json::{from_json, from_value, from_yaml, to_json, to_yaml, AstCodec, CodecOptions, Value};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

fn deep_json(levels: usize) -> String {
    let mut json = r#"{"_nodetype": "Break"}"#.to_string();
    for _ in 0..levels {
        json = format!(r#"{{"_nodetype": "Return", "expr": {json}}}"#);
    }
    json
}

fn id(name: &str) -> Node {
    ID {
        name: name.to_string(),
        coord: None,
    }
    .into()
}

/// `a + a + ... + a` as a left-leaning chain `levels` nodes deep.
fn sum_chain(levels: usize) -> Node {
    let mut node = id("a");
    for _ in 1..levels {
        node = BinaryOp {
            op: "+".to_string(),
            left: child(node),
            right: child(id("a")),
            coord: None,
        }
        .into();
    }
    node
}

/// Blocks nested `levels` deep; each one adds an object and an array.
fn nested_blocks(levels: usize) -> Node {
    let mut node: Node = Compound {
        block_items: vec![],
        coord: None,
    }
    .into();
    for _ in 1..levels {
        node = Compound {
            block_items: vec![node],
            coord: None,
        }
        .into();
    }
    node
}

#[test]
fn test_api_invalid_json_text() {
    let result = from_json("{ \"_nodetype\": \"ID\", ");
    assert!(matches!(result, Err(AstJsonError::Json(_))));
}

#[test]
fn test_api_invalid_yaml_text() {
    let result = from_yaml("_nodetype: [unterminated");
    assert!(matches!(result, Err(AstJsonError::Yaml(_))));
}

#[test]
fn test_api_root_is_not_a_node() {
    let result = from_json("[1, 2, 3]");
    assert!(matches!(
        result,
        Err(AstJsonError::Decode(DecodeError::NotANode { found: "array" }))
    ));
}

#[test]
fn test_api_nodetype_must_be_string() {
    let result = from_json(r#"{ "_nodetype": 7 }"#);
    if let Err(AstJsonError::Decode(DecodeError::ShapeMismatch { attribute, .. })) = result {
        assert_eq!(attribute, "_nodetype");
    } else {
        panic!("Expected a shape mismatch on _nodetype");
    }
}

#[test]
fn test_api_extra_keys_are_ignored() {
    let result = from_json(r#"{ "_nodetype": "ID", "name": "x", "comment": "tooling" }"#);
    assert!(result.is_ok());
}

#[test]
fn test_api_decode_depth_limit() {
    let codec = AstCodec::new(CodecOptions::default().with_max_depth(8));
    assert!(codec.from_json(&deep_json(7)).is_ok());

    let err = codec.from_json(&deep_json(8)).unwrap_err();
    assert!(matches!(
        err,
        AstJsonError::Decode(DecodeError::TreeTooDeep { limit: 8, .. })
    ));
}

#[test]
fn test_api_encode_depth_limit() {
    let tree = from_json(&deep_json(20)).unwrap();
    let codec = AstCodec::new(CodecOptions::default().with_max_depth(10));

    let err = codec.to_json(&tree).unwrap_err();
    assert!(matches!(
        err,
        AstJsonError::Encode(EncodeError::TreeTooDeep { limit: 10, .. })
    ));
}

#[test]
fn test_api_diagnostic_codes() {
    let err = from_json(r#"{ "_nodetype": "Lambda" }"#).unwrap_err();
    let code = err.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("decode::unknown_kind"));
    assert!(err.help().is_some());

    let err = from_value(Value::Null).unwrap_err();
    let code = err.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("decode::not_a_node"));
}

#[test]
fn test_api_error_display() {
    let err = from_json(r#"{ "_nodetype": "BinaryOp", "op": "+", "left": null }"#).unwrap_err();
    assert_eq!(err.to_string(), "Attribute `right` of `BinaryOp` is missing");

    let err = from_json(r#"{ "_nodetype": "Compound", "block_items": {} }"#).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Attribute `block_items` of `Compound` should be an array, found object"
    );
}

#[test]
fn test_api_report_renders() {
    let err = from_json(r#"{ "_nodetype": "Return", "coord": "nowhere", "expr": null }"#)
        .unwrap_err();
    let mut rendered = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .render_report(&mut rendered, &err)
        .unwrap();
    assert!(rendered.contains("Invalid location on `Return`"));
    assert!(rendered.contains("decode::invalid_coord"));
}

#[test]
fn test_api_deepest_text_tree_round_trips() {
    let tree = sum_chain(TEXT_MAX_DEPTH);

    let json = to_json(&tree).unwrap();
    assert_eq!(from_json(&json).unwrap(), tree);

    let yaml = to_yaml(&tree).unwrap();
    assert_eq!(from_yaml(&yaml).unwrap(), tree);
}

#[test]
fn test_api_text_refuses_what_it_cannot_read_back() {
    let tree = sum_chain(200);
    assert!(matches!(
        to_json(&tree),
        Err(AstJsonError::Encode(EncodeError::TreeTooDeep { limit, .. })) if limit == TEXT_MAX_DEPTH
    ));
    assert!(matches!(
        to_yaml(&tree),
        Err(AstJsonError::Encode(EncodeError::TreeTooDeep { .. }))
    ));

    // The value model is not bound by the text codecs.
    let codec = AstCodec::default();
    let value = codec.to_value(&tree).unwrap();
    assert_eq!(codec.from_value(value).unwrap(), tree);
}

#[test]
fn test_api_text_cap_ignores_larger_max_depth() {
    let codec = AstCodec::new(CodecOptions::default().with_max_depth(1000));
    let err = codec.to_json(&sum_chain(TEXT_MAX_DEPTH + 1)).unwrap_err();
    assert!(matches!(
        err,
        AstJsonError::Encode(EncodeError::TreeTooDeep { limit, .. }) if limit == TEXT_MAX_DEPTH
    ));
}

#[test]
fn test_api_list_nesting_counts_toward_text_depth() {
    // 63 blocks reach 126 levels, 64 blocks would need 128.
    let tree = nested_blocks(63);
    let json = to_json(&tree).unwrap();
    assert_eq!(from_json(&json).unwrap(), tree);

    assert!(matches!(
        to_json(&nested_blocks(64)),
        Err(AstJsonError::Encode(EncodeError::TreeTooDeep { .. }))
    ));
}
