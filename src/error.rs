use miette::Diagnostic;
use thiserror::Error;

use crate::ast::NodeKind;

#[derive(Error, Debug, Diagnostic)]
pub enum AstJsonError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Decode(#[from] DecodeError),

    #[error("JSON codec error: {0}")]
    #[diagnostic(code(codec::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML codec error: {0}")]
    #[diagnostic(code(codec::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

/// A kind's attribute description does not partition cleanly into scalar and
/// child attributes. Always a defect in the node table, never bad input.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("Attribute `{attribute}` of `{kind}` is neither a scalar nor a child")]
    #[diagnostic(
        code(taxonomy::unclassified_attribute),
        help("Every declared attribute must be listed as a scalar or described as a child slot.")
    )]
    Unclassified {
        kind: &'static str,
        attribute: &'static str,
    },

    #[error("Attribute `{attribute}` of `{kind}` is misdeclared: {reason}")]
    #[diagnostic(code(taxonomy::misdeclared_attribute))]
    Misdeclared {
        kind: &'static str,
        attribute: &'static str,
        reason: &'static str,
    },
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum EncodeError {
    #[error("List `{attribute}` of `{kind}` out of order: expected index {expected}, got {found}")]
    #[diagnostic(
        code(encode::tree_order),
        help("List children must be visited in ascending positional order starting at 0.")
    )]
    TreeOrder {
        kind: NodeKind,
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Unexpected child `{attribute}` on `{kind}`: {reason}")]
    #[diagnostic(code(encode::unexpected_child))]
    UnexpectedChild {
        kind: NodeKind,
        attribute: String,
        reason: &'static str,
    },

    #[error("Tree nested deeper than {limit} levels at `{kind}`")]
    #[diagnostic(
        code(encode::tree_too_deep),
        help("Raise `max_depth` in the codec options if such trees are expected.")
    )]
    TreeTooDeep { kind: NodeKind, limit: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Taxonomy(#[from] TaxonomyError),
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Unknown node kind `{kind}`")]
    #[diagnostic(
        code(decode::unknown_kind),
        help("The `_nodetype` field must name one of the known C node kinds.")
    )]
    UnknownKind { kind: String },

    #[error("Attribute `{attribute}` of `{kind}` should be {expected}, found {found}")]
    #[diagnostic(code(decode::shape_mismatch))]
    ShapeMismatch {
        kind: String,
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Attribute `{attribute}` of `{kind}` is missing")]
    #[diagnostic(
        code(decode::missing_field),
        help("Exported nodes carry every declared attribute; use null for an absent child.")
    )]
    MissingField { kind: String, attribute: String },

    #[error("Expected a node object, found {found}")]
    #[diagnostic(code(decode::not_a_node))]
    NotANode { found: &'static str },

    #[error("Invalid location on `{kind}`")]
    #[diagnostic(code(decode::invalid_coord))]
    InvalidCoord {
        kind: NodeKind,
        #[source]
        error: CoordParseError,
    },

    #[error("Tree nested deeper than {limit} levels at `{kind}`")]
    #[diagnostic(
        code(decode::tree_too_deep),
        help("Raise `max_depth` in the codec options if such trees are expected.")
    )]
    TreeTooDeep { kind: NodeKind, limit: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Taxonomy(#[from] TaxonomyError),
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[error("`{value}` is not a location of the form <file>:<line>[:<column>]")]
#[diagnostic(code(coord::invalid))]
pub struct CoordParseError {
    pub value: String,
}
