//! `Value` to tree conversion.
//!
//! Depth is measured as in the encoder, so anything the encoder accepts under
//! a given `max_depth` decodes under the same limit.

use std::collections::{BTreeMap, HashMap};

use crate::ast::{ChildSlot, Node, NodeKind, ScalarAttr};
use crate::config::CodecOptions;
use crate::coord::Coord;
use crate::error::DecodeError;
use crate::serialization::{Value, COORD_KEY, NODETYPE_KEY};
use crate::taxonomy::Taxonomy;

const UNKNOWN_KIND: &str = "<unknown>";

/// A child attribute after decoding, before it is moved into its slot.
#[derive(Debug)]
pub enum DecodedChild {
    Single(Option<Box<Node>>),
    List(Vec<Node>),
}

/// Attribute values gathered for one node, keyed by exported name.
#[derive(Debug)]
pub struct Fields {
    kind: NodeKind,
    scalars: HashMap<&'static str, Value>,
    children: HashMap<&'static str, DecodedChild>,
    coord: Option<Coord>,
}

impl Fields {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            scalars: HashMap::new(),
            children: HashMap::new(),
            coord: None,
        }
    }

    pub(crate) fn kind(&self) -> NodeKind {
        self.kind
    }

    pub(crate) fn scalar<T: ScalarAttr>(&mut self, name: &'static str) -> Result<T, DecodeError> {
        let value = self.scalars.remove(name).ok_or_else(|| self.missing(name))?;
        let found = value.type_name();
        T::from_value(value).ok_or_else(|| DecodeError::ShapeMismatch {
            kind: self.kind.to_string(),
            attribute: name.to_string(),
            expected: T::EXPECTED,
            found,
        })
    }

    pub(crate) fn child<T: ChildSlot>(&mut self, name: &'static str) -> Result<T, DecodeError> {
        let child = self.children.remove(name).ok_or_else(|| self.missing(name))?;
        let found = match child {
            DecodedChild::Single(_) => "a single node",
            DecodedChild::List(_) => "a list of nodes",
        };
        T::from_decoded(child).ok_or_else(|| DecodeError::ShapeMismatch {
            kind: self.kind.to_string(),
            attribute: name.to_string(),
            expected: if T::IS_LIST { "an array" } else { "an object or null" },
            found,
        })
    }

    pub(crate) fn take_coord(&mut self) -> Option<Coord> {
        self.coord.take()
    }

    fn missing(&self, name: &str) -> DecodeError {
        DecodeError::MissingField {
            kind: self.kind.to_string(),
            attribute: name.to_string(),
        }
    }
}

pub struct Decoder<'a> {
    options: &'a CodecOptions,
    taxonomy: &'a Taxonomy,
}

impl<'a> Decoder<'a> {
    pub fn new(options: &'a CodecOptions) -> Self {
        Self::with_taxonomy(options, Taxonomy::global())
    }

    pub fn with_taxonomy(options: &'a CodecOptions, taxonomy: &'a Taxonomy) -> Self {
        Self { options, taxonomy }
    }

    pub fn decode(&self, value: Value) -> Result<Node, DecodeError> {
        match value {
            Value::Object(map) => self.decode_node(map, 1),
            other => Err(DecodeError::NotANode {
                found: other.type_name(),
            }),
        }
    }

    fn decode_node(&self, mut map: BTreeMap<String, Value>, depth: usize) -> Result<Node, DecodeError> {
        let kind = match map.remove(NODETYPE_KEY) {
            Some(Value::String(name)) => name.parse::<NodeKind>()?,
            Some(other) => {
                return Err(DecodeError::ShapeMismatch {
                    kind: UNKNOWN_KIND.to_string(),
                    attribute: NODETYPE_KEY.to_string(),
                    expected: "a string",
                    found: other.type_name(),
                })
            }
            None => {
                return Err(DecodeError::MissingField {
                    kind: UNKNOWN_KIND.to_string(),
                    attribute: NODETYPE_KEY.to_string(),
                })
            }
        };
        if depth > self.options.max_depth {
            return Err(DecodeError::TreeTooDeep {
                kind,
                limit: self.options.max_depth,
            });
        }
        log::trace!("decoding {kind} at depth {depth}");

        let entry = self.taxonomy.attributes_of(kind)?;
        let mut fields = Fields::new(kind);

        for name in entry.scalars() {
            let value = map.remove(*name).ok_or_else(|| fields.missing(name))?;
            fields.scalars.insert(*name, value);
        }

        let has_arrays = entry.children().iter().any(|c| c.list)
            || fields.scalars.values().any(|v| matches!(v, Value::Array(_)));
        if has_arrays && depth + 1 > self.options.max_depth {
            return Err(DecodeError::TreeTooDeep {
                kind,
                limit: self.options.max_depth,
            });
        }

        for child in entry.children() {
            let value = map.remove(child.name).ok_or_else(|| fields.missing(child.name))?;
            let decoded = if child.list {
                DecodedChild::List(self.decode_list(kind, child.name, value, depth)?)
            } else {
                DecodedChild::Single(self.decode_single(kind, child.name, value, depth)?)
            };
            fields.children.insert(child.name, decoded);
        }

        fields.coord = match map.remove(COORD_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(
                text.parse::<Coord>()
                    .map_err(|error| DecodeError::InvalidCoord { kind, error })?,
            ),
            Some(other) => {
                return Err(DecodeError::ShapeMismatch {
                    kind: kind.to_string(),
                    attribute: COORD_KEY.to_string(),
                    expected: "a string or null",
                    found: other.type_name(),
                })
            }
        };

        for key in map.keys() {
            log::debug!("ignoring undeclared attribute `{key}` on {kind}");
        }

        Node::assemble(fields)
    }

    fn decode_single(
        &self,
        kind: NodeKind,
        name: &str,
        value: Value,
        depth: usize,
    ) -> Result<Option<Box<Node>>, DecodeError> {
        match value {
            Value::Null => Ok(None),
            Value::Object(map) => Ok(Some(Box::new(self.decode_node(map, depth + 1)?))),
            other => Err(shape_mismatch(kind, name, "an object or null", &other)),
        }
    }

    /// A list child must be an array of node objects. `null` is the one
    /// exception and reads as an empty list: exports written before list slots
    /// were always emitted as arrays used `null` for lists with no elements
    /// (`param_decls`, `block_items`), and those files must still load. Every
    /// other non-array value is a shape mismatch.
    fn decode_list(
        &self,
        kind: NodeKind,
        name: &str,
        value: Value,
        depth: usize,
    ) -> Result<Vec<Node>, DecodeError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Null => return Ok(Vec::new()),
            other => return Err(shape_mismatch(kind, name, "an array", &other)),
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => self.decode_node(map, depth + 2),
                other => Err(shape_mismatch(kind, name, "an array of objects", &other)),
            })
            .collect()
    }
}

fn shape_mismatch(kind: NodeKind, name: &str, expected: &'static str, found: &Value) -> DecodeError {
    DecodeError::ShapeMismatch {
        kind: kind.to_string(),
        attribute: name.to_string(),
        expected,
        found: found.type_name(),
    }
}
