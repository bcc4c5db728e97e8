//! Tree to `Value` conversion.
//!
//! Every node becomes an object holding `_nodetype`, its scalar attributes and
//! one key per declared child attribute. Absent single children are written as
//! `null`, list children always as arrays, so all nodes of a kind share the
//! same key set.
//!
//! Depth counts nesting in the exported form: a node object sits one level
//! below its parent object, or two below it when reached through a list, and
//! a node's own arrays sit one level below the node.

use std::collections::BTreeMap;

use crate::ast::{ChildName, SyntaxNode};
use crate::config::CodecOptions;
use crate::error::EncodeError;
use crate::serialization::{Value, COORD_KEY, NODETYPE_KEY};
use crate::taxonomy::Taxonomy;

pub struct Encoder<'a> {
    options: &'a CodecOptions,
    taxonomy: &'a Taxonomy,
}

impl<'a> Encoder<'a> {
    pub fn new(options: &'a CodecOptions) -> Self {
        Self::with_taxonomy(options, Taxonomy::global())
    }

    pub fn with_taxonomy(options: &'a CodecOptions, taxonomy: &'a Taxonomy) -> Self {
        Self { options, taxonomy }
    }

    pub fn encode<N: SyntaxNode>(&self, node: &N) -> Result<Value, EncodeError> {
        self.encode_node(node, 1)
    }

    fn encode_node<N: SyntaxNode>(&self, node: &N, depth: usize) -> Result<Value, EncodeError> {
        let kind = node.kind();
        if depth > self.options.max_depth {
            return Err(EncodeError::TreeTooDeep {
                kind,
                limit: self.options.max_depth,
            });
        }
        log::trace!("encoding {kind} at depth {depth}");

        let entry = self.taxonomy.attributes_of(kind)?;
        let mut result = BTreeMap::new();

        result.insert(NODETYPE_KEY.to_string(), Value::from(kind.as_str()));

        for (name, value) in node.scalars() {
            result.insert(name.to_string(), value);
        }

        let has_arrays = entry.children().iter().any(|c| c.list)
            || result.values().any(|v| matches!(v, Value::Array(_)));
        if has_arrays && depth + 1 > self.options.max_depth {
            return Err(EncodeError::TreeTooDeep {
                kind,
                limit: self.options.max_depth,
            });
        }

        if self.options.keep_coord {
            let coord = node
                .coord()
                .map_or(Value::Null, |c| Value::String(c.to_string()));
            result.insert(COORD_KEY.to_string(), coord);
        }

        let mut lists: BTreeMap<&'static str, Vec<Value>> = BTreeMap::new();
        for (child_name, child) in node.children() {
            let name = child_name.base();
            let declared = entry.child(name).ok_or_else(|| EncodeError::UnexpectedChild {
                kind,
                attribute: child_name.to_string(),
                reason: "not a child attribute of this kind",
            })?;

            match child_name {
                ChildName::Indexed(_, index) => {
                    if !declared.list {
                        return Err(EncodeError::UnexpectedChild {
                            kind,
                            attribute: child_name.to_string(),
                            reason: "indexed child in a single-child slot",
                        });
                    }
                    // Elements arrive in order; anything else would reorder or
                    // truncate the exported array.
                    let items = lists.entry(name).or_default();
                    if index != items.len() {
                        return Err(EncodeError::TreeOrder {
                            kind,
                            attribute: name,
                            expected: items.len(),
                            found: index,
                        });
                    }
                    items.push(self.encode_node(child, depth + 2)?);
                }
                ChildName::Single(_) => {
                    if declared.list {
                        return Err(EncodeError::UnexpectedChild {
                            kind,
                            attribute: child_name.to_string(),
                            reason: "unindexed child in a list slot",
                        });
                    }
                    if result.contains_key(name) {
                        return Err(EncodeError::UnexpectedChild {
                            kind,
                            attribute: child_name.to_string(),
                            reason: "visited more than once",
                        });
                    }
                    result.insert(name.to_string(), self.encode_node(child, depth + 1)?);
                }
            }
        }

        for child in entry.children() {
            let value = if child.list {
                Value::Array(lists.remove(child.name).unwrap_or_default())
            } else {
                result.remove(child.name).unwrap_or(Value::Null)
            };
            result.insert(child.name.to_string(), value);
        }

        Ok(Value::Object(result))
    }
}
