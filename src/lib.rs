pub mod api;
pub mod ast;
pub mod config;
pub mod coord;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod serialization;
pub mod taxonomy;

pub use api::{from_json, from_value, from_yaml, to_json, to_value, to_yaml, AstCodec};
pub use ast::{Node, NodeKind, SyntaxNode};
pub use config::CodecOptions;
pub use coord::Coord;
pub use serialization::Value;
