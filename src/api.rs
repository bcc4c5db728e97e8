use crate::ast::{Node, SyntaxNode};
use crate::config::CodecOptions;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::AstJsonError;
use crate::serialization::Value;

/// Converts syntax trees to and from their exported form.
///
/// The exported form is a `Value` tree; the `*_json` and `*_yaml` methods
/// additionally run it through `serde_json` or `serde_yaml`.
#[derive(Debug, Clone, Default)]
pub struct AstCodec {
    options: CodecOptions,
}

impl AstCodec {
    #[must_use]
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Exports a tree as a `Value`.
    ///
    /// # Errors
    /// Returns an `AstJsonError::Encode` if the tree's child traversal is
    /// inconsistent with its kind or the tree is too deep.
    pub fn to_value<N: SyntaxNode>(&self, node: &N) -> Result<Value, AstJsonError> {
        Ok(Encoder::new(&self.options).encode(node)?)
    }

    fn to_text_value<N: SyntaxNode>(&self, node: &N) -> Result<Value, AstJsonError> {
        Ok(Encoder::new(&self.options.for_text()).encode(node)?)
    }

    fn from_text_value(&self, value: Value) -> Result<Node, AstJsonError> {
        Ok(Decoder::new(&self.options.for_text()).decode(value)?)
    }

    /// Exports a tree as JSON text, indented when `pretty` is set.
    ///
    /// Trees nested deeper than [`crate::config::TEXT_MAX_DEPTH`] are refused
    /// here, since `from_json` could not read them back.
    ///
    /// # Errors
    /// Returns an `AstJsonError` if encoding or JSON serialization fails.
    pub fn to_json<N: SyntaxNode>(&self, node: &N) -> Result<String, AstJsonError> {
        let value = self.to_text_value(node)?;
        let text = if self.options.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(text)
    }

    /// Exports a tree as YAML text, with the same depth cap as `to_json`.
    ///
    /// # Errors
    /// Returns an `AstJsonError` if encoding or YAML serialization fails.
    pub fn to_yaml<N: SyntaxNode>(&self, node: &N) -> Result<String, AstJsonError> {
        let value = self.to_text_value(node)?;
        Ok(serde_yaml::to_string(&value)?)
    }

    /// Rebuilds a tree from a `Value`.
    ///
    /// # Errors
    /// Returns an `AstJsonError::Decode` if the value is not a well-formed
    /// exported tree.
    pub fn from_value(&self, value: Value) -> Result<Node, AstJsonError> {
        Ok(Decoder::new(&self.options).decode(value)?)
    }

    /// Rebuilds a tree from JSON text.
    ///
    /// # Errors
    /// Returns an `AstJsonError` if the text is not JSON or does not describe
    /// a well-formed tree.
    pub fn from_json(&self, text: &str) -> Result<Node, AstJsonError> {
        let value: Value = serde_json::from_str(text)?;
        self.from_text_value(value)
    }

    /// Rebuilds a tree from YAML text.
    ///
    /// # Errors
    /// Returns an `AstJsonError` if the text is not YAML or does not describe
    /// a well-formed tree.
    pub fn from_yaml(&self, text: &str) -> Result<Node, AstJsonError> {
        let value: Value = serde_yaml::from_str(text)?;
        self.from_text_value(value)
    }
}

/// Exports `node` with default options.
///
/// # Errors
/// See [`AstCodec::to_value`].
pub fn to_value<N: SyntaxNode>(node: &N) -> Result<Value, AstJsonError> {
    AstCodec::default().to_value(node)
}

/// Exports `node` as compact JSON with default options.
///
/// # Errors
/// See [`AstCodec::to_json`].
pub fn to_json<N: SyntaxNode>(node: &N) -> Result<String, AstJsonError> {
    AstCodec::default().to_json(node)
}

/// # Errors
/// See [`AstCodec::to_yaml`].
pub fn to_yaml<N: SyntaxNode>(node: &N) -> Result<String, AstJsonError> {
    AstCodec::default().to_yaml(node)
}

/// # Errors
/// See [`AstCodec::from_value`].
pub fn from_value(value: Value) -> Result<Node, AstJsonError> {
    AstCodec::default().from_value(value)
}

/// Rebuilds a tree from JSON text with default options.
///
/// # Errors
/// See [`AstCodec::from_json`].
pub fn from_json(text: &str) -> Result<Node, AstJsonError> {
    AstCodec::default().from_json(text)
}

/// # Errors
/// See [`AstCodec::from_yaml`].
pub fn from_yaml(text: &str) -> Result<Node, AstJsonError> {
    AstCodec::default().from_yaml(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{child, Constant, ExprList, FuncCall, ID};

    fn call() -> Node {
        FuncCall {
            name: child(ID {
                name: "printf".to_string(),
                coord: None,
            }),
            args: child(ExprList {
                exprs: vec![
                    Constant {
                        ty: "string".to_string(),
                        value: "\"%d\"".to_string(),
                        coord: None,
                    }
                    .into(),
                    ID {
                        name: "i".to_string(),
                        coord: None,
                    }
                    .into(),
                ],
                coord: None,
            }),
            coord: None,
        }
        .into()
    }

    #[test]
    fn test_json_round_trip() {
        let node = call();
        let json = to_json(&node).unwrap();
        assert_eq!(from_json(&json).unwrap(), node);
    }

    #[test]
    fn test_compact_and_pretty_json() {
        let node = call();
        let compact = to_json(&node).unwrap();
        assert!(!compact.contains('\n'));

        let pretty = AstCodec::new(CodecOptions::default().with_pretty(true))
            .to_json(&node)
            .unwrap();
        assert!(pretty.contains('\n'));

        let a: serde_json::Value = serde_json::from_str(&compact).unwrap();
        let b: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_yaml_round_trip() {
        let node = call();
        let yaml = to_yaml(&node).unwrap();
        assert!(yaml.contains("_nodetype: FuncCall"));
        assert_eq!(from_yaml(&yaml).unwrap(), node);
    }

    #[test]
    fn test_invalid_json_text() {
        let result = from_json("{ \"_nodetype\": ");
        assert!(matches!(result, Err(AstJsonError::Json(_))));
    }
}
