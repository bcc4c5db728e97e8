use std::fmt::{self, Display};
use std::str::FromStr;

use crate::coord::Coord;
use crate::decoder::{DecodedChild, Fields};
use crate::error::DecodeError;
use crate::serialization::Value;
use crate::taxonomy::{ChildAttr, KindDescription};

/// A single, optional child slot.
pub type Child = Option<Box<Node>>;
/// An ordered list-child slot.
pub type Children = Vec<Node>;

/// Name under which a child is reached while walking a node.
///
/// List elements carry their position; it never leaks into exported keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildName {
    Single(&'static str),
    Indexed(&'static str, usize),
}

impl ChildName {
    /// The attribute name without any index.
    #[must_use]
    pub fn base(&self) -> &'static str {
        match *self {
            ChildName::Single(name) | ChildName::Indexed(name, _) => name,
        }
    }
}

impl Display for ChildName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildName::Single(name) => write!(f, "{name}"),
            ChildName::Indexed(name, index) => write!(f, "{name}[{index}]"),
        }
    }
}

/// What the encoder needs to know about a tree node.
///
/// `children` yields every populated child slot: single children under their
/// attribute name, list elements as `ChildName::Indexed` in positional order.
pub trait SyntaxNode {
    fn kind(&self) -> NodeKind;
    fn coord(&self) -> Option<&Coord>;
    fn scalars(&self) -> Vec<(&'static str, Value)>;
    fn children(&self) -> Vec<(ChildName, &Self)>;
}

/// Leaf data stored on a node: strings, booleans, lists of strings.
pub trait ScalarAttr: Sized {
    /// Shape name reported when decoding fails.
    const EXPECTED: &'static str;

    fn to_value(&self) -> Value;

    /// `Null` maps to the type's empty value. `None` means a shape mismatch.
    fn from_value(value: Value) -> Option<Self>;
}

impl ScalarAttr for String {
    const EXPECTED: &'static str = "a string";

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            Value::Null => Some(String::new()),
            _ => None,
        }
    }
}

impl ScalarAttr for Option<String> {
    const EXPECTED: &'static str = "a string or null";

    fn to_value(&self) -> Value {
        self.as_ref()
            .map_or(Value::Null, |s| Value::String(s.clone()))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Some(s)),
            Value::Null => Some(None),
            _ => None,
        }
    }
}

impl ScalarAttr for Vec<String> {
    const EXPECTED: &'static str = "an array of strings";

    fn to_value(&self) -> Value {
        Value::Array(self.iter().cloned().map(Value::String).collect())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            Value::Null => Some(Vec::new()),
            _ => None,
        }
    }
}

impl ScalarAttr for bool {
    const EXPECTED: &'static str = "a boolean";

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(b),
            Value::Null => Some(false),
            _ => None,
        }
    }
}

/// A child slot: either `Child` or `Children`.
pub trait ChildSlot: Sized {
    const IS_LIST: bool;

    fn walk<'a>(&'a self, name: &'static str, out: &mut Vec<(ChildName, &'a Node)>);

    /// `None` when the decoded shape does not fit the slot.
    fn from_decoded(child: DecodedChild) -> Option<Self>;
}

impl ChildSlot for Child {
    const IS_LIST: bool = false;

    fn walk<'a>(&'a self, name: &'static str, out: &mut Vec<(ChildName, &'a Node)>) {
        if let Some(node) = self {
            out.push((ChildName::Single(name), &**node));
        }
    }

    fn from_decoded(child: DecodedChild) -> Option<Self> {
        match child {
            DecodedChild::Single(node) => Some(node),
            DecodedChild::List(_) => None,
        }
    }
}

impl ChildSlot for Children {
    const IS_LIST: bool = true;

    fn walk<'a>(&'a self, name: &'static str, out: &mut Vec<(ChildName, &'a Node)>) {
        out.extend(
            self.iter()
                .enumerate()
                .map(|(index, node)| (ChildName::Indexed(name, index), node)),
        );
    }

    fn from_decoded(child: DecodedChild) -> Option<Self> {
        match child {
            DecodedChild::List(nodes) => Some(nodes),
            DecodedChild::Single(_) => None,
        }
    }
}

/// Declares the closed set of node kinds.
///
/// Each entry lists scalar attributes then child slots as
/// `field: "exported name" => Type;`. From it come the per-kind structs, the
/// `Node` sum type, the `NodeKind` tag and each kind's `KindDescription`.
macro_rules! c_ast {
    ($(
        $(#[$doc:meta])*
        $kind:ident {
            attrs { $($sfield:ident: $skey:literal => $sty:ty;)* }
            children { $($cfield:ident: $ckey:literal => $cty:ty;)* }
        }
    )*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $($kind,)*
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind,)*];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind),)*
                }
            }

            /// The static attribute table for this kind.
            #[must_use]
            pub fn description(self) -> &'static KindDescription {
                match self {
                    $(NodeKind::$kind => {
                        static DESCRIPTION: KindDescription = $kind::DESCRIPTION;
                        &DESCRIPTION
                    })*
                }
            }
        }

        impl FromStr for NodeKind {
            type Err = DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($kind) => Ok(NodeKind::$kind),)*
                    other => Err(DecodeError::UnknownKind {
                        kind: other.to_string(),
                    }),
                }
            }
        }

        $(
            $(#[$doc])*
            #[derive(Debug, Clone, PartialEq, Default)]
            pub struct $kind {
                $(pub $sfield: $sty,)*
                $(pub $cfield: $cty,)*
                pub coord: Option<Coord>,
            }

            impl $kind {
                pub const DESCRIPTION: KindDescription = KindDescription {
                    kind: NodeKind::$kind,
                    attributes: &[$($skey,)* $($ckey,)*],
                    scalars: &[$($skey,)*],
                    children: &[$(ChildAttr {
                        name: $ckey,
                        list: <$cty as ChildSlot>::IS_LIST,
                    },)*],
                };
            }

            impl From<$kind> for Node {
                fn from(node: $kind) -> Self {
                    Node::$kind(node)
                }
            }
        )*

        /// A node of the C syntax tree.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Node {
            $($kind($kind),)*
        }

        impl Node {
            #[must_use]
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(Node::$kind(_) => NodeKind::$kind,)*
                }
            }

            #[must_use]
            pub fn coord(&self) -> Option<&Coord> {
                match self {
                    $(Node::$kind(node) => node.coord.as_ref(),)*
                }
            }

            pub fn set_coord(&mut self, coord: Option<Coord>) {
                match self {
                    $(Node::$kind(node) => node.coord = coord,)*
                }
            }

            #[allow(unused_variables)]
            fn scalar_values(&self) -> Vec<(&'static str, Value)> {
                match self {
                    $(Node::$kind(node) => vec![$(($skey, node.$sfield.to_value()),)*],)*
                }
            }

            #[allow(unused_variables)]
            fn child_nodes(&self) -> Vec<(ChildName, &Node)> {
                let mut out = Vec::new();
                match self {
                    $(Node::$kind(node) => {
                        $(node.$cfield.walk($ckey, &mut out);)*
                    })*
                }
                out
            }

            /// Builds the concrete node once the decoder has collected its fields.
            pub(crate) fn assemble(mut fields: Fields) -> Result<Node, DecodeError> {
                Ok(match fields.kind() {
                    $(NodeKind::$kind => Node::$kind($kind {
                        $($sfield: fields.scalar($skey)?,)*
                        $($cfield: fields.child($ckey)?,)*
                        coord: fields.take_coord(),
                    }),)*
                })
            }
        }
    };
}

c_ast! {
    ArrayDecl {
        attrs { dim_quals: "dim_quals" => Vec<String>; }
        children { ty: "type" => Child; dim: "dim" => Child; }
    }
    ArrayRef {
        attrs {}
        children { name: "name" => Child; subscript: "subscript" => Child; }
    }
    Assignment {
        attrs { op: "op" => String; }
        children { lvalue: "lvalue" => Child; rvalue: "rvalue" => Child; }
    }
    BinaryOp {
        attrs { op: "op" => String; }
        children { left: "left" => Child; right: "right" => Child; }
    }
    Break {
        attrs {}
        children {}
    }
    Case {
        attrs {}
        children { expr: "expr" => Child; stmts: "stmts" => Children; }
    }
    Cast {
        attrs {}
        children { to_type: "to_type" => Child; expr: "expr" => Child; }
    }
    /// A `{ ... }` block.
    Compound {
        attrs {}
        children { block_items: "block_items" => Children; }
    }
    CompoundLiteral {
        attrs {}
        children { ty: "type" => Child; init: "init" => Child; }
    }
    /// A literal; `ty` is the C type name (`int`, `char`, `string`, ...).
    Constant {
        attrs { ty: "type" => String; value: "value" => String; }
        children {}
    }
    Continue {
        attrs {}
        children {}
    }
    /// Any declaration: variables, parameters, functions, struct members.
    Decl {
        attrs {
            name: "name" => Option<String>;
            quals: "quals" => Vec<String>;
            storage: "storage" => Vec<String>;
            funcspec: "funcspec" => Vec<String>;
        }
        children { ty: "type" => Child; init: "init" => Child; bitsize: "bitsize" => Child; }
    }
    DeclList {
        attrs {}
        children { decls: "decls" => Children; }
    }
    Default {
        attrs {}
        children { stmts: "stmts" => Children; }
    }
    DoWhile {
        attrs {}
        children { cond: "cond" => Child; stmt: "stmt" => Child; }
    }
    EllipsisParam {
        attrs {}
        children {}
    }
    EmptyStatement {
        attrs {}
        children {}
    }
    Enum {
        attrs { name: "name" => Option<String>; }
        children { values: "values" => Child; }
    }
    Enumerator {
        attrs { name: "name" => String; }
        children { value: "value" => Child; }
    }
    EnumeratorList {
        attrs {}
        children { enumerators: "enumerators" => Children; }
    }
    ExprList {
        attrs {}
        children { exprs: "exprs" => Children; }
    }
    /// Root of a translation unit.
    FileAST {
        attrs {}
        children { ext: "ext" => Children; }
    }
    For {
        attrs {}
        children {
            init: "init" => Child;
            cond: "cond" => Child;
            next: "next" => Child;
            stmt: "stmt" => Child;
        }
    }
    FuncCall {
        attrs {}
        children { name: "name" => Child; args: "args" => Child; }
    }
    FuncDecl {
        attrs {}
        children { args: "args" => Child; ty: "type" => Child; }
    }
    /// A function definition. `param_decls` holds K&R style declarations.
    FuncDef {
        attrs {}
        children { decl: "decl" => Child; param_decls: "param_decls" => Children; body: "body" => Child; }
    }
    Goto {
        attrs { name: "name" => String; }
        children {}
    }
    ID {
        attrs { name: "name" => String; }
        children {}
    }
    /// Builtin type specifiers, e.g. `["unsigned", "int"]`.
    IdentifierType {
        attrs { names: "names" => Vec<String>; }
        children {}
    }
    If {
        attrs {}
        children { cond: "cond" => Child; iftrue: "iftrue" => Child; iffalse: "iffalse" => Child; }
    }
    InitList {
        attrs {}
        children { exprs: "exprs" => Children; }
    }
    Label {
        attrs { name: "name" => String; }
        children { stmt: "stmt" => Child; }
    }
    /// Designated initializer; `name` is the designator chain.
    NamedInitializer {
        attrs {}
        children { name: "name" => Children; expr: "expr" => Child; }
    }
    ParamList {
        attrs {}
        children { params: "params" => Children; }
    }
    Pragma {
        attrs { string: "string" => String; }
        children {}
    }
    PtrDecl {
        attrs { quals: "quals" => Vec<String>; }
        children { ty: "type" => Child; }
    }
    Return {
        attrs {}
        children { expr: "expr" => Child; }
    }
    StaticAssert {
        attrs {}
        children { cond: "cond" => Child; message: "message" => Child; }
    }
    Struct {
        attrs { name: "name" => Option<String>; }
        children { decls: "decls" => Children; }
    }
    /// Member access; `ty` is `.` or `->`.
    StructRef {
        attrs { ty: "type" => String; }
        children { name: "name" => Child; field: "field" => Child; }
    }
    Switch {
        attrs {}
        children { cond: "cond" => Child; stmt: "stmt" => Child; }
    }
    TernaryOp {
        attrs {}
        children { cond: "cond" => Child; iftrue: "iftrue" => Child; iffalse: "iffalse" => Child; }
    }
    TypeDecl {
        attrs { declname: "declname" => Option<String>; quals: "quals" => Vec<String>; }
        children { ty: "type" => Child; }
    }
    Typedef {
        attrs {
            name: "name" => Option<String>;
            quals: "quals" => Vec<String>;
            storage: "storage" => Vec<String>;
        }
        children { ty: "type" => Child; }
    }
    Typename {
        attrs { name: "name" => Option<String>; quals: "quals" => Vec<String>; }
        children { ty: "type" => Child; }
    }
    UnaryOp {
        attrs { op: "op" => String; }
        children { expr: "expr" => Child; }
    }
    Union {
        attrs { name: "name" => Option<String>; }
        children { decls: "decls" => Children; }
    }
    While {
        attrs {}
        children { cond: "cond" => Child; stmt: "stmt" => Child; }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SyntaxNode for Node {
    fn kind(&self) -> NodeKind {
        Node::kind(self)
    }

    fn coord(&self) -> Option<&Coord> {
        Node::coord(self)
    }

    fn scalars(&self) -> Vec<(&'static str, Value)> {
        self.scalar_values()
    }

    fn children(&self) -> Vec<(ChildName, &Self)> {
        self.child_nodes()
    }
}

/// Boxes a node for a single-child slot.
pub fn child(node: impl Into<Node>) -> Child {
    Some(Box::new(node.into()))
}
