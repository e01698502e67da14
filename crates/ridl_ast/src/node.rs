//! AST node definitions.
//!
//! Every node shares one struct: a `SyntaxKind` tag, the common attributes
//! (name, position, flags, type, tree links) and a kind-specific `NodeData`
//! payload. Nodes live in an `Arena` owned by the `Ast` and refer to each
//! other by `NodeId`.

use crate::syntax_kind::SyntaxKind;
use crate::types::{ConstExpr, ScopedName, TypeExpr};
use ridl_core::arena::{Arena, Idx};
use ridl_core::text::TextSpan;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Handle to a node in an [`Ast`].
pub type NodeId = Idx<Node>;

bitflags::bitflags! {
    /// Declaration modifiers recorded on a node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u16 {
        const READONLY    = 1 << 0;
        const ABSTRACT    = 1 << 1;
        const LOCAL       = 1 << 2;
        const CUSTOM      = 1 << 3;
        const TRUNCATABLE = 1 << 4;
        const ONEWAY      = 1 << 5;
        const PUBLIC      = 1 << 6;
        const PRIVATE     = 1 << 7;

        /// Flags a header passes on to its owner.
        const HEADER = Self::ABSTRACT.bits()
            | Self::LOCAL.bits()
            | Self::CUSTOM.bits()
            | Self::TRUNCATABLE.bits();
    }
}

impl NodeFlags {
    /// Lower-case names of the individual flags that are set.
    pub fn names(self) -> Vec<String> {
        self.iter_names()
            .filter(|(name, _)| *name != "HEADER")
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect()
    }
}

impl Serialize for NodeFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// Direction of an operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamMode {
    In,
    Out,
    Inout,
}

impl ParamMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamMode::In => "in",
            ParamMode::Out => "out",
            ParamMode::Inout => "inout",
        }
    }
}

impl fmt::Display for ParamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One label of a union case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseLabel {
    Case(ConstExpr),
    Default,
}

impl fmt::Display for CaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseLabel::Case(expr) => write!(f, "case {}", expr),
            CaseLabel::Default => write!(f, "default"),
        }
    }
}

/// Kind-specific node attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "payload", rename_all = "snake_case")]
pub enum NodeData {
    #[default]
    Plain,
    /// Interfaces, value types, their headers and inheritance specs.
    Inheritance {
        inherits: Vec<ScopedName>,
        supports: Vec<ScopedName>,
    },
    Const {
        value: ConstExpr,
    },
    ArrayDeclarator {
        dims: Vec<ConstExpr>,
    },
    UnionMember {
        labels: Vec<CaseLabel>,
    },
    Operation {
        raises: Vec<ScopedName>,
        context: Vec<String>,
    },
    Parameter {
        mode: ParamMode,
    },
}

/// A single AST node.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: SyntaxKind,
    pub name: String,
    /// 1-based line of the token that introduced the node.
    pub line: u32,
    /// 1-based column of the token that introduced the node.
    pub column: u32,
    pub span: TextSpan,
    pub flags: NodeFlags,
    /// Back-reference to the owner; set once when the owner attaches it.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Declared type, shared by a declaration and its declarators. Unset for
    /// nodes that declare no typed entity, including the declarator of a
    /// `Native`.
    pub ty: Option<Arc<TypeExpr>>,
    pub data: NodeData,
}

impl Node {
    pub fn new(kind: SyntaxKind, line: u32, column: u32, span: TextSpan) -> Self {
        Self {
            kind,
            name: String::new(),
            line,
            column,
            span,
            flags: NodeFlags::empty(),
            parent: None,
            children: Vec::new(),
            ty: None,
            data: NodeData::Plain,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_type(mut self, ty: Arc<TypeExpr>) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }

    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Display name of the node's type, if it has one.
    pub fn type_name(&self) -> Option<String> {
        self.ty.as_ref().map(|t| t.to_string())
    }
}

// ============================================================================
// Ast
// ============================================================================

/// A parsed IDL specification.
///
/// The root is always a `Specification` node whose children are the
/// top-level definitions.
#[derive(Debug)]
pub struct Ast {
    nodes: Arena<Node>,
    root: NodeId,
}

impl Ast {
    /// Wrap an arena produced by the parser.
    pub fn from_parts(nodes: Arena<Node>, root: NodeId) -> Self {
        debug_assert_eq!(nodes[root].kind, SyntaxKind::Specification);
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[self.root]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.nodes[id].children.iter().map(move |&c| &self.nodes[c])
    }

    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        self.nodes[id].parent.map(|p| &self.nodes[p])
    }

    /// All nodes reachable from `id`, in pre-order, `id` included.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next].children.iter().rev().copied());
        }
        out
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.live_count()
    }

    /// First node in pre-order with the given kind and name.
    pub fn find(&self, kind: SyntaxKind, name: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&id| self.nodes[id].kind == kind && self.nodes[id].name == name)
    }
}

/// Serializes one node and, recursively, its children.
struct NodeTree<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl Serialize for NodeTree<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.ast.node(self.id);
        let mut s = serializer.serialize_struct("Node", 8)?;
        s.serialize_field("kind", &node.kind)?;
        s.serialize_field("name", &node.name)?;
        s.serialize_field("line", &node.line)?;
        s.serialize_field("column", &node.column)?;
        s.serialize_field("flags", &node.flags)?;
        s.serialize_field("type", &node.ty)?;
        s.serialize_field("data", &node.data)?;
        let children: Vec<NodeTree<'_>> = node
            .children
            .iter()
            .map(|&id| NodeTree { ast: self.ast, id })
            .collect();
        s.serialize_field("children", &children)?;
        s.end()
    }
}

impl Serialize for Ast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeTree {
            ast: self,
            id: self.root,
        }
        .serialize(serializer)
    }
}
