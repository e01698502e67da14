//! Indented text outline of a tree, one node per line.
//!
//! ```text
//! Specification
//!   Interface Foo inherits(Base)
//!     Operation op: long raises(Oops)
//! ```

use crate::node::{Ast, Node, NodeData, NodeId};
use crate::types::ScopedName;
use crate::visitor::{walk_children, AstVisitor};
use std::fmt::Write;

/// Render the whole tree.
pub fn dump_tree(ast: &Ast) -> String {
    let mut printer = TreePrinter::default();
    printer.visit_node(ast, ast.root());
    printer.out
}

/// Render a single node without its children.
pub fn describe_node(node: &Node) -> String {
    let mut line = format!("{:?}", node.kind);
    if !node.name.is_empty() {
        line.push(' ');
        line.push_str(&node.name);
    }
    if let Some(ty) = &node.ty {
        let _ = write!(line, ": {}", ty);
    }
    let flags = node.flags.names();
    if !flags.is_empty() {
        let _ = write!(line, " [{}]", flags.join(" "));
    }
    match &node.data {
        NodeData::Plain | NodeData::ArrayDeclarator { .. } => {}
        NodeData::Inheritance { inherits, supports } => {
            if !inherits.is_empty() {
                let _ = write!(line, " inherits({})", join_names(inherits));
            }
            if !supports.is_empty() {
                let _ = write!(line, " supports({})", join_names(supports));
            }
        }
        NodeData::Const { value } => {
            let _ = write!(line, " = {}", value);
        }
        NodeData::UnionMember { labels } => {
            let labels: Vec<String> = labels.iter().map(ToString::to_string).collect();
            let _ = write!(line, " labels({})", labels.join(", "));
        }
        NodeData::Operation { raises, context } => {
            if !raises.is_empty() {
                let _ = write!(line, " raises({})", join_names(raises));
            }
            if !context.is_empty() {
                let quoted: Vec<String> = context.iter().map(|c| format!("{:?}", c)).collect();
                let _ = write!(line, " context({})", quoted.join(", "));
            }
        }
        NodeData::Parameter { mode } => {
            let _ = write!(line, " mode({})", mode);
        }
    }
    line
}

fn join_names(names: &[ScopedName]) -> String {
    names.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[derive(Default)]
struct TreePrinter {
    out: String,
    depth: usize,
}

impl AstVisitor for TreePrinter {
    fn visit_node(&mut self, ast: &Ast, id: NodeId) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(&describe_node(ast.node(id)));
        self.out.push('\n');
        self.depth += 1;
        walk_children(self, ast, id);
        self.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finalize::attach_children;
    use crate::node::{NodeFlags, ParamMode};
    use crate::syntax_kind::SyntaxKind;
    use crate::types::{TypeExpr, TypeKind};
    use ridl_core::arena::Arena;
    use ridl_core::text::TextSpan;
    use std::sync::Arc;

    #[test]
    fn test_dump_outline() {
        let mut arena = Arena::new();
        let span = TextSpan::default();
        let root = arena.alloc(Node::new(SyntaxKind::Specification, 1, 1, span));
        let iface = arena.alloc(
            Node::new(SyntaxKind::Interface, 1, 1, span)
                .with_name("Foo")
                .with_data(NodeData::Inheritance {
                    inherits: vec![ScopedName::simple("Base")],
                    supports: vec![],
                }),
        );
        let op = arena.alloc(
            Node::new(SyntaxKind::Operation, 1, 1, span)
                .with_name("ping")
                .with_flags(NodeFlags::ONEWAY)
                .with_type(Arc::new(TypeExpr::primitive(TypeKind::Void)))
                .with_data(NodeData::Operation {
                    raises: vec![],
                    context: vec!["ctx".into()],
                }),
        );
        let param = arena.alloc(
            Node::new(SyntaxKind::Parameter, 1, 1, span)
                .with_name("n")
                .with_type(Arc::new(TypeExpr::primitive(TypeKind::Long)))
                .with_data(NodeData::Parameter { mode: ParamMode::In }),
        );
        attach_children(&mut arena, root, &[iface]);
        attach_children(&mut arena, iface, &[op]);
        attach_children(&mut arena, op, &[param]);
        let ast = Ast::from_parts(arena, root);

        let expected = "\
Specification
  Interface Foo inherits(Base)
    Operation ping: void [oneway] context(\"ctx\")
      Parameter n: long mode(in)
";
        assert_eq!(dump_tree(&ast), expected);
    }
}
