//! AST visitor trait for traversing the syntax tree.
//!
//! Provides an `AstVisitor` trait whose default methods walk into children.

use crate::node::{Ast, NodeId};
use crate::syntax_kind::SyntaxKind;

/// A visitor over an [`Ast`]. Override the methods for the node kinds of
/// interest; the defaults recurse into children.
pub trait AstVisitor {
    fn visit_node(&mut self, ast: &Ast, id: NodeId) {
        match ast.node(id).kind {
            SyntaxKind::Module => self.visit_module(ast, id),
            SyntaxKind::Interface | SyntaxKind::ForwardDecl => self.visit_interface(ast, id),
            SyntaxKind::Value
            | SyntaxKind::ValueAbsDecl
            | SyntaxKind::ValueBoxDecl
            | SyntaxKind::ValueForwardDecl => self.visit_value(ast, id),
            SyntaxKind::TypeDef
            | SyntaxKind::StructType
            | SyntaxKind::UnionType
            | SyntaxKind::EnumType
            | SyntaxKind::Native => self.visit_type_declaration(ast, id),
            SyntaxKind::Const => self.visit_const(ast, id),
            SyntaxKind::Exception => self.visit_exception(ast, id),
            SyntaxKind::Attribute => self.visit_attribute(ast, id),
            SyntaxKind::Operation => self.visit_operation(ast, id),
            SyntaxKind::SimpleDeclarator | SyntaxKind::ArrayDeclarator => {
                self.visit_declarator(ast, id)
            }
            _ => walk_children(self, ast, id),
        }
    }

    fn visit_module(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_interface(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_value(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_type_declaration(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_const(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_exception(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_attribute(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_operation(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_declarator(&mut self, _ast: &Ast, _id: NodeId) {}
}

/// Visit every child of `id` in order.
pub fn walk_children<V: AstVisitor + ?Sized>(visitor: &mut V, ast: &Ast, id: NodeId) {
    for &child in &ast.node(id).children {
        visitor.visit_node(ast, child);
    }
}

/// Visit the whole tree, starting at the Specification root.
pub fn walk<V: AstVisitor + ?Sized>(visitor: &mut V, ast: &Ast) {
    visitor.visit_node(ast, ast.root());
}
