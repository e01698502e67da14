//! Tree assembly and construct-specific finalization.
//!
//! The parser calls these as productions return. Each function assumes the
//! node it finalizes is complete: all of its sub-productions have been parsed
//! and attached.

use crate::node::{Node, NodeData, NodeFlags, NodeId};
use crate::syntax_kind::SyntaxKind;
use crate::types::TypeExpr;
use ridl_core::arena::Arena;
use std::sync::Arc;

/// Append `children` to `parent` in order and fix their back-references.
pub fn attach_children(arena: &mut Arena<Node>, parent: NodeId, children: &[NodeId]) {
    for &child in children {
        debug_assert!(arena[child].parent.is_none(), "node attached twice");
        arena[child].parent = Some(parent);
    }
    arena[parent].children.extend_from_slice(children);
}

/// Give every declarator child of `owner` the shared type expression.
///
/// An array declarator gets its own expression carrying its dimensions,
/// unless the shared expression already has dimensions of its own.
pub fn propagate_type(arena: &mut Arena<Node>, owner: NodeId, ty: &Arc<TypeExpr>) {
    let declarators: Vec<NodeId> = arena[owner]
        .children
        .iter()
        .copied()
        .filter(|&c| arena[c].kind.is_declarator())
        .collect();

    for id in declarators {
        let node = &mut arena[id];
        debug_assert!(node.ty.is_none(), "declarator typed twice");
        node.ty = Some(match &node.data {
            NodeData::ArrayDeclarator { dims } if !ty.is_array() => {
                Arc::new(ty.with_dims(dims.clone()))
            }
            _ => Arc::clone(ty),
        });
    }
}

/// Fold a header node into its owning interface or value declaration.
///
/// The owner takes the header's name, position, modifier flags and
/// inheritance lists. The header leaves the owner's child list and the
/// arena; its own children move to the front of the owner's children.
pub fn hoist_header(arena: &mut Arena<Node>, owner: NodeId) {
    let header_id = arena[owner]
        .children
        .iter()
        .copied()
        .find(|&c| matches!(arena[c].kind, SyntaxKind::InterfaceHeader | SyntaxKind::ValueHeader));
    debug_assert!(header_id.is_some(), "owner has no header");
    let Some((header_id, header)) =
        header_id.and_then(|id| arena.release(id).map(|header| (id, header)))
    else {
        return;
    };

    for &child in &header.children {
        debug_assert_eq!(arena[child].parent, Some(header_id));
        arena[child].parent = Some(owner);
    }

    let node = &mut arena[owner];
    node.name = header.name;
    node.line = header.line;
    node.column = header.column;
    node.flags |= header.flags & NodeFlags::HEADER;
    node.data = header.data;
    node.span = node.span.union(&header.span);
    let body: Vec<NodeId> = node.children.drain(..).filter(|&c| c != header_id).collect();
    node.children = header.children;
    node.children.extend(body);
}

/// Replace a multi-name attribute declaration by one `Attribute` per name.
///
/// `attr` must carry the type and read-only flag, with its simple
/// declarators as children. Returns the new sibling nodes in source order;
/// the caller attaches them. `attr` and its declarators are released.
pub fn flatten_attribute(arena: &mut Arena<Node>, attr: NodeId) -> Vec<NodeId> {
    let Some(template) = arena.release(attr) else {
        return Vec::new();
    };
    debug_assert_eq!(template.kind, SyntaxKind::Attribute);
    debug_assert!(template.ty.is_some(), "attribute without type");

    let mut flattened = Vec::with_capacity(template.children.len());
    for declarator in template.children {
        let Some(decl) = arena.release(declarator) else {
            continue;
        };
        let mut node = Node::new(SyntaxKind::Attribute, decl.line, decl.column, decl.span)
            .with_name(decl.name)
            .with_flags(template.flags);
        node.ty = template.ty.clone();
        flattened.push(arena.alloc(node));
    }
    flattened
}

/// Name a union member after its trailing declarator.
pub fn name_union_member(arena: &mut Arena<Node>, member: NodeId) {
    let name = arena[member]
        .children
        .iter()
        .rev()
        .find(|&&c| arena[c].kind.is_declarator())
        .map(|&c| arena[c].name.clone());
    debug_assert!(name.is_some(), "union member without declarator");
    if let Some(name) = name {
        arena[member].name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConstExpr, Literal, ScopedName, TypeKind};
    use ridl_core::text::TextSpan;

    fn node(arena: &mut Arena<Node>, kind: SyntaxKind, name: &str) -> NodeId {
        arena.alloc(Node::new(kind, 1, 1, TextSpan::default()).with_name(name))
    }

    fn dim(n: &str) -> ConstExpr {
        ConstExpr::Literal(Literal::new(SyntaxKind::DecimalLiteral, n, n))
    }

    #[test]
    fn test_attach_sets_parent() {
        let mut arena = Arena::new();
        let s = node(&mut arena, SyntaxKind::StructType, "S");
        let m = node(&mut arena, SyntaxKind::Member, "");
        attach_children(&mut arena, s, &[m]);
        assert_eq!(arena[m].parent, Some(s));
        assert_eq!(arena[s].children, vec![m]);
    }

    #[test]
    fn test_propagate_shares_type() {
        let mut arena = Arena::new();
        let member = node(&mut arena, SyntaxKind::Member, "");
        let a = node(&mut arena, SyntaxKind::SimpleDeclarator, "a");
        let b = node(&mut arena, SyntaxKind::SimpleDeclarator, "b");
        let c = arena.alloc(
            Node::new(SyntaxKind::ArrayDeclarator, 1, 1, TextSpan::default())
                .with_name("c")
                .with_data(NodeData::ArrayDeclarator { dims: vec![dim("4")] }),
        );
        attach_children(&mut arena, member, &[a, b, c]);
        let ty = Arc::new(TypeExpr::primitive(TypeKind::Long));
        propagate_type(&mut arena, member, &ty);

        let ta = arena[a].ty.clone().expect("typed");
        let tb = arena[b].ty.clone().expect("typed");
        assert!(Arc::ptr_eq(&ta, &tb));
        assert!(Arc::ptr_eq(&ta, &ty));
        assert_eq!(arena[c].type_name().as_deref(), Some("long[4]"));
    }

    #[test]
    fn test_hoist_header() {
        let mut arena = Arena::new();
        let owner = node(&mut arena, SyntaxKind::Value, "");
        let header = arena.alloc(
            Node::new(SyntaxKind::ValueHeader, 3, 5, TextSpan::new(10, 20))
                .with_name("V")
                .with_flags(NodeFlags::CUSTOM)
                .with_data(NodeData::Inheritance {
                    inherits: vec![ScopedName::simple("Base")],
                    supports: vec![],
                }),
        );
        let spec = node(&mut arena, SyntaxKind::ValueInheritanceSpec, "");
        attach_children(&mut arena, header, &[spec]);
        let body = node(&mut arena, SyntaxKind::StateMember, "");
        attach_children(&mut arena, owner, &[header, body]);

        hoist_header(&mut arena, owner);

        let v = &arena[owner];
        assert_eq!(v.name, "V");
        assert_eq!((v.line, v.column), (3, 5));
        assert!(v.has_flag(NodeFlags::CUSTOM));
        assert_eq!(v.children, vec![spec, body]);
        assert!(matches!(&v.data, NodeData::Inheritance { inherits, .. } if inherits.len() == 1));
        assert_eq!(arena[spec].parent, Some(owner));
        assert!(arena.get(header).is_none());
    }

    #[test]
    fn test_flatten_attribute() {
        let mut arena = Arena::new();
        let attr = arena.alloc(
            Node::new(SyntaxKind::Attribute, 1, 1, TextSpan::default())
                .with_flags(NodeFlags::READONLY)
                .with_type(Arc::new(TypeExpr::primitive(TypeKind::Short))),
        );
        let x = node(&mut arena, SyntaxKind::SimpleDeclarator, "x");
        let y = node(&mut arena, SyntaxKind::SimpleDeclarator, "y");
        attach_children(&mut arena, attr, &[x, y]);

        let flat = flatten_attribute(&mut arena, attr);
        assert_eq!(flat.len(), 2);
        assert_eq!(arena[flat[0]].name, "x");
        assert_eq!(arena[flat[1]].name, "y");
        for id in &flat {
            assert!(arena[*id].has_flag(NodeFlags::READONLY));
            assert_eq!(arena[*id].type_name().as_deref(), Some("short"));
        }
        assert!(arena.get(attr).is_none());
        assert!(arena.get(x).is_none());
    }

    #[test]
    fn test_name_union_member() {
        let mut arena = Arena::new();
        let member = node(&mut arena, SyntaxKind::UnionMember, "");
        let d = node(&mut arena, SyntaxKind::SimpleDeclarator, "value");
        attach_children(&mut arena, member, &[d]);
        name_union_member(&mut arena, member);
        assert_eq!(arena[member].name, "value");
    }
}
