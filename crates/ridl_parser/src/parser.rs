//! Recursive descent parser for IDL.
//!
//! Each grammar production is one `parse_*` method. Productions that the
//! grammar cannot tell apart from the next token (interfaces and their
//! forward declarations, the four value type forms, array and simple
//! declarators) are resolved by speculating: the parser saves its cursor and
//! arena length, tries one reading, and rewinds. Speculation never commits;
//! once a reading is chosen it is parsed again for real.
//!
//! On failure nothing is recovered. The reported error is the furthest point
//! any reading reached, see [`ErrorReporter`].

use crate::buffer::TokenBuffer;
use crate::error::ParseError;
use crate::options::ParserOptions;
use crate::precedence::{get_binary_operator_precedence, OperatorPrecedence, BINARY_OPERATORS};
use crate::reporter::{make_error, ErrorReporter};
use crate::utilities::{self, BASE_TYPE_START, CONST_TYPE_START, DEFINITION_START, PARAM_MODES,
    PRIMARY_EXPRESSION_START, SWITCH_TYPE_START, UNARY_OPERATORS, VALUE_ELEMENT_EXTRA};
use ridl_ast::finalize;
use ridl_ast::node::{Ast, CaseLabel, Node, NodeData, NodeFlags, NodeId, ParamMode};
use ridl_ast::syntax_kind::SyntaxKind;
use ridl_ast::types::{ConstExpr, Literal, ScopedName, TypeExpr, TypeKind};
use ridl_core::arena::Arena;
use ridl_core::text::TextSpan;
use ridl_scanner::{CharSource, Scanner, Token};
use std::sync::Arc;
use tracing::{debug, trace};

/// Why a production gave up.
#[derive(Debug)]
enum Fail {
    /// A token check failed; the reporter holds the details.
    Mismatch,
    /// The nesting limit was reached at this token. Speculation does not
    /// catch it.
    TooDeep(Token),
}

type PResult<T> = Result<T, Fail>;

/// Parser state saved before speculating.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    cursor: usize,
    arena_len: usize,
}

/// A parsed type specifier and the inline struct, union or enum that
/// declared it, if any.
struct TypeSpec {
    ty: Arc<TypeExpr>,
    decl: Option<NodeId>,
}

impl TypeSpec {
    fn simple(ty: Arc<TypeExpr>) -> Self {
        Self { ty, decl: None }
    }
}

fn node_at(kind: SyntaxKind, token: &Token) -> Node {
    Node::new(kind, token.line, token.column, TextSpan::empty(token.span.start))
}

fn empty_inheritance() -> NodeData {
    NodeData::Inheritance {
        inherits: Vec::new(),
        supports: Vec::new(),
    }
}

/// The IDL parser.
pub struct Parser {
    tokens: TokenBuffer,
    nodes: Arena<Node>,
    reporter: ErrorReporter,
    options: ParserOptions,
    depth: usize,
}

impl Parser {
    pub fn new(text: &str) -> Self {
        Self::with_options(text, ParserOptions::default())
    }

    pub fn with_options(text: &str, options: ParserOptions) -> Self {
        Self::from_scanner(Scanner::new(text), options)
    }

    pub fn from_source(source: CharSource, options: ParserOptions) -> Self {
        Self::from_scanner(Scanner::from_source(source), options)
    }

    fn from_scanner(scanner: Scanner, options: ParserOptions) -> Self {
        Self {
            tokens: TokenBuffer::new(scanner),
            nodes: Arena::new(),
            reporter: ErrorReporter::new(),
            options,
            depth: 0,
        }
    }

    /// Parse a complete specification.
    pub fn parse_unit(mut self) -> Result<Ast, ParseError> {
        debug!(max_depth = self.options.max_depth, "parsing specification");
        match self.parse_specification() {
            Ok(root) => {
                let ast = Ast::from_parts(self.nodes, root);
                debug!(nodes = ast.node_count(), "parsed specification");
                Ok(ast)
            }
            Err(fail) => {
                let error = self.into_error(fail);
                debug!(%error, "parse failed");
                Err(error)
            }
        }
    }

    fn into_error(mut self, fail: Fail) -> ParseError {
        if let Some(error) = self.tokens.take_lex_error() {
            return ParseError::Lexical(error);
        }
        match fail {
            Fail::TooDeep(token) => ParseError::NestingTooDeep {
                limit: self.options.max_depth,
                span: token.span,
                position: token.position(),
            },
            Fail::Mismatch => {
                let pos = self.reporter.furthest().unwrap_or_else(|| self.tokens.cursor());
                let token = self.tokens.token_at(pos).clone();
                make_error(token, self.reporter.expected())
            }
        }
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    #[inline]
    fn current_token(&mut self) -> SyntaxKind {
        self.tokens.current_kind()
    }

    #[inline]
    fn next_token(&mut self) -> Token {
        self.tokens.advance()
    }

    fn peek_token(&mut self) -> Token {
        self.tokens.current().clone()
    }

    /// Check the current token without consuming it. A failed check is
    /// recorded for error reporting.
    fn is_token(&mut self, kind: SyntaxKind) -> bool {
        if self.current_token() == kind {
            true
        } else {
            self.reporter.note(self.tokens.cursor(), kind);
            false
        }
    }

    fn expect_token(&mut self, kind: SyntaxKind) -> PResult<Token> {
        if self.is_token(kind) {
            Ok(self.next_token())
        } else {
            Err(Fail::Mismatch)
        }
    }

    fn optional_token(&mut self, kind: SyntaxKind) -> Option<Token> {
        if self.is_token(kind) {
            Some(self.next_token())
        } else {
            None
        }
    }

    fn expect_identifier(&mut self) -> PResult<Token> {
        self.expect_token(SyntaxKind::Identifier)
    }

    /// Fail at the current token, which matched none of `kinds`.
    fn expected<T>(&mut self, kinds: &[SyntaxKind]) -> PResult<T> {
        self.reporter.note_all(self.tokens.cursor(), kinds);
        Err(Fail::Mismatch)
    }

    // ========================================================================
    // Node helpers
    // ========================================================================

    fn alloc_node(&mut self, node: Node) -> NodeId {
        self.nodes.alloc(node)
    }

    /// Attach `children` and extend the node's span to the last consumed token.
    fn finish_node(&mut self, id: NodeId, children: &[NodeId]) -> NodeId {
        let end = self.tokens.previous_end();
        let node = &mut self.nodes[id];
        node.span = TextSpan::from_bounds(node.span.start, end);
        finalize::attach_children(&mut self.nodes, id, children);
        id
    }

    /// Finish a declaration made of a type specifier and declarators: the
    /// inline type declaration comes first, then the declarators, each of
    /// which receives the type.
    fn finish_typed(&mut self, owner: NodeId, spec: TypeSpec, declarators: Vec<NodeId>) -> NodeId {
        let mut children: Vec<NodeId> = spec.decl.into_iter().collect();
        children.extend(declarators);
        self.finish_node(owner, &children);
        finalize::propagate_type(&mut self.nodes, owner, &spec.ty);
        owner
    }

    // ========================================================================
    // Speculation
    // ========================================================================

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            cursor: self.tokens.cursor(),
            arena_len: self.nodes.len(),
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        self.tokens.reset(checkpoint.cursor);
        self.nodes.truncate(checkpoint.arena_len);
    }

    /// Run `f` and report whether it succeeded. The parser state is restored
    /// either way.
    fn look_ahead<T>(&mut self, what: &'static str, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<bool> {
        let checkpoint = self.checkpoint();
        let result = f(self);
        self.rewind(checkpoint);
        match result {
            Ok(_) => {
                trace!(what, cursor = checkpoint.cursor, "speculation matched");
                Ok(true)
            }
            Err(Fail::Mismatch) => {
                trace!(what, cursor = checkpoint.cursor, "speculation failed");
                Ok(false)
            }
            Err(fail) => Err(fail),
        }
    }

    /// Run `f`, keeping its result on success and rewinding on failure.
    fn try_parse<T>(&mut self, what: &'static str, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<Option<T>> {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(value) => Ok(Some(value)),
            Err(Fail::Mismatch) => {
                trace!(what, cursor = checkpoint.cursor, "speculation failed");
                self.rewind(checkpoint);
                Ok(None)
            }
            Err(fail) => Err(fail),
        }
    }

    /// Run a production that opens a new nesting level.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.options.max_depth {
            let token = self.peek_token();
            debug!(depth = self.depth, line = token.line, column = token.column, "nesting limit reached");
            return Err(Fail::TooDeep(token));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ========================================================================
    // Definitions
    // ========================================================================

    fn parse_specification(&mut self) -> PResult<NodeId> {
        let root = self.alloc_node(Node::new(SyntaxKind::Specification, 1, 1, TextSpan::empty(0)));
        let mut definitions = Vec::new();
        loop {
            definitions.push(self.parse_definition()?);
            if self.is_token(SyntaxKind::EndOfFileToken) {
                break;
            }
        }
        finalize::attach_children(&mut self.nodes, root, &definitions);
        self.nodes[root].span = TextSpan::new(0, self.tokens.text_len());
        Ok(root)
    }

    fn parse_definition(&mut self) -> PResult<NodeId> {
        let node = match self.current_token() {
            SyntaxKind::TypedefKeyword
            | SyntaxKind::StructKeyword
            | SyntaxKind::UnionKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::NativeKeyword => self.parse_type_declaration()?,
            SyntaxKind::ConstKeyword => self.parse_const_declaration()?,
            SyntaxKind::ExceptionKeyword => self.parse_exception()?,
            SyntaxKind::ModuleKeyword => self.parse_module()?,
            SyntaxKind::InterfaceKeyword | SyntaxKind::LocalKeyword => self.parse_interface()?,
            SyntaxKind::AbstractKeyword if self.tokens.peek_kind(1) == SyntaxKind::InterfaceKeyword => {
                self.parse_interface()?
            }
            SyntaxKind::AbstractKeyword | SyntaxKind::CustomKeyword | SyntaxKind::ValuetypeKeyword => {
                self.parse_value()?
            }
            _ => return self.definition_expected(),
        };
        self.expect_token(SyntaxKind::SemicolonToken)?;
        Ok(node)
    }

    /// Fail at a token that cannot start a definition.
    ///
    /// Input such as `long x` reads like a member declaration placed where
    /// only definitions may appear. That reading is tried first so that,
    /// when it breaks down further on, the error points there.
    fn definition_expected<T>(&mut self) -> PResult<T> {
        if utilities::can_start_type_spec(self.current_token()) {
            let saved = self.reporter.clone();
            let complete = self.look_ahead("member declaration", |p| {
                p.parse_type_spec()?;
                p.parse_declarators()?;
                p.expect_token(SyntaxKind::SemicolonToken)
            })?;
            if complete {
                self.reporter = saved;
            }
        }
        self.expected(DEFINITION_START)
    }

    fn parse_module(&mut self) -> PResult<NodeId> {
        self.nested(|p| {
            let keyword = p.expect_token(SyntaxKind::ModuleKeyword)?;
            let name = p.expect_identifier()?;
            let module = p.alloc_node(node_at(SyntaxKind::Module, &keyword).with_name(name.text));
            p.expect_token(SyntaxKind::OpenBraceToken)?;
            let mut definitions = Vec::new();
            loop {
                definitions.push(p.parse_definition()?);
                if p.is_token(SyntaxKind::CloseBraceToken) {
                    break;
                }
            }
            p.expect_token(SyntaxKind::CloseBraceToken)?;
            Ok(p.finish_node(module, &definitions))
        })
    }

    // ========================================================================
    // Interfaces
    // ========================================================================

    fn parse_interface(&mut self) -> PResult<NodeId> {
        let has_body = self.look_ahead("interface body", |p| {
            p.parse_interface_header()?;
            p.expect_token(SyntaxKind::OpenBraceToken)
        })?;
        if has_body {
            self.parse_interface_declaration()
        } else {
            self.parse_forward_declaration()
        }
    }

    fn parse_interface_modifier(&mut self) -> NodeFlags {
        if self.optional_token(SyntaxKind::AbstractKeyword).is_some() {
            NodeFlags::ABSTRACT
        } else if self.optional_token(SyntaxKind::LocalKeyword).is_some() {
            NodeFlags::LOCAL
        } else {
            NodeFlags::empty()
        }
    }

    fn parse_interface_header(&mut self) -> PResult<NodeId> {
        let first = self.peek_token();
        let flags = self.parse_interface_modifier();
        self.expect_token(SyntaxKind::InterfaceKeyword)?;
        let name = self.expect_identifier()?;
        let inherits = if self.optional_token(SyntaxKind::ColonToken).is_some() {
            self.parse_scoped_name_list()?
        } else {
            Vec::new()
        };
        let header = self.alloc_node(
            node_at(SyntaxKind::InterfaceHeader, &first)
                .with_name(name.text)
                .with_flags(flags)
                .with_data(NodeData::Inheritance {
                    inherits,
                    supports: Vec::new(),
                }),
        );
        Ok(self.finish_node(header, &[]))
    }

    fn parse_interface_declaration(&mut self) -> PResult<NodeId> {
        self.nested(|p| {
            let first = p.peek_token();
            let interface = p.alloc_node(node_at(SyntaxKind::Interface, &first));
            let header = p.parse_interface_header()?;
            p.expect_token(SyntaxKind::OpenBraceToken)?;
            let mut children = vec![header];
            while !p.is_token(SyntaxKind::CloseBraceToken) {
                children.extend(p.parse_export()?);
            }
            p.expect_token(SyntaxKind::CloseBraceToken)?;
            p.finish_node(interface, &children);
            finalize::hoist_header(&mut p.nodes, interface);
            Ok(interface)
        })
    }

    fn parse_forward_declaration(&mut self) -> PResult<NodeId> {
        let first = self.peek_token();
        let flags = self.parse_interface_modifier();
        self.expect_token(SyntaxKind::InterfaceKeyword)?;
        let name = self.expect_identifier()?;
        let forward = self.alloc_node(
            node_at(SyntaxKind::ForwardDecl, &first)
                .with_name(name.text)
                .with_flags(flags),
        );
        Ok(self.finish_node(forward, &[]))
    }

    /// An element of an interface body. Attribute declarations naming
    /// several attributes yield one node per name.
    fn parse_export(&mut self) -> PResult<Vec<NodeId>> {
        let nodes = match self.current_token() {
            SyntaxKind::TypedefKeyword
            | SyntaxKind::StructKeyword
            | SyntaxKind::UnionKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::NativeKeyword => vec![self.parse_type_declaration()?],
            SyntaxKind::ConstKeyword => vec![self.parse_const_declaration()?],
            SyntaxKind::ExceptionKeyword => vec![self.parse_exception()?],
            SyntaxKind::ReadonlyKeyword | SyntaxKind::AttributeKeyword => self.parse_attribute()?,
            kind if kind == SyntaxKind::OnewayKeyword || utilities::can_start_op_type_spec(kind) => {
                vec![self.parse_operation()?]
            }
            _ => return self.expected(&utilities::export_start()),
        };
        self.expect_token(SyntaxKind::SemicolonToken)?;
        Ok(nodes)
    }

    fn parse_attribute(&mut self) -> PResult<Vec<NodeId>> {
        let first = self.peek_token();
        let flags = if self.optional_token(SyntaxKind::ReadonlyKeyword).is_some() {
            NodeFlags::READONLY
        } else {
            NodeFlags::empty()
        };
        self.expect_token(SyntaxKind::AttributeKeyword)?;
        let ty = self.parse_param_type_spec()?;
        let mut declarators = vec![self.parse_simple_declarator()?];
        while self.optional_token(SyntaxKind::CommaToken).is_some() {
            declarators.push(self.parse_simple_declarator()?);
        }
        let attribute = self.alloc_node(
            node_at(SyntaxKind::Attribute, &first)
                .with_flags(flags)
                .with_type(ty),
        );
        self.finish_node(attribute, &declarators);
        Ok(finalize::flatten_attribute(&mut self.nodes, attribute))
    }

    fn parse_operation(&mut self) -> PResult<NodeId> {
        let first = self.peek_token();
        let flags = if self.optional_token(SyntaxKind::OnewayKeyword).is_some() {
            NodeFlags::ONEWAY
        } else {
            NodeFlags::empty()
        };
        let return_type = if self.optional_token(SyntaxKind::VoidKeyword).is_some() {
            Arc::new(TypeExpr::primitive(TypeKind::Void))
        } else {
            self.parse_param_type_spec()?
        };
        let name = self.expect_identifier()?;

        self.expect_token(SyntaxKind::OpenParenToken)?;
        let mut parameters = Vec::new();
        if !self.is_token(SyntaxKind::CloseParenToken) {
            loop {
                parameters.push(self.parse_parameter()?);
                if self.optional_token(SyntaxKind::CommaToken).is_none() {
                    break;
                }
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken)?;

        let raises = if self.optional_token(SyntaxKind::RaisesKeyword).is_some() {
            self.expect_token(SyntaxKind::OpenParenToken)?;
            let names = self.parse_scoped_name_list()?;
            self.expect_token(SyntaxKind::CloseParenToken)?;
            names
        } else {
            Vec::new()
        };

        let context = if self.optional_token(SyntaxKind::ContextKeyword).is_some() {
            self.expect_token(SyntaxKind::OpenParenToken)?;
            let mut strings = vec![self.parse_string_literal()?.value];
            while self.optional_token(SyntaxKind::CommaToken).is_some() {
                strings.push(self.parse_string_literal()?.value);
            }
            self.expect_token(SyntaxKind::CloseParenToken)?;
            strings
        } else {
            Vec::new()
        };

        let operation = self.alloc_node(
            node_at(SyntaxKind::Operation, &first)
                .with_name(name.text)
                .with_flags(flags)
                .with_type(return_type)
                .with_data(NodeData::Operation { raises, context }),
        );
        Ok(self.finish_node(operation, &parameters))
    }

    fn parse_parameter(&mut self) -> PResult<NodeId> {
        let mode = match self.current_token() {
            SyntaxKind::InKeyword => ParamMode::In,
            SyntaxKind::OutKeyword => ParamMode::Out,
            SyntaxKind::InoutKeyword => ParamMode::Inout,
            _ => return self.expected(PARAM_MODES),
        };
        let keyword = self.next_token();
        self.parse_parameter_rest(keyword, mode)
    }

    fn parse_parameter_rest(&mut self, keyword: Token, mode: ParamMode) -> PResult<NodeId> {
        let ty = self.parse_param_type_spec()?;
        let name = self.expect_identifier()?;
        let parameter = self.alloc_node(
            node_at(SyntaxKind::Parameter, &keyword)
                .with_name(name.text)
                .with_type(ty)
                .with_data(NodeData::Parameter { mode }),
        );
        Ok(self.finish_node(parameter, &[]))
    }

    // ========================================================================
    // Value types
    // ========================================================================

    /// Decide between the four value type forms, longest reading first.
    fn parse_value(&mut self) -> PResult<NodeId> {
        let is_full = self.look_ahead("value body", |p| {
            p.parse_value_header()?;
            p.expect_token(SyntaxKind::OpenBraceToken)
        })?;
        if is_full {
            return self.parse_value_declaration();
        }

        let is_abstract = self.look_ahead("abstract value body", |p| {
            p.expect_token(SyntaxKind::AbstractKeyword)?;
            p.expect_token(SyntaxKind::ValuetypeKeyword)?;
            p.expect_identifier()?;
            p.parse_value_inheritance_spec()?;
            p.expect_token(SyntaxKind::OpenBraceToken)
        })?;
        if is_abstract {
            return self.parse_abstract_value();
        }

        if let Some(boxed) = self.try_parse("value box", Self::parse_value_box)? {
            return Ok(boxed);
        }
        self.parse_value_forward_declaration()
    }

    /// Flags and inheritance lists an owner takes over from its
    /// inheritance spec.
    fn inheritance_of(&self, spec: Option<NodeId>) -> (NodeFlags, NodeData) {
        match spec {
            Some(id) => {
                let node = &self.nodes[id];
                (node.flags, node.data.clone())
            }
            None => (NodeFlags::empty(), empty_inheritance()),
        }
    }

    fn parse_value_inheritance_spec(&mut self) -> PResult<Option<NodeId>> {
        let first = self.peek_token();
        let mut flags = NodeFlags::empty();
        let mut inherits = Vec::new();
        if self.optional_token(SyntaxKind::ColonToken).is_some() {
            if self.optional_token(SyntaxKind::TruncatableKeyword).is_some() {
                flags |= NodeFlags::TRUNCATABLE;
            }
            inherits = self.parse_scoped_name_list()?;
        }
        let supports = if self.optional_token(SyntaxKind::SupportsKeyword).is_some() {
            self.parse_scoped_name_list()?
        } else {
            Vec::new()
        };
        if inherits.is_empty() && supports.is_empty() {
            return Ok(None);
        }
        let spec = self.alloc_node(
            node_at(SyntaxKind::ValueInheritanceSpec, &first)
                .with_flags(flags)
                .with_data(NodeData::Inheritance { inherits, supports }),
        );
        Ok(Some(self.finish_node(spec, &[])))
    }

    fn parse_value_header(&mut self) -> PResult<NodeId> {
        let first = self.peek_token();
        let flags = if self.optional_token(SyntaxKind::CustomKeyword).is_some() {
            NodeFlags::CUSTOM
        } else {
            NodeFlags::empty()
        };
        self.expect_token(SyntaxKind::ValuetypeKeyword)?;
        let name = self.expect_identifier()?;
        let spec = self.parse_value_inheritance_spec()?;
        let (spec_flags, data) = self.inheritance_of(spec);
        let header = self.alloc_node(
            node_at(SyntaxKind::ValueHeader, &first)
                .with_name(name.text)
                .with_flags(flags | spec_flags)
                .with_data(data),
        );
        let children: Vec<NodeId> = spec.into_iter().collect();
        Ok(self.finish_node(header, &children))
    }

    fn parse_value_declaration(&mut self) -> PResult<NodeId> {
        self.nested(|p| {
            let first = p.peek_token();
            let value = p.alloc_node(node_at(SyntaxKind::Value, &first));
            let header = p.parse_value_header()?;
            p.expect_token(SyntaxKind::OpenBraceToken)?;
            let mut children = vec![header];
            while !p.is_token(SyntaxKind::CloseBraceToken) {
                children.extend(p.parse_value_element()?);
            }
            p.expect_token(SyntaxKind::CloseBraceToken)?;
            p.finish_node(value, &children);
            finalize::hoist_header(&mut p.nodes, value);
            Ok(value)
        })
    }

    /// An element of a value body. A leading type specifier starts either an
    /// operation or a state member without visibility; the member reading is
    /// tried first.
    fn parse_value_element(&mut self) -> PResult<Vec<NodeId>> {
        match self.current_token() {
            SyntaxKind::PublicKeyword | SyntaxKind::PrivateKeyword => Ok(vec![self.parse_state_member()?]),
            SyntaxKind::FactoryKeyword => Ok(vec![self.parse_init_declaration()?]),
            kind if utilities::can_start_simple_type_spec(kind) => {
                let is_member = self.look_ahead("state member", |p| {
                    p.parse_type_spec()?;
                    p.parse_declarators()?;
                    p.expect_token(SyntaxKind::SemicolonToken)
                })?;
                if is_member {
                    Ok(vec![self.parse_state_member()?])
                } else {
                    self.parse_export()
                }
            }
            kind if utilities::can_start_export(kind) => self.parse_export(),
            _ => {
                let mut kinds = utilities::export_start();
                kinds.extend_from_slice(VALUE_ELEMENT_EXTRA);
                self.expected(&kinds)
            }
        }
    }

    fn parse_state_member(&mut self) -> PResult<NodeId> {
        let first = self.peek_token();
        let flags = if self.optional_token(SyntaxKind::PublicKeyword).is_some() {
            NodeFlags::PUBLIC
        } else if self.optional_token(SyntaxKind::PrivateKeyword).is_some() {
            NodeFlags::PRIVATE
        } else {
            NodeFlags::empty()
        };
        let spec = self.parse_type_spec()?;
        let declarators = self.parse_declarators()?;
        self.expect_token(SyntaxKind::SemicolonToken)?;
        let member = self.alloc_node(
            node_at(SyntaxKind::StateMember, &first)
                .with_flags(flags)
                .with_type(Arc::clone(&spec.ty)),
        );
        Ok(self.finish_typed(member, spec, declarators))
    }

    fn parse_init_declaration(&mut self) -> PResult<NodeId> {
        let keyword = self.expect_token(SyntaxKind::FactoryKeyword)?;
        let name = self.expect_identifier()?;
        self.expect_token(SyntaxKind::OpenParenToken)?;
        let mut parameters = Vec::new();
        if !self.is_token(SyntaxKind::CloseParenToken) {
            loop {
                let keyword = self.expect_token(SyntaxKind::InKeyword)?;
                parameters.push(self.parse_parameter_rest(keyword, ParamMode::In)?);
                if self.optional_token(SyntaxKind::CommaToken).is_none() {
                    break;
                }
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken)?;
        self.expect_token(SyntaxKind::SemicolonToken)?;
        let init = self.alloc_node(node_at(SyntaxKind::InitDeclarator, &keyword).with_name(name.text));
        Ok(self.finish_node(init, &parameters))
    }

    fn parse_abstract_value(&mut self) -> PResult<NodeId> {
        self.nested(|p| {
            let keyword = p.expect_token(SyntaxKind::AbstractKeyword)?;
            p.expect_token(SyntaxKind::ValuetypeKeyword)?;
            let name = p.expect_identifier()?;
            let spec = p.parse_value_inheritance_spec()?;
            let (spec_flags, data) = p.inheritance_of(spec);
            let value = p.alloc_node(
                node_at(SyntaxKind::ValueAbsDecl, &keyword)
                    .with_name(name.text)
                    .with_flags(NodeFlags::ABSTRACT | spec_flags)
                    .with_data(data),
            );
            p.expect_token(SyntaxKind::OpenBraceToken)?;
            let mut children: Vec<NodeId> = spec.into_iter().collect();
            while !p.is_token(SyntaxKind::CloseBraceToken) {
                children.extend(p.parse_export()?);
            }
            p.expect_token(SyntaxKind::CloseBraceToken)?;
            Ok(p.finish_node(value, &children))
        })
    }

    fn parse_value_box(&mut self) -> PResult<NodeId> {
        let keyword = self.expect_token(SyntaxKind::ValuetypeKeyword)?;
        let name = self.expect_identifier()?;
        let spec = self.parse_type_spec()?;
        let value = self.alloc_node(
            node_at(SyntaxKind::ValueBoxDecl, &keyword)
                .with_name(name.text)
                .with_type(Arc::clone(&spec.ty)),
        );
        let children: Vec<NodeId> = spec.decl.into_iter().collect();
        Ok(self.finish_node(value, &children))
    }

    fn parse_value_forward_declaration(&mut self) -> PResult<NodeId> {
        let first = self.peek_token();
        let flags = if self.optional_token(SyntaxKind::AbstractKeyword).is_some() {
            NodeFlags::ABSTRACT
        } else {
            NodeFlags::empty()
        };
        self.expect_token(SyntaxKind::ValuetypeKeyword)?;
        let name = self.expect_identifier()?;
        let forward = self.alloc_node(
            node_at(SyntaxKind::ValueForwardDecl, &first)
                .with_name(name.text)
                .with_flags(flags),
        );
        Ok(self.finish_node(forward, &[]))
    }

    // ========================================================================
    // Constants and exceptions
    // ========================================================================

    fn parse_const_declaration(&mut self) -> PResult<NodeId> {
        let keyword = self.expect_token(SyntaxKind::ConstKeyword)?;
        let ty = self.parse_const_type()?;
        let name = self.expect_identifier()?;
        self.expect_token(SyntaxKind::EqualsToken)?;
        let value = self.parse_const_expression()?;
        let constant = self.alloc_node(
            node_at(SyntaxKind::Const, &keyword)
                .with_name(name.text)
                .with_type(ty)
                .with_data(NodeData::Const { value }),
        );
        Ok(self.finish_node(constant, &[]))
    }

    fn parse_const_type(&mut self) -> PResult<Arc<TypeExpr>> {
        match self.current_token() {
            SyntaxKind::FixedKeyword => {
                self.next_token();
                Ok(Arc::new(TypeExpr::fixed_const()))
            }
            SyntaxKind::StringKeyword | SyntaxKind::WstringKeyword => self.parse_string_type(),
            SyntaxKind::Identifier | SyntaxKind::ColonColonToken => self.parse_scoped_type(),
            kind if CONST_TYPE_START.contains(&kind) => self.parse_base_type(),
            _ => self.expected(CONST_TYPE_START),
        }
    }

    fn parse_exception(&mut self) -> PResult<NodeId> {
        self.nested(|p| {
            let keyword = p.expect_token(SyntaxKind::ExceptionKeyword)?;
            let name = p.expect_identifier()?;
            let exception = p.alloc_node(node_at(SyntaxKind::Exception, &keyword).with_name(name.text));
            p.expect_token(SyntaxKind::OpenBraceToken)?;
            let mut members = Vec::new();
            while !p.is_token(SyntaxKind::CloseBraceToken) {
                members.push(p.parse_member()?);
            }
            p.expect_token(SyntaxKind::CloseBraceToken)?;
            Ok(p.finish_node(exception, &members))
        })
    }

    // ========================================================================
    // Type declarations
    // ========================================================================

    fn parse_type_declaration(&mut self) -> PResult<NodeId> {
        match self.current_token() {
            SyntaxKind::TypedefKeyword => self.parse_typedef(),
            SyntaxKind::StructKeyword => self.parse_struct_type(),
            SyntaxKind::UnionKeyword => self.parse_union_type(),
            SyntaxKind::EnumKeyword => self.parse_enum_type(),
            SyntaxKind::NativeKeyword => self.parse_native(),
            _ => self.expected(&[
                SyntaxKind::TypedefKeyword,
                SyntaxKind::StructKeyword,
                SyntaxKind::UnionKeyword,
                SyntaxKind::EnumKeyword,
                SyntaxKind::NativeKeyword,
            ]),
        }
    }

    fn parse_typedef(&mut self) -> PResult<NodeId> {
        let keyword = self.expect_token(SyntaxKind::TypedefKeyword)?;
        let spec = self.parse_type_spec()?;
        let declarators = self.parse_declarators()?;
        let typedef = self.alloc_node(node_at(SyntaxKind::TypeDef, &keyword).with_type(Arc::clone(&spec.ty)));
        Ok(self.finish_typed(typedef, spec, declarators))
    }

    /// The declarator names an opaque type, so unlike typedef declarators it
    /// gets no type.
    fn parse_native(&mut self) -> PResult<NodeId> {
        let keyword = self.expect_token(SyntaxKind::NativeKeyword)?;
        let declarator = self.parse_simple_declarator()?;
        let name = self.nodes[declarator].name.clone();
        let native = self.alloc_node(node_at(SyntaxKind::Native, &keyword).with_name(name));
        Ok(self.finish_node(native, &[declarator]))
    }

    fn parse_struct_type(&mut self) -> PResult<NodeId> {
        self.nested(|p| {
            let keyword = p.expect_token(SyntaxKind::StructKeyword)?;
            let name = p.expect_identifier()?;
            let structure = p.alloc_node(node_at(SyntaxKind::StructType, &keyword).with_name(name.text));
            p.expect_token(SyntaxKind::OpenBraceToken)?;
            let mut members = Vec::new();
            loop {
                members.push(p.parse_member()?);
                if p.is_token(SyntaxKind::CloseBraceToken) {
                    break;
                }
            }
            p.expect_token(SyntaxKind::CloseBraceToken)?;
            Ok(p.finish_node(structure, &members))
        })
    }

    fn parse_member(&mut self) -> PResult<NodeId> {
        let first = self.peek_token();
        let spec = self.parse_type_spec()?;
        let declarators = self.parse_declarators()?;
        self.expect_token(SyntaxKind::SemicolonToken)?;
        let member = self.alloc_node(node_at(SyntaxKind::Member, &first).with_type(Arc::clone(&spec.ty)));
        Ok(self.finish_typed(member, spec, declarators))
    }

    fn parse_union_type(&mut self) -> PResult<NodeId> {
        self.nested(|p| {
            let keyword = p.expect_token(SyntaxKind::UnionKeyword)?;
            let name = p.expect_identifier()?;
            p.expect_token(SyntaxKind::SwitchKeyword)?;
            p.expect_token(SyntaxKind::OpenParenToken)?;
            let switch = p.parse_switch_type_spec()?;
            p.expect_token(SyntaxKind::CloseParenToken)?;
            p.expect_token(SyntaxKind::OpenBraceToken)?;
            let union = p.alloc_node(
                node_at(SyntaxKind::UnionType, &keyword)
                    .with_name(name.text)
                    .with_type(Arc::clone(&switch.ty)),
            );
            let mut children: Vec<NodeId> = switch.decl.into_iter().collect();
            loop {
                children.push(p.parse_case()?);
                if p.is_token(SyntaxKind::CloseBraceToken) {
                    break;
                }
            }
            p.expect_token(SyntaxKind::CloseBraceToken)?;
            Ok(p.finish_node(union, &children))
        })
    }

    fn parse_switch_type_spec(&mut self) -> PResult<TypeSpec> {
        match self.current_token() {
            SyntaxKind::LongKeyword
            | SyntaxKind::ShortKeyword
            | SyntaxKind::UnsignedKeyword
            | SyntaxKind::CharKeyword
            | SyntaxKind::WcharKeyword
            | SyntaxKind::BooleanKeyword => Ok(TypeSpec::simple(self.parse_base_type()?)),
            SyntaxKind::EnumKeyword => {
                let decl = self.parse_enum_type()?;
                Ok(TypeSpec {
                    ty: self.constructed_type(decl),
                    decl: Some(decl),
                })
            }
            SyntaxKind::Identifier | SyntaxKind::ColonColonToken => Ok(TypeSpec::simple(self.parse_scoped_type()?)),
            _ => self.expected(SWITCH_TYPE_START),
        }
    }

    /// One `case` of a union: its labels, then a single typed declarator.
    fn parse_case(&mut self) -> PResult<NodeId> {
        let first = self.peek_token();
        let mut labels = Vec::new();
        loop {
            if self.optional_token(SyntaxKind::CaseKeyword).is_some() {
                let value = self.parse_const_expression()?;
                self.expect_token(SyntaxKind::ColonToken)?;
                labels.push(CaseLabel::Case(value));
            } else if self.optional_token(SyntaxKind::DefaultKeyword).is_some() {
                self.expect_token(SyntaxKind::ColonToken)?;
                labels.push(CaseLabel::Default);
            } else if labels.is_empty() {
                return Err(Fail::Mismatch);
            } else {
                break;
            }
        }
        let spec = self.parse_type_spec()?;
        let declarator = self.parse_declarator()?;
        self.expect_token(SyntaxKind::SemicolonToken)?;
        let member = self.alloc_node(
            node_at(SyntaxKind::UnionMember, &first)
                .with_type(Arc::clone(&spec.ty))
                .with_data(NodeData::UnionMember { labels }),
        );
        self.finish_typed(member, spec, vec![declarator]);
        finalize::name_union_member(&mut self.nodes, member);
        Ok(member)
    }

    fn parse_enum_type(&mut self) -> PResult<NodeId> {
        let keyword = self.expect_token(SyntaxKind::EnumKeyword)?;
        let name = self.expect_identifier()?;
        let enumeration = self.alloc_node(node_at(SyntaxKind::EnumType, &keyword).with_name(name.text));
        self.expect_token(SyntaxKind::OpenBraceToken)?;
        let mut enumerators = Vec::new();
        loop {
            let token = self.expect_identifier()?;
            let enumerator = self.alloc_node(node_at(SyntaxKind::Identifier, &token).with_name(token.text));
            enumerators.push(self.finish_node(enumerator, &[]));
            if self.optional_token(SyntaxKind::CommaToken).is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBraceToken)?;
        Ok(self.finish_node(enumeration, &enumerators))
    }

    // ========================================================================
    // Declarators
    // ========================================================================

    fn parse_declarators(&mut self) -> PResult<Vec<NodeId>> {
        let mut declarators = vec![self.parse_declarator()?];
        while self.optional_token(SyntaxKind::CommaToken).is_some() {
            declarators.push(self.parse_declarator()?);
        }
        Ok(declarators)
    }

    fn parse_declarator(&mut self) -> PResult<NodeId> {
        let is_array = self.look_ahead("array declarator", |p| {
            p.expect_identifier()?;
            p.expect_token(SyntaxKind::OpenBracketToken)
        })?;
        if is_array {
            self.parse_array_declarator()
        } else {
            self.parse_simple_declarator()
        }
    }

    fn parse_simple_declarator(&mut self) -> PResult<NodeId> {
        let name = self.expect_identifier()?;
        let declarator = self.alloc_node(node_at(SyntaxKind::SimpleDeclarator, &name).with_name(name.text));
        Ok(self.finish_node(declarator, &[]))
    }

    fn parse_array_declarator(&mut self) -> PResult<NodeId> {
        let name = self.expect_identifier()?;
        let mut dims = Vec::new();
        while self.optional_token(SyntaxKind::OpenBracketToken).is_some() {
            dims.push(self.parse_const_expression()?);
            self.expect_token(SyntaxKind::CloseBracketToken)?;
        }
        let declarator = self.alloc_node(
            node_at(SyntaxKind::ArrayDeclarator, &name)
                .with_name(name.text)
                .with_data(NodeData::ArrayDeclarator { dims }),
        );
        Ok(self.finish_node(declarator, &[]))
    }

    // ========================================================================
    // Type specifiers
    // ========================================================================

    fn parse_type_spec(&mut self) -> PResult<TypeSpec> {
        let decl = match self.current_token() {
            SyntaxKind::StructKeyword => self.parse_struct_type()?,
            SyntaxKind::UnionKeyword => self.parse_union_type()?,
            SyntaxKind::EnumKeyword => self.parse_enum_type()?,
            kind if utilities::can_start_simple_type_spec(kind) => {
                return Ok(TypeSpec::simple(self.parse_simple_type_spec()?));
            }
            _ => return self.expected(&utilities::type_spec_start()),
        };
        Ok(TypeSpec {
            ty: self.constructed_type(decl),
            decl: Some(decl),
        })
    }

    fn constructed_type(&self, decl: NodeId) -> Arc<TypeExpr> {
        let node = &self.nodes[decl];
        let kind = match node.kind {
            SyntaxKind::StructType => TypeKind::Struct,
            SyntaxKind::UnionType => TypeKind::Union,
            _ => TypeKind::Enum,
        };
        Arc::new(TypeExpr::constructed(kind, node.name.clone()))
    }

    fn parse_simple_type_spec(&mut self) -> PResult<Arc<TypeExpr>> {
        match self.current_token() {
            SyntaxKind::SequenceKeyword => self.parse_sequence_type(),
            SyntaxKind::StringKeyword | SyntaxKind::WstringKeyword => self.parse_string_type(),
            SyntaxKind::FixedKeyword => self.parse_fixed_type(),
            SyntaxKind::Identifier | SyntaxKind::ColonColonToken => self.parse_scoped_type(),
            kind if BASE_TYPE_START.contains(&kind) => self.parse_base_type(),
            _ => self.expected(&utilities::simple_type_spec_start()),
        }
    }

    fn parse_param_type_spec(&mut self) -> PResult<Arc<TypeExpr>> {
        match self.current_token() {
            SyntaxKind::StringKeyword | SyntaxKind::WstringKeyword => self.parse_string_type(),
            SyntaxKind::Identifier | SyntaxKind::ColonColonToken => self.parse_scoped_type(),
            kind if BASE_TYPE_START.contains(&kind) => self.parse_base_type(),
            _ => self.expected(&utilities::param_type_spec_start()),
        }
    }

    fn parse_scoped_type(&mut self) -> PResult<Arc<TypeExpr>> {
        let name = self.parse_scoped_name()?;
        Ok(Arc::new(TypeExpr::scoped(&name)))
    }

    /// A base type. `long` and `unsigned` are resolved by the token after them.
    fn parse_base_type(&mut self) -> PResult<Arc<TypeExpr>> {
        let kind = match self.current_token() {
            SyntaxKind::FloatKeyword => TypeKind::Float,
            SyntaxKind::DoubleKeyword => TypeKind::Double,
            SyntaxKind::ShortKeyword => TypeKind::Short,
            SyntaxKind::CharKeyword => TypeKind::Char,
            SyntaxKind::WcharKeyword => TypeKind::WChar,
            SyntaxKind::BooleanKeyword => TypeKind::Boolean,
            SyntaxKind::OctetKeyword => TypeKind::Octet,
            SyntaxKind::AnyKeyword => TypeKind::Any,
            SyntaxKind::ObjectKeyword => TypeKind::Object,
            SyntaxKind::ValueBaseKeyword => TypeKind::ValueBase,
            SyntaxKind::LongKeyword => {
                self.next_token();
                let kind = match self.current_token() {
                    SyntaxKind::LongKeyword => TypeKind::LongLong,
                    SyntaxKind::DoubleKeyword => TypeKind::LongDouble,
                    _ => return Ok(Arc::new(TypeExpr::primitive(TypeKind::Long))),
                };
                self.next_token();
                return Ok(Arc::new(TypeExpr::primitive(kind)));
            }
            SyntaxKind::UnsignedKeyword => {
                self.next_token();
                return self.parse_unsigned_type();
            }
            _ => return self.expected(BASE_TYPE_START),
        };
        self.next_token();
        Ok(Arc::new(TypeExpr::primitive(kind)))
    }

    fn parse_unsigned_type(&mut self) -> PResult<Arc<TypeExpr>> {
        let kind = match self.current_token() {
            SyntaxKind::ShortKeyword => {
                self.next_token();
                TypeKind::UnsignedShort
            }
            SyntaxKind::LongKeyword => {
                self.next_token();
                if self.current_token() == SyntaxKind::LongKeyword {
                    self.next_token();
                    TypeKind::UnsignedLongLong
                } else {
                    TypeKind::UnsignedLong
                }
            }
            _ => return self.expected(&[SyntaxKind::ShortKeyword, SyntaxKind::LongKeyword]),
        };
        Ok(Arc::new(TypeExpr::primitive(kind)))
    }

    fn parse_sequence_type(&mut self) -> PResult<Arc<TypeExpr>> {
        self.nested(|p| {
            p.expect_token(SyntaxKind::SequenceKeyword)?;
            p.expect_token(SyntaxKind::LessThanToken)?;
            let element = p.parse_simple_type_spec()?;
            let bound = if p.optional_token(SyntaxKind::CommaToken).is_some() {
                Some(p.parse_const_expression()?)
            } else {
                None
            };
            p.expect_token(SyntaxKind::GreaterThanToken)?;
            Ok(Arc::new(TypeExpr::sequence(element, bound)))
        })
    }

    fn parse_string_type(&mut self) -> PResult<Arc<TypeExpr>> {
        let kind = if self.optional_token(SyntaxKind::StringKeyword).is_some() {
            TypeKind::String
        } else {
            self.expect_token(SyntaxKind::WstringKeyword)?;
            TypeKind::WString
        };
        let bound = if self.optional_token(SyntaxKind::LessThanToken).is_some() {
            let bound = self.parse_const_expression()?;
            self.expect_token(SyntaxKind::GreaterThanToken)?;
            Some(bound)
        } else {
            None
        };
        Ok(Arc::new(TypeExpr::string(kind, bound)))
    }

    fn parse_fixed_type(&mut self) -> PResult<Arc<TypeExpr>> {
        self.expect_token(SyntaxKind::FixedKeyword)?;
        self.expect_token(SyntaxKind::LessThanToken)?;
        let digits = self.parse_const_expression()?;
        self.expect_token(SyntaxKind::CommaToken)?;
        let scale = self.parse_const_expression()?;
        self.expect_token(SyntaxKind::GreaterThanToken)?;
        Ok(Arc::new(TypeExpr::fixed(digits, scale)))
    }

    // ========================================================================
    // Names
    // ========================================================================

    fn parse_scoped_name(&mut self) -> PResult<ScopedName> {
        let absolute = self.optional_token(SyntaxKind::ColonColonToken).is_some();
        let mut parts = vec![self.expect_identifier()?.text];
        while self.optional_token(SyntaxKind::ColonColonToken).is_some() {
            parts.push(self.expect_identifier()?.text);
        }
        Ok(ScopedName::new(absolute, parts))
    }

    fn parse_scoped_name_list(&mut self) -> PResult<Vec<ScopedName>> {
        let mut names = vec![self.parse_scoped_name()?];
        while self.optional_token(SyntaxKind::CommaToken).is_some() {
            names.push(self.parse_scoped_name()?);
        }
        Ok(names)
    }

    // ========================================================================
    // Constant expressions
    // ========================================================================

    fn parse_const_expression(&mut self) -> PResult<ConstExpr> {
        self.parse_binary_expression(OperatorPrecedence::Lowest)
    }

    /// Operators bind left to right within a precedence level.
    fn parse_binary_expression(&mut self, precedence: OperatorPrecedence) -> PResult<ConstExpr> {
        let mut left = self.parse_unary_expression()?;
        loop {
            let op = self.current_token();
            let op_precedence = get_binary_operator_precedence(op);
            if op_precedence == OperatorPrecedence::Lowest {
                self.reporter.note_all(self.tokens.cursor(), BINARY_OPERATORS);
                break;
            }
            if op_precedence <= precedence {
                break;
            }
            self.next_token();
            let right = self.parse_binary_expression(op_precedence)?;
            left = ConstExpr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> PResult<ConstExpr> {
        match self.current_token() {
            op @ (SyntaxKind::MinusToken | SyntaxKind::PlusToken | SyntaxKind::TildeToken) => {
                self.next_token();
                let operand = self.parse_primary_expression()?;
                Ok(ConstExpr::Unary {
                    op,
                    operand: Box::new(operand),
                })
            }
            kind => {
                if !PRIMARY_EXPRESSION_START.contains(&kind) {
                    self.reporter.note_all(self.tokens.cursor(), UNARY_OPERATORS);
                }
                self.parse_primary_expression()
            }
        }
    }

    fn parse_primary_expression(&mut self) -> PResult<ConstExpr> {
        match self.current_token() {
            SyntaxKind::Identifier | SyntaxKind::ColonColonToken => Ok(ConstExpr::Name(self.parse_scoped_name()?)),
            SyntaxKind::StringLiteral | SyntaxKind::WideStringLiteral => {
                let first = self.next_token();
                Ok(ConstExpr::Literal(self.concatenate_strings(first)))
            }
            kind if kind.is_literal() || matches!(kind, SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword) => {
                let token = self.next_token();
                Ok(ConstExpr::Literal(Literal::new(token.kind, token.text, token.value)))
            }
            SyntaxKind::OpenParenToken => self.nested(|p| {
                p.next_token();
                let inner = p.parse_const_expression()?;
                p.expect_token(SyntaxKind::CloseParenToken)?;
                Ok(ConstExpr::Paren { inner: Box::new(inner) })
            }),
            _ => self.expected(PRIMARY_EXPRESSION_START),
        }
    }

    fn parse_string_literal(&mut self) -> PResult<Literal> {
        let first = self.expect_token(SyntaxKind::StringLiteral)?;
        Ok(self.concatenate_strings(first))
    }

    /// Adjacent string literals of the same kind form one literal.
    fn concatenate_strings(&mut self, first: Token) -> Literal {
        let kind = first.kind;
        let mut text = first.text;
        let mut value = first.value;
        while self.current_token() == kind {
            let next = self.next_token();
            text.push(' ');
            text.push_str(&next.text);
            value.push_str(&next.value);
        }
        Literal::new(kind, text, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Ast {
        Parser::new(source).parse_unit().expect("parse failed")
    }

    #[test]
    fn test_speculation_leaves_no_nodes_behind() {
        let ast = parse("valuetype V long; interface I;");
        let live: Vec<SyntaxKind> = ast.descendants(ast.root()).iter().map(|&id| ast.node(id).kind).collect();
        assert_eq!(
            live,
            vec![SyntaxKind::Specification, SyntaxKind::ValueBoxDecl, SyntaxKind::ForwardDecl]
        );
        assert_eq!(ast.node_count(), 3);
    }

    #[test]
    fn test_look_ahead_restores_cursor() {
        let mut parser = Parser::new("interface A : B {};");
        let matched = parser
            .look_ahead("test", |p| {
                p.parse_interface_header()?;
                p.expect_token(SyntaxKind::OpenBraceToken)
            })
            .expect("no hard failure");
        assert!(matched);
        assert_eq!(parser.tokens.cursor(), 0);
        assert_eq!(parser.nodes.len(), 0);
    }

    #[test]
    fn test_try_parse_keeps_success() {
        let mut parser = Parser::new("valuetype V string;");
        let boxed = parser.try_parse("test", Parser::parse_value_box).expect("no hard failure");
        assert!(boxed.is_some());
        assert_eq!(parser.current_token(), SyntaxKind::SemicolonToken);
    }

    #[test]
    fn test_depth_limit_is_not_caught_by_speculation() {
        let mut parser = Parser::with_options("interface I {};", ParserOptions::default().with_max_depth(0));
        let result = parser.look_ahead("test", |p| p.parse_interface_declaration());
        assert!(matches!(result, Err(Fail::TooDeep(_))));
    }

    #[test]
    fn test_expression_precedence() {
        let ast = parse("const long X = 1 + 2 * 3 | 4;");
        let constant = ast.node(ast.root_node().children[0]);
        let NodeData::Const { value } = &constant.data else {
            panic!("missing value");
        };
        let ConstExpr::Binary { op, left, .. } = value else {
            panic!("not binary");
        };
        assert_eq!(*op, SyntaxKind::BarToken);
        assert_eq!(left.to_string(), "1 + 2 * 3");
    }
}
