use std::fmt;

use serde::Serialize;

/// Token kinds produced by the tokenizer. Comments are kept as tokens so the
/// formatter can reattach them later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Model,
    Rpc,
    Identifier,
    Optional,
    Colon,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comment,
}

/// A single token with its literal text and 1-indexed source position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub col:  usize,
}

/// A `#` line comment, including its marker, positioned at its first
/// character. Comments belong to the `Schema`, not to any AST node; the
/// formatter associates them with nodes by position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub text: String,
    pub line: usize,
    pub col:  usize,
}

/// The recursive type grammar: a bare identifier, `list[T]` or `map[V]`.
/// Map keys are implicitly `string` and have no slot here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeKind {
    Ident(String),
    List(Box<TypeRef>),
    Map(Box<TypeRef>),
}

/// A reference to a type as written in the schema. `optional` covers only
/// the outermost constructor; nested element/value types carry their own
/// flags, so `list[string?]?` is an optional list of optional strings.
/// `line`/`col` mark the first token of the reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRef {
    pub kind:     TypeKind,
    pub optional: bool,
    pub line:     usize,
    pub col:      usize,
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Ident(name) => write!(f, "{}", name)?,
            TypeKind::List(elem)  => write!(f, "list[{}]", elem)?,
            TypeKind::Map(value)  => write!(f, "map[{}]", value)?,
        }
        if self.optional {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// A model field or an RPC parameter; the same shape is used in both
/// contexts. `line`/`col` mark the field name token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name:  String,
    pub type_: TypeRef,
    pub line:  usize,
    pub col:   usize,
}

/// A `model` declaration. `line`/`col` mark the `model` keyword; `end_line`
/// marks the closing brace (equal to `line` for a single-line model).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    pub name:     String,
    pub fields:   Vec<Field>,
    pub line:     usize,
    pub col:      usize,
    pub end_line: usize,
}

/// An `rpc` declaration. `params_end_*` mark the closing parenthesis.
/// `returns` is `None` for fire-and-forget calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rpc {
    pub name:            String,
    pub parameters:      Vec<Field>,
    pub returns:         Option<TypeRef>,
    pub line:            usize,
    pub col:             usize,
    pub params_end_line: usize,
    pub params_end_col:  usize,
}

impl Rpc {
    pub fn has_return(&self) -> bool {
        self.returns.is_some()
    }
}

/// A top-level declaration in source order, indexing into `Schema::models`
/// or `Schema::rpcs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decl {
    Model(usize),
    Rpc(usize),
}

/// The parsed representation of one `.schema` file. `decls` preserves the
/// original top-to-bottom declaration order (models and RPCs may be
/// interleaved) and is the authoritative order for formatting; every model
/// and RPC is reachable from exactly one `decls` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub decls:    Vec<Decl>,
    pub models:   Vec<Model>,
    pub rpcs:     Vec<Rpc>,
    pub comments: Vec<Comment>,
}
