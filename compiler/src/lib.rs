//! strand-compiler
//!
//! The compiler front-end for `.schema` IDL files:
//!  1) A tokenizer producing position-annotated tokens (comments included),
//!  2) A recursive-descent parser building a `Schema` AST,
//!  3) A validator (duplicate names, unresolved type references),
//!  4) A comment-preserving formatter emitting canonical schema text,
//!  5) Error types, one per stage.
//!
//! Code generators and the CLI consume the `Schema` value produced here;
//! nothing in this crate performs I/O.

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod validator;
pub mod formatter;

pub use error::{FormatError, LexError, ParseError, ValidationError};
pub use formatter::format_schema;
pub use parser::parse_schema;
pub use tokenizer::tokenize_schema;
pub use types::{Comment, Decl, Field, Model, Rpc, Schema, Token, TokenKind, TypeKind, TypeRef};
pub use validator::{validate_schema, BUILTIN_TYPES};
