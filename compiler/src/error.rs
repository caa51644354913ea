use thiserror::Error;

use crate::utils::quote;

/// An unrecognized character in the schema text. Tokenizing stops at the
/// first occurrence.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unexpected character {ch:?} at line {line}, column {col}")]
pub struct LexError {
    pub ch:   char,
    pub line: usize,
    pub col:  usize,
}

/// A grammar violation or premature end of input. The first error aborts the
/// whole parse; no partial schema is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {} but found {} at line {}, column {}", .expected, quote(.found), .line, .col)]
    UnexpectedToken {
        found:    String,
        line:     usize,
        col:      usize,
        expected: String,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A semantic violation found while sweeping a fully built schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("the model {} is defined twice", quote(.0))]
    DuplicateModel(String),

    #[error("the rpc {} is defined twice", quote(.0))]
    DuplicateRpc(String),

    #[error("the model name {} is reserved for a builtin type", quote(.0))]
    ReservedModelName(String),

    #[error("the field {} is defined twice in model {}", quote(.field), quote(.model))]
    DuplicateField { model: String, field: String },

    #[error("the parameter {} is defined twice in rpc {}", quote(.param), quote(.rpc))]
    DuplicateParameter { rpc: String, param: String },

    #[error("the type {} is not defined for {}", quote(.name), .owner)]
    UnknownType { name: String, owner: String },
}

/// Formatting was attempted on a schema that does not validate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
