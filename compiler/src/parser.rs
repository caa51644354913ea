use crate::error::ParseError;
use crate::tokenizer::tokenize_schema;
use crate::types::{Comment, Decl, Field, Model, Rpc, Schema, Token, TokenKind, TypeKind, TypeRef};
use crate::validator::validate_schema;

/// Parse schema text into a validated `Schema`: tokenize, recursive-descent
/// parse, then validate. Any stage's failure short-circuits; the parser
/// never resynchronizes and returns no partial tree.
pub fn parse_schema(text: &str) -> Result<Schema, ParseError> {
    let tokens = tokenize_schema(text)?;

    // Comments are not part of the grammar; they are captured on the schema
    // and matched back to nodes by position when formatting.
    let mut comments = Vec::new();
    let mut syntactic = Vec::new();
    for token in tokens {
        if token.kind == TokenKind::Comment {
            comments.push(Comment {
                text: token.text,
                line: token.line,
                col:  token.col,
            });
        } else {
            syntactic.push(token);
        }
    }

    let mut parser = Parser {
        tokens: &syntactic,
        pos:    0,
    };
    let mut schema = parser.parse_schema()?;
    schema.comments = comments;

    validate_schema(&schema)?;
    Ok(schema)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos:    usize,
}

impl<'a> Parser<'a> {
    fn parse_schema(&mut self) -> Result<Schema, ParseError> {
        let mut schema = Schema {
            decls:    Vec::new(),
            models:   Vec::new(),
            rpcs:     Vec::new(),
            comments: Vec::new(),
        };
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Model => {
                    let model = self.parse_model()?;
                    schema.decls.push(Decl::Model(schema.models.len()));
                    schema.models.push(model);
                }
                TokenKind::Rpc => {
                    let rpc = self.parse_rpc()?;
                    schema.decls.push(Decl::Rpc(schema.rpcs.len()));
                    schema.rpcs.push(rpc);
                }
                _ => return Err(self.unexpected("\"model\" or \"rpc\"")),
            }
        }
        Ok(schema)
    }

    fn parse_model(&mut self) -> Result<Model, ParseError> {
        let keyword = self.expect(TokenKind::Model, "\"model\"")?;
        let (line, col) = (keyword.line, keyword.col);
        let name = self.expect(TokenKind::Identifier, "model name")?.text.clone();
        self.expect(TokenKind::LBrace, "\"{\"")?;

        let mut fields = Vec::new();
        loop {
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::RBrace) => break,
                Some(TokenKind::Identifier) => fields.push(self.parse_field()?),
                _ => return Err(self.unexpected("field name or \"}\"")),
            }
        }
        let end = self.expect(TokenKind::RBrace, "\"}\"")?;

        Ok(Model {
            name,
            fields,
            line,
            col,
            end_line: end.line,
        })
    }

    fn parse_rpc(&mut self) -> Result<Rpc, ParseError> {
        let keyword = self.expect(TokenKind::Rpc, "\"rpc\"")?;
        let (line, col) = (keyword.line, keyword.col);
        let name = self.expect(TokenKind::Identifier, "rpc name")?.text.clone();
        self.expect(TokenKind::LParen, "\"(\"")?;

        // Parameters are comma-separated; a trailing comma before `)` is
        // accepted.
        let mut parameters = Vec::new();
        loop {
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::RParen) => break,
                Some(TokenKind::Identifier) => {
                    parameters.push(self.parse_field()?);
                    if self.eat(TokenKind::Comma) {
                        continue;
                    }
                    match self.peek().map(|t| t.kind) {
                        Some(TokenKind::RParen) => break,
                        _ => return Err(self.unexpected("\",\" or \")\"")),
                    }
                }
                _ => return Err(self.unexpected("parameter name or \")\"")),
            }
        }
        let close = self.expect(TokenKind::RParen, "\")\"")?;
        let (params_end_line, params_end_col) = (close.line, close.col);

        // A type after `)` is the return type; its absence means the call
        // returns nothing.
        let returns = match self.peek().map(|t| t.kind) {
            Some(TokenKind::Identifier) => Some(self.parse_type()?),
            _ => None,
        };

        Ok(Rpc {
            name,
            parameters,
            returns,
            line,
            col,
            params_end_line,
            params_end_col,
        })
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let name_token = self.expect(TokenKind::Identifier, "field name")?;
        let (name, line, col) = (name_token.text.clone(), name_token.line, name_token.col);
        self.expect(TokenKind::Colon, "\":\"")?;
        let type_ = self.parse_type()?;
        Ok(Field {
            name,
            type_,
            line,
            col,
        })
    }

    fn parse_type(&mut self) -> Result<TypeRef, ParseError> {
        let name_token = self.expect(TokenKind::Identifier, "type name")?;
        let (line, col) = (name_token.line, name_token.col);
        let kind = match name_token.text.as_str() {
            "list" => {
                self.expect(TokenKind::LBracket, "\"[\"")?;
                let elem = self.parse_type()?;
                self.expect(TokenKind::RBracket, "\"]\"")?;
                TypeKind::List(Box::new(elem))
            }
            "map" => {
                self.expect(TokenKind::LBracket, "\"[\"")?;
                let value = self.parse_type()?;
                self.expect(TokenKind::RBracket, "\"]\"")?;
                TypeKind::Map(Box::new(value))
            }
            name => TypeKind::Ident(name.to_string()),
        };
        let optional = self.eat(TokenKind::Optional);
        Ok(TypeRef {
            kind,
            optional,
            line,
            col,
        })
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().map(|t| t.kind) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<&'a Token, ParseError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                found:    token.text.clone(),
                line:     token.line,
                col:      token.col,
                expected: expected.to_string(),
            },
            None => ParseError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }
}
