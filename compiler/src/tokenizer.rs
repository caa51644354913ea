use lazy_static::lazy_static;
use regex::Regex;

use crate::error::LexError;
use crate::types::{Token, TokenKind};

lazy_static! {
    // Alternation order is part of the contract: the regex crate picks the
    // first alternative that matches at a position, so keywords must come
    // before the identifier pattern. The trailing \b keeps `modelFoo` from
    // splitting into `model` + `Foo`.
    pub static ref TOKEN_REGEX: Regex =
        Regex::new(r"(\s+|#.*|model\b|rpc\b|[A-Za-z_][A-Za-z0-9_]*|[:,()\[\]{}]|\?)").unwrap();
}

fn token_kind(text: &str) -> TokenKind {
    match text {
        "model" => TokenKind::Model,
        "rpc"   => TokenKind::Rpc,
        "?"     => TokenKind::Optional,
        ":"     => TokenKind::Colon,
        ","     => TokenKind::Comma,
        "("     => TokenKind::LParen,
        ")"     => TokenKind::RParen,
        "["     => TokenKind::LBracket,
        "]"     => TokenKind::RBracket,
        "{"     => TokenKind::LBrace,
        "}"     => TokenKind::RBrace,
        _       => TokenKind::Identifier,
    }
}

/// Split schema text into tokens with 1-indexed line/column positions.
/// Whitespace is consumed for position tracking only; comments are kept as
/// `TokenKind::Comment` tokens because the formatter must recover them.
/// Stops at the first unrecognized character.
pub fn tokenize_schema(text: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut col = 1;
    let mut last_end = 0;

    for mat in TOKEN_REGEX.find_iter(text) {
        if mat.start() > last_end {
            // A gap between matches is text no alternative recognizes.
            return Err(unexpected_char(&text[last_end..], line, col));
        }
        let part = mat.as_str();

        if part.starts_with('#') {
            tokens.push(Token {
                kind: TokenKind::Comment,
                text: part.to_string(),
                line,
                col,
            });
        } else if !part.starts_with(char::is_whitespace) {
            tokens.push(Token {
                kind: token_kind(part),
                text: part.to_string(),
                line,
                col,
            });
        }

        // Advance line/col through the matched span.
        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            line += newline_count;
            let last_line_part = part.rsplit('\n').next().unwrap_or("");
            col = last_line_part.chars().count() + 1;
        } else {
            col += part.chars().count();
        }

        last_end = mat.end();
    }

    if last_end != text.len() {
        return Err(unexpected_char(&text[last_end..], line, col));
    }

    Ok(tokens)
}

fn unexpected_char(rest: &str, line: usize, col: usize) -> LexError {
    LexError {
        ch: rest.chars().next().unwrap_or('\0'),
        line,
        col,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_model() {
        let input = "model User {\n    id: int\n}\n";
        let tokens = tokenize_schema(input).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Model);
        assert_eq!(tokens[0].text, "model");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].col, 1);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "User");
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
        assert_eq!(tokens[3].text, "id");
        assert_eq!(tokens[3].line, 2);
        assert_eq!(tokens[3].col, 5);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::RBrace);
    }

    #[test]
    fn test_keyword_identifier_boundary() {
        let tokens = tokenize_schema("modelFoo").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "modelFoo");
    }

    #[test]
    fn test_comments_are_kept_as_tokens() {
        let tokens = tokenize_schema("# leading\nrpc Ping() # trailing\n").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "# leading");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].col, 1);
        let trailing = tokens.last().unwrap();
        assert_eq!(trailing.kind, TokenKind::Comment);
        assert_eq!(trailing.text, "# trailing");
        assert_eq!(trailing.line, 2);
        assert_eq!(trailing.col, 12);
    }

    #[test]
    fn test_optional_and_brackets() {
        let tokens = tokenize_schema("list[string?]?").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::LBracket,
                TokenKind::Identifier,
                TokenKind::Optional,
                TokenKind::RBracket,
                TokenKind::Optional,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize_schema("model User { name: string$ }\n").unwrap_err();
        assert_eq!(err.ch, '$');
        assert_eq!(err.line, 1);
        assert_eq!(err.col, 26);
    }

    #[test]
    fn test_column_resets_across_lines() {
        let tokens = tokenize_schema("rpc Ping()\nrpc Pong()").unwrap();
        let pong = tokens.iter().find(|t| t.text == "Pong").unwrap();
        assert_eq!(pong.line, 2);
        assert_eq!(pong.col, 5);
    }
}
