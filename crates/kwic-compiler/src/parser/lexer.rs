//! Lexer for the pattern language.
//!
//! Produces span-based tokens without storing text; text is sliced from the
//! source only when needed. Consecutive unrecognized characters are coalesced
//! into a single `Garbage` token.

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("<")]
    AngleOpen,

    #[token(">")]
    AngleClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(",")]
    Comma,

    #[token("|")]
    Pipe,

    #[token("&")]
    Amp,

    /// Defined before `Negation` and `Equals` for correct precedence.
    #[token("!=")]
    NotEquals,

    #[token("!")]
    Negation,

    #[token("=")]
    Equals,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("?")]
    Question,

    /// Focus marker.
    #[token("^")]
    Caret,

    /// Wildcard token.
    #[token(".")]
    Dot,

    #[token("$")]
    Dollar,

    /// Case-insensitivity flag after a string.
    #[token("/i")]
    FlagI,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    Str,

    /// A string missing its closing quote. Shorter than any terminated string
    /// starting at the same position, so it only wins when `Str` fails.
    #[regex(r#""(?:[^"\\]|\\.)*"#)]
    UnterminatedStr,

    #[regex(r"[0-9]+")]
    Number,

    /// Identifier. Keywords (`within`, `meta`, `all`, ...) are contextual and
    /// recognized by the parser.
    #[regex(r"[A-Za-z_][A-Za-z0-9_:\-]*")]
    Ident,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// Coalesced unrecognized characters.
    Garbage,
}

impl TokenKind {
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::BracketOpen => "`[`",
            TokenKind::BracketClose => "`]`",
            TokenKind::ParenOpen => "`(`",
            TokenKind::ParenClose => "`)`",
            TokenKind::AngleOpen => "`<`",
            TokenKind::AngleClose => "`>`",
            TokenKind::BraceOpen => "`{`",
            TokenKind::BraceClose => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Pipe => "`|`",
            TokenKind::Amp => "`&`",
            TokenKind::NotEquals => "`!=`",
            TokenKind::Negation => "`!`",
            TokenKind::Equals => "`=`",
            TokenKind::Star => "`*`",
            TokenKind::Plus => "`+`",
            TokenKind::Question => "`?`",
            TokenKind::Caret => "`^`",
            TokenKind::Dot => "`.`",
            TokenKind::Dollar => "`$`",
            TokenKind::FlagI => "`/i`",
            TokenKind::Str => "string",
            TokenKind::UnterminatedStr => "unterminated string",
            TokenKind::Number => "number",
            TokenKind::Ident => "identifier",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Garbage => "unrecognized input",
        }
    }
}

/// Zero-copy token: kind + byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }
}

/// Tokenizes source, dropping whitespace.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(TokenKind::Garbage, start..lexer.span().start));
                }
                if kind != TokenKind::Whitespace {
                    tokens.push(Token::new(kind, lexer.span()));
                }
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(TokenKind::Garbage, start..source.len()));
                }
                break;
            }
        }
    }

    tokens
}

/// Retrieves the text slice for a token.
#[inline]
pub fn token_text<'q>(source: &'q str, token: &Token) -> &'q str {
    &source[token.span.clone()]
}
