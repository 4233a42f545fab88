//! Pattern language front end: lexer and recursive-descent parser.

pub mod ast;
mod grammar;
mod lexer;


pub use grammar::parse;
pub use lexer::{Token, TokenKind, lex, token_text};
