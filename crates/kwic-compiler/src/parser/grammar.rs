//! Recursive-descent parser for the pattern language.
//!
//! ```text
//! query      := pattern ("within" scope)? ("meta" condition)?
//! pattern    := branch ("|" branch)*
//! branch     := element+
//! element    := "^"? atom quantifier?
//! atom       := "[" condition? "]" | "." | STRING | "(" pattern ")" | "<" condition ">"
//! quantifier := "*" | "+" | "?" | "{" n "}" | "{" n "," m? "}" | "{" "," m "}"
//! condition  := conj ("|" conj)*
//! conj       := unary ("&" unary)*
//! unary      := "!" unary | "(" condition ")" | term
//! term       := IDENT ("=" | "!=") value | HEAD "=" "[" condition "]"
//!             | "all" term | "true" | "false"
//! value      := STRING "/i"? | IDENT | NUMBER | "$" IDENT
//! scope      := IDENT | "<" condition ">"
//! ```
//!
//! Parsing stops at the first error.

use super::ast::*;
use super::lexer::{Token, TokenKind, lex, token_text};
use crate::error::{CompileError, Result};

const ELEMENT: &str = "`[`, `.`, a string, `(` or `<`";

pub fn parse(source: &str) -> Result<QueryAst> {
    let mut parser = Parser::new(source);
    parser.query()
}

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    last_end: usize,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            tokens: lex(source),
            pos: 0,
            last_end: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Token access
    // ─────────────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn peek_nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Ident && token_text(self.source, t) == keyword)
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        self.last_end = token.span.end;
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        self.at(kind).then(|| self.bump())
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token> {
        match self.peek() {
            Some(t) if t.kind == kind => Ok(self.bump()),
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &'static str) -> CompileError {
        match self.peek() {
            Some(t) if t.kind == TokenKind::UnterminatedStr => CompileError::UnterminatedString {
                span: t.span.clone(),
            },
            Some(t) => CompileError::UnexpectedToken {
                found: t.kind.describe(),
                expected,
                span: t.span.clone(),
            },
            None => CompileError::UnexpectedEnd {
                expected,
                span: self.source.len()..self.source.len(),
            },
        }
    }

    fn start(&self) -> usize {
        self.peek().map_or(self.source.len(), |t| t.span.start)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Patterns
    // ─────────────────────────────────────────────────────────────────────

    fn query(&mut self) -> Result<QueryAst> {
        let pattern = self.alternation()?;

        let within = if self.at_keyword("within") {
            self.bump();
            Some(self.scope()?)
        } else {
            None
        };

        let meta = if self.at_keyword("meta") {
            self.bump();
            Some(self.condition()?)
        } else {
            None
        };

        if self.peek().is_some() {
            return Err(self.unexpected("end of query"));
        }

        Ok(QueryAst {
            pattern,
            within,
            meta,
        })
    }

    fn alternation(&mut self) -> Result<Alternation> {
        let start = self.start();
        let mut branches = vec![self.sequence()?];
        while self.eat(TokenKind::Pipe).is_some() {
            branches.push(self.sequence()?);
        }
        Ok(Alternation {
            branches,
            span: start..self.last_end,
        })
    }

    fn at_element(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(
                TokenKind::Caret
                    | TokenKind::BracketOpen
                    | TokenKind::Dot
                    | TokenKind::Str
                    | TokenKind::UnterminatedStr
                    | TokenKind::ParenOpen
                    | TokenKind::AngleOpen
            )
        )
    }

    fn sequence(&mut self) -> Result<Sequence> {
        let start = self.start();
        let mut elements = Vec::new();
        while self.at_element() {
            elements.push(self.element()?);
        }
        if elements.is_empty() {
            return match self.peek() {
                Some(t) if !matches!(t.kind, TokenKind::Pipe | TokenKind::ParenClose) => {
                    Err(self.unexpected(ELEMENT))
                }
                _ => Err(CompileError::EmptyPattern {
                    span: start..start,
                }),
            };
        }
        Ok(Sequence {
            elements,
            span: start..self.last_end,
        })
    }

    fn element(&mut self) -> Result<Element> {
        let start = self.start();
        let focus = self.eat(TokenKind::Caret).is_some();
        let atom = self.atom()?;
        let quantifier = self.quantifier()?;
        Ok(Element {
            focus,
            atom,
            quantifier,
            span: start..self.last_end,
        })
    }

    fn atom(&mut self) -> Result<Atom> {
        match self.peek_kind() {
            Some(TokenKind::BracketOpen) => {
                self.bump();
                if self.eat(TokenKind::BracketClose).is_some() {
                    return Ok(Atom::Token(None));
                }
                let cond = self.condition()?;
                self.expect(TokenKind::BracketClose, "`]`")?;
                Ok(Atom::Token(Some(cond)))
            }
            Some(TokenKind::Dot) => {
                self.bump();
                Ok(Atom::Token(None))
            }
            Some(TokenKind::Str) => {
                let start = self.start();
                let (value, value_span) = self.string_value()?;
                Ok(Atom::Token(Some(Condition::new(
                    ConditionKind::Compare {
                        attr: "orth".to_owned(),
                        attr_span: value_span.clone(),
                        negated: false,
                        value,
                        value_span,
                    },
                    start..self.last_end,
                ))))
            }
            Some(TokenKind::ParenOpen) => {
                self.bump();
                let inner = self.alternation()?;
                self.expect(TokenKind::ParenClose, "`)`")?;
                Ok(Atom::Group(inner))
            }
            Some(TokenKind::AngleOpen) => {
                self.bump();
                let cond = self.condition()?;
                self.expect(TokenKind::AngleClose, "`>`")?;
                Ok(Atom::Phrase(cond))
            }
            _ => Err(self.unexpected(ELEMENT)),
        }
    }

    fn quantifier(&mut self) -> Result<Option<Quantifier>> {
        let start = self.start();
        let (min, max) = match self.peek_kind() {
            Some(TokenKind::Star) => {
                self.bump();
                (0, None)
            }
            Some(TokenKind::Plus) => {
                self.bump();
                (1, None)
            }
            Some(TokenKind::Question) => {
                self.bump();
                (0, Some(1))
            }
            Some(TokenKind::BraceOpen) => {
                self.bump();
                let bounds = if self.eat(TokenKind::Comma).is_some() {
                    (0, Some(self.number()?))
                } else {
                    let min = self.number()?;
                    if self.eat(TokenKind::Comma).is_some() {
                        if self.at(TokenKind::Number) {
                            (min, Some(self.number()?))
                        } else {
                            (min, None)
                        }
                    } else {
                        (min, Some(min))
                    }
                };
                self.expect(TokenKind::BraceClose, "`}`")?;
                bounds
            }
            _ => return Ok(None),
        };
        Ok(Some(Quantifier {
            min,
            max,
            span: start..self.last_end,
        }))
    }

    fn number(&mut self) -> Result<usize> {
        let token = self.expect(TokenKind::Number, "number")?;
        let text = token_text(self.source, &token);
        text.parse().map_err(|_| CompileError::NumberTooLarge {
            text: text.to_owned(),
            span: token.span.clone(),
        })
    }

    fn scope(&mut self) -> Result<Scope> {
        if self.eat(TokenKind::AngleOpen).is_some() {
            let cond = self.condition()?;
            self.expect(TokenKind::AngleClose, "`>`")?;
            return Ok(Scope::Phrase(cond));
        }
        let token = self.expect(TokenKind::Ident, "sub-document kind or `<`")?;
        Ok(Scope::Subdocument {
            kind: token_text(self.source, &token).to_owned(),
            span: token.span,
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Conditions
    // ─────────────────────────────────────────────────────────────────────

    fn condition(&mut self) -> Result<Condition> {
        let start = self.start();
        let mut left = self.conjunction()?;
        while self.eat(TokenKind::Pipe).is_some() {
            let right = self.conjunction()?;
            left = Condition::new(
                ConditionKind::Or(Box::new(left), Box::new(right)),
                start..self.last_end,
            );
        }
        Ok(left)
    }

    fn conjunction(&mut self) -> Result<Condition> {
        let start = self.start();
        let mut left = self.unary()?;
        while self.eat(TokenKind::Amp).is_some() {
            let right = self.unary()?;
            left = Condition::new(
                ConditionKind::And(Box::new(left), Box::new(right)),
                start..self.last_end,
            );
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Condition> {
        let start = self.start();
        if self.eat(TokenKind::Negation).is_some() {
            let inner = self.unary()?;
            return Ok(Condition::new(
                ConditionKind::Not(Box::new(inner)),
                start..self.last_end,
            ));
        }
        if self.eat(TokenKind::ParenOpen).is_some() {
            let inner = self.condition()?;
            self.expect(TokenKind::ParenClose, "`)`")?;
            return Ok(inner);
        }
        self.term()
    }

    fn term(&mut self) -> Result<Condition> {
        let start = self.start();
        if !self.at(TokenKind::Ident) {
            return Err(self.unexpected("condition"));
        }

        if self.at_keyword("true") || self.at_keyword("false") {
            let value = self.at_keyword("true");
            self.bump();
            return Ok(Condition::new(ConditionKind::Bool(value), start..self.last_end));
        }

        if self.at_keyword("all") && self.peek_nth_kind(1) == Some(TokenKind::Ident) {
            self.bump();
            let inner = self.term()?;
            return match inner.kind {
                ConditionKind::Head { head, cond, .. } => Ok(Condition::new(
                    ConditionKind::Head {
                        head,
                        all: true,
                        cond,
                    },
                    start..self.last_end,
                )),
                _ => Err(CompileError::MisplacedAll {
                    span: start..self.last_end,
                }),
            };
        }

        let head = match self.peek().map(|t| token_text(self.source, t)) {
            Some("synh") => Some(Head::Syntactic),
            Some("semh") => Some(Head::Semantic),
            Some("head") => Some(Head::Same),
            _ => None,
        };
        if let Some(head) = head
            && self.peek_nth_kind(1) == Some(TokenKind::Equals)
            && self.peek_nth_kind(2) == Some(TokenKind::BracketOpen)
        {
            self.bump();
            self.bump();
            self.bump();
            let cond = self.condition()?;
            self.expect(TokenKind::BracketClose, "`]`")?;
            return Ok(Condition::new(
                ConditionKind::Head {
                    head,
                    all: false,
                    cond: Box::new(cond),
                },
                start..self.last_end,
            ));
        }

        let attr = self.bump();
        let negated = match self.peek_kind() {
            Some(TokenKind::Equals) => false,
            Some(TokenKind::NotEquals) => true,
            _ => return Err(self.unexpected("`=` or `!=`")),
        };
        self.bump();

        let value_start = self.start();
        let value = match self.peek_kind() {
            Some(TokenKind::Str) => self.string_value()?.0,
            Some(TokenKind::Ident | TokenKind::Number) => {
                let token = self.bump();
                ValueLit::Literal(token_text(self.source, &token).to_owned())
            }
            Some(TokenKind::Dollar) => {
                self.bump();
                let name = self.expect(TokenKind::Ident, "variable name")?;
                ValueLit::Variable(token_text(self.source, &name).to_owned())
            }
            _ => return Err(self.unexpected("value")),
        };

        Ok(Condition::new(
            ConditionKind::Compare {
                attr: token_text(self.source, &attr).to_owned(),
                attr_span: attr.span,
                negated,
                value,
                value_span: value_start..self.last_end,
            },
            start..self.last_end,
        ))
    }

    /// `STRING "/i"?` as a regex value, with the span of the string.
    fn string_value(&mut self) -> Result<(ValueLit, Span)> {
        let token = self.expect(TokenKind::Str, "string")?;
        let text = token_text(self.source, &token);
        let pattern = text[1..text.len() - 1].replace("\\\"", "\"");
        let case_insensitive = self.eat(TokenKind::FlagI).is_some();
        Ok((
            ValueLit::Regex {
                pattern,
                case_insensitive,
            },
            token.span.start..self.last_end,
        ))
    }
}
