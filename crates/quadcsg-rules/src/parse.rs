//! Rule text lexer and recursive-descent parser.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! union  := inter (':' inter)*
//! inter  := factor factor*           juxtaposition is intersection
//! factor := ['-'] int                signed surface reference
//!         | '(' union ')'
//!         | '#' int                  complement of a cell
//!         | '#' '(' union ')'        complement of a group
//!         | 'T' | 'F'
//! ```

use crate::error::{Result, RuleError};
use crate::rule::Rule;

/// A token of rule text.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    /// Signed integer.
    Int(i32),
    /// `:`
    Colon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `#`
    Hash,
    /// `T` or `F`.
    Bool(bool),
}

/// A token with the byte offset where it starts.
#[derive(Debug, Clone, Copy)]
struct Spanned {
    token: Token,
    pos: usize,
}

fn tokenize(input: &str) -> Result<Vec<Spanned>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let start = pos;
        let token = match bytes[pos] {
            b if b.is_ascii_whitespace() => {
                pos += 1;
                continue;
            }
            b':' => Token::Colon,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'#' => Token::Hash,
            b'T' => Token::Bool(true),
            b'F' => Token::Bool(false),
            b'-' | b'+' | b'0'..=b'9' => {
                let mut end = pos + 1;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                let text = &input[pos..end];
                let value = text
                    .parse::<i32>()
                    .map_err(|_| RuleError::parse(start, format!("invalid number `{text}`")))?;
                pos = end;
                tokens.push(Spanned {
                    token: Token::Int(value),
                    pos: start,
                });
                continue;
            }
            other => {
                return Err(RuleError::parse(
                    start,
                    format!("unexpected character `{}`", other as char),
                ))
            }
        };
        pos += 1;
        tokens.push(Spanned { token, pos: start });
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|t| t.token)
    }

    /// Byte offset of the current token, or the input length at the end.
    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.peek();
        self.pos += 1;
        t
    }

    fn expect(&mut self, want: Token, what: &str) -> Result<()> {
        let at = self.offset();
        match self.advance() {
            Some(t) if t == want => Ok(()),
            _ => Err(RuleError::parse(at, format!("expected {what}"))),
        }
    }

    fn union(&mut self) -> Result<Rule> {
        let mut rule = self.intersection()?;
        while self.peek() == Some(Token::Colon) {
            self.advance();
            let rhs = self.intersection()?;
            rule = Rule::or(rule, rhs);
        }
        Ok(rule)
    }

    fn intersection(&mut self) -> Result<Rule> {
        let mut rule = self.factor()?;
        while !matches!(self.peek(), None | Some(Token::Colon) | Some(Token::RParen)) {
            let rhs = self.factor()?;
            rule = Rule::and(rule, rhs);
        }
        Ok(rule)
    }

    fn factor(&mut self) -> Result<Rule> {
        let at = self.offset();
        match self.advance() {
            Some(Token::Int(0)) => Err(RuleError::parse(at, "surface 0 is not allowed")),
            Some(Token::Int(i32::MIN)) => Err(RuleError::parse(at, "surface number out of range")),
            Some(Token::Int(n)) => Ok(Rule::surface(n)),
            Some(Token::Bool(v)) => Ok(Rule::Bool(v)),
            Some(Token::LParen) => {
                let inner = self.union()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(inner)
            }
            Some(Token::Hash) => {
                let at = self.offset();
                match self.advance() {
                    Some(Token::Int(n)) if n > 0 => Ok(Rule::CompObj(n)),
                    Some(Token::LParen) => {
                        let inner = self.union()?;
                        self.expect(Token::RParen, "`)`")?;
                        Ok(Rule::complement(inner))
                    }
                    _ => Err(RuleError::parse(
                        at,
                        "expected a cell number or `(` after `#`",
                    )),
                }
            }
            Some(Token::Colon) => Err(RuleError::parse(at, "missing operand before `:`")),
            Some(Token::RParen) => Err(RuleError::parse(at, "unbalanced `)`")),
            None => Err(RuleError::parse(at, "unexpected end of rule")),
        }
    }
}

/// Parse rule text into a tree.
pub fn parse_rule(text: &str) -> Result<Rule> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(RuleError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: text.len(),
    };
    let rule = parser.union()?;
    if parser.pos < parser.tokens.len() {
        return Err(RuleError::parse(parser.offset(), "unbalanced `)`"));
    }
    Ok(rule)
}
