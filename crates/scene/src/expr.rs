//! Surface equations.
//!
//! Grammar (lowest precedence first):
//!
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary)*
//! unary   := '-' unary | '+' unary | power
//! power   := atom ('^' exponent)?
//! atom    := number | 'x' | 'y' | 'z' | parameter | '(' sum ')'
//! ```
//!
//! Exponents are non-negative integers and may themselves be `(n)` or `n^m`.
//!
//! Parameters are bound to their numeric values while parsing, so a parsed
//! [`Expr`] only depends on the point it is evaluated at.

use std::collections::BTreeMap;
use std::fmt;

/// Deepest parenthesis / sign / exponent nesting the parser descends into.
pub const MAX_NESTING: usize = 256;

/// Deepest expression tree accepted, counting every operator node.
pub const MAX_TREE_DEPTH: usize = 1024;

/// Failure to parse a surface equation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct ExprError {
    pub offset: usize,
    pub message: String,
}

impl ExprError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Coordinate axis referenced by a surface equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Parsed surface equation `f(x, y, z)`; the surface is its zero set.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    Var(Axis),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, u32),
}

impl Expr {
    /// Parse `source`, resolving identifiers other than `x`, `y`, `z` from `parameters`.
    pub fn parse(source: &str, parameters: &BTreeMap<String, f64>) -> Result<Self, ExprError> {
        let tokens = tokenize(source)?;
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            parameters,
            end: source.len(),
            nesting: 0,
        };
        let (expr, _) = parser.sum()?;
        match parser.peek() {
            None => Ok(expr),
            Some(tok) => Err(ExprError::new(tok.offset, "unexpected trailing input")),
        }
    }

    /// Evaluate at a point.
    pub fn eval(&self, p: [f64; 3]) -> f64 {
        match self {
            Expr::Const(c) => *c,
            Expr::Var(Axis::X) => p[0],
            Expr::Var(Axis::Y) => p[1],
            Expr::Var(Axis::Z) => p[2],
            Expr::Neg(e) => -e.eval(p),
            Expr::Add(a, b) => a.eval(p) + b.eval(p),
            Expr::Sub(a, b) => a.eval(p) - b.eval(p),
            Expr::Mul(a, b) => a.eval(p) * b.eval(p),
            Expr::Div(a, b) => a.eval(p) / b.eval(p),
            Expr::Pow(base, n) => base.eval(p).powi(*n as i32),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(c) => write!(f, "{c}"),
            Expr::Var(Axis::X) => f.write_str("x"),
            Expr::Var(Axis::Y) => f.write_str("y"),
            Expr::Var(Axis::Z) => f.write_str("z"),
            Expr::Neg(e) => write!(f, "(-{e})"),
            Expr::Add(a, b) => write!(f, "({a}+{b})"),
            Expr::Sub(a, b) => write!(f, "({a}-{b})"),
            Expr::Mul(a, b) => write!(f, "({a}*{b})"),
            Expr::Div(a, b) => write!(f, "({a}/{b})"),
            Expr::Pow(a, n) => write!(f, "({a}^{n})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn tokenize(source: &str) -> Result<Vec<Token>, ExprError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let kind = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'^' => TokenKind::Caret,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'0'..=b'9' | b'.' => {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                // exponent suffix, e.g. 1e-3
                if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                    let mut j = i + 1;
                    if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j].is_ascii_digit() {
                        while j < bytes.len() && bytes[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let text = &source[start..i];
                let value: f64 = text
                    .parse()
                    .map_err(|_| ExprError::new(start, format!("invalid number '{text}'")))?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    offset: start,
                });
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(source[start..i].to_string()),
                    offset: start,
                });
                continue;
            }
            _ => {
                let ch = source[start..].chars().next().unwrap_or('?');
                return Err(ExprError::new(start, format!("unexpected character '{ch}'")));
            }
        };
        tokens.push(Token {
            kind,
            offset: start,
        });
        i += 1;
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    parameters: &'a BTreeMap<String, f64>,
    end: usize,
    nesting: usize,
}

/// An expression with the depth of its tree.
type Parsed = (Expr, usize);

fn too_deep(offset: usize) -> ExprError {
    ExprError::new(offset, "expression nested too deeply")
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|t| &t.kind) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn offset(&self) -> usize {
        self.peek().map_or(self.end, |t| t.offset)
    }

    /// Run `f` one nesting level deeper, failing past [`MAX_NESTING`].
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ExprError>,
    ) -> Result<T, ExprError> {
        if self.nesting >= MAX_NESTING {
            return Err(too_deep(self.offset()));
        }
        self.nesting += 1;
        let result = f(self);
        self.nesting -= 1;
        result
    }

    /// Combine two operands, failing past [`MAX_TREE_DEPTH`].
    fn binary(
        offset: usize,
        (lhs, lhs_depth): Parsed,
        (rhs, rhs_depth): Parsed,
        op: fn(Box<Expr>, Box<Expr>) -> Expr,
    ) -> Result<Parsed, ExprError> {
        let depth = lhs_depth.max(rhs_depth) + 1;
        if depth > MAX_TREE_DEPTH {
            return Err(too_deep(offset));
        }
        Ok((op(Box::new(lhs), Box::new(rhs)), depth))
    }

    fn sum(&mut self) -> Result<Parsed, ExprError> {
        let mut lhs = self.product()?;
        loop {
            let offset = self.offset();
            let op: fn(Box<Expr>, Box<Expr>) -> Expr = if self.eat(&TokenKind::Plus) {
                Expr::Add
            } else if self.eat(&TokenKind::Minus) {
                Expr::Sub
            } else {
                return Ok(lhs);
            };
            let rhs = self.product()?;
            lhs = Self::binary(offset, lhs, rhs, op)?;
        }
    }

    fn product(&mut self) -> Result<Parsed, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            let offset = self.offset();
            let op: fn(Box<Expr>, Box<Expr>) -> Expr = if self.eat(&TokenKind::Star) {
                Expr::Mul
            } else if self.eat(&TokenKind::Slash) {
                Expr::Div
            } else {
                return Ok(lhs);
            };
            let rhs = self.unary()?;
            lhs = Self::binary(offset, lhs, rhs, op)?;
        }
    }

    fn unary(&mut self) -> Result<Parsed, ExprError> {
        if self.eat(&TokenKind::Minus) {
            let (inner, depth) = self.nested(Self::unary)?;
            return Ok((Expr::Neg(Box::new(inner)), depth + 1));
        }
        if self.eat(&TokenKind::Plus) {
            return self.nested(Self::unary);
        }
        self.power()
    }

    fn power(&mut self) -> Result<Parsed, ExprError> {
        let (base, depth) = self.atom()?;
        if self.eat(&TokenKind::Caret) {
            let exponent = self.exponent()?;
            return Ok((Expr::Pow(Box::new(base), exponent), depth + 1));
        }
        Ok((base, depth))
    }

    fn exponent(&mut self) -> Result<u32, ExprError> {
        self.nested(Self::exponent_inner)
    }

    fn exponent_inner(&mut self) -> Result<u32, ExprError> {
        let offset = self.offset();
        let value = if self.eat(&TokenKind::LParen) {
            let inner = self.exponent()?;
            if !self.eat(&TokenKind::RParen) {
                return Err(ExprError::new(self.offset(), "expected ')'"));
            }
            inner
        } else {
            match self.next().map(|t| &t.kind) {
                Some(TokenKind::Number(n)) if n.fract() == 0.0 && *n >= 0.0 && *n <= 64.0 => {
                    *n as u32
                }
                _ => {
                    return Err(ExprError::new(
                        offset,
                        "exponent must be a non-negative integer",
                    ))
                }
            }
        };

        if self.eat(&TokenKind::Caret) {
            let rhs = self.exponent()?;
            return value
                .checked_pow(rhs)
                .filter(|v| *v <= 64)
                .ok_or_else(|| ExprError::new(offset, "exponent too large"));
        }
        Ok(value)
    }

    fn atom(&mut self) -> Result<Parsed, ExprError> {
        let offset = self.offset();
        match self.next().map(|t| &t.kind) {
            Some(TokenKind::Number(n)) => Ok((Expr::Const(*n), 0)),
            Some(TokenKind::Ident(name)) => {
                let leaf = match name.as_str() {
                    "x" => Expr::Var(Axis::X),
                    "y" => Expr::Var(Axis::Y),
                    "z" => Expr::Var(Axis::Z),
                    other => self.parameters.get(other).map(|v| Expr::Const(*v)).ok_or_else(
                        || ExprError::new(offset, format!("unknown identifier '{other}'")),
                    )?,
                };
                Ok((leaf, 0))
            }
            Some(TokenKind::LParen) => {
                let inner = self.nested(Self::sum)?;
                if !self.eat(&TokenKind::RParen) {
                    return Err(ExprError::new(self.offset(), "expected ')'"));
                }
                Ok(inner)
            }
            Some(_) => Err(ExprError::new(offset, "expected a number, variable or '('")),
            None => Err(ExprError::new(offset, "unexpected end of equation")),
        }
    }
}
