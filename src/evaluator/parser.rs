//! Recursive-descent parser and tree evaluator.
//!
//! Left-associative chains (`1+2+3`, `8/2*4`) are stored flat rather than as
//! nested binary nodes, so tree depth only grows with parentheses, signs,
//! calls and powers. Those all pass through [`Parser::parse_unary`], which
//! enforces [`MAX_DEPTH`]; evaluation and drop are then bounded too.

use super::functions::{Builtin, MathFunction};
use super::lexer::Token;
use super::EvalError;

/// Deepest nesting of parentheses, signs and powers accepted.
pub(crate) const MAX_DEPTH: usize = 256;

/// Operators of a left-associative chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
}

/// Parsed formula.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Call(MathFunction, Box<Expr>),
    Power(Box<Expr>, Box<Expr>),
    Chain {
        head: Box<Expr>,
        tail: Vec<(BinaryOp, Expr)>,
    },
}

/// Parse a complete token stream. Trailing tokens are an error.
pub(crate) fn parse(tokens: &[Token]) -> Result<Expr, EvalError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_additive()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(unexpected(token)),
    }
}

fn unexpected(token: Token) -> EvalError {
    EvalError::UnexpectedToken(format!("{token:?}"))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), EvalError> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(unexpected(token)),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, EvalError> {
        let head = self.parse_multiplicative()?;
        let mut tail = Vec::new();

        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            tail.push((op, self.parse_multiplicative()?));
        }

        Ok(chain(head, tail))
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, EvalError> {
        let head = self.parse_unary()?;
        let mut tail = Vec::new();

        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::DoubleSlash) => BinaryOp::FloorDiv,
                _ => break,
            };
            self.advance();
            tail.push((op, self.parse_unary()?));
        }

        Ok(chain(head, tail))
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let result = self.parse_unary_inner();
        self.depth -= 1;
        result
    }

    fn parse_unary_inner(&mut self) -> Result<Expr, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Some(Token::Plus) => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    /// `**` is right-associative and binds tighter than a sign on its left
    /// but not on its right: `-2**2` is `-(2**2)`, `2**-1` is `2**(-1)`.
    fn parse_power(&mut self) -> Result<Expr, EvalError> {
        let base = self.parse_primary()?;
        if self.peek() == Some(Token::DoubleStar) {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(Expr::Power(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Name(Builtin::Constant(value))) => Ok(Expr::Number(value)),
            Some(Token::Name(Builtin::Function(function))) => {
                self.expect(Token::LParen)?;
                let argument = self.parse_additive()?;
                self.expect(Token::RParen)?;
                Ok(Expr::Call(function, Box::new(argument)))
            }
            Some(Token::LParen) => {
                let inner = self.parse_additive()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(token) => Err(unexpected(token)),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

fn chain(head: Expr, tail: Vec<(BinaryOp, Expr)>) -> Expr {
    if tail.is_empty() {
        head
    } else {
        Expr::Chain {
            head: Box::new(head),
            tail,
        }
    }
}

impl Expr {
    /// Evaluate the tree. Any non-finite intermediate value is an error.
    pub(crate) fn eval(&self) -> Result<f64, EvalError> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Neg(inner) => -inner.eval()?,
            Self::Call(function, argument) => function.apply(argument.eval()?)?,
            Self::Power(base, exponent) => power(base.eval()?, exponent.eval()?)?,
            Self::Chain { head, tail } => {
                let mut acc = head.eval()?;
                for (op, operand) in tail {
                    acc = apply(*op, acc, operand.eval()?)?;
                }
                acc
            }
        };
        finite(value)
    }
}

fn apply(op: BinaryOp, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    let value = match op {
        BinaryOp::Add => lhs + rhs,
        BinaryOp::Sub => lhs - rhs,
        BinaryOp::Mul => lhs * rhs,
        BinaryOp::Div if rhs == 0.0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Div => lhs / rhs,
        BinaryOp::FloorDiv if rhs == 0.0 => return Err(EvalError::DivisionByZero),
        BinaryOp::FloorDiv => (lhs / rhs).floor(),
    };
    finite(value)
}

fn power(base: f64, exponent: f64) -> Result<f64, EvalError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    finite(base.powf(exponent))
}

fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::Overflow)
    }
}
