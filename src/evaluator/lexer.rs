//! Tokenizer for normalized formulas.
//!
//! Names are recognized with the evaluator's cached, anchored name regex and
//! resolved to their [`Builtin`] immediately, so no bare identifier ever
//! reaches the parser.

use super::functions::Builtin;
use super::EvalError;
use regex::Regex;
use std::collections::HashMap;

/// Token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Name(Builtin),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    LParen,
    RParen,
}

pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    names: &'a Regex,
    bindings: &'a HashMap<String, Builtin>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(
        input: &'a str,
        names: &'a Regex,
        bindings: &'a HashMap<String, Builtin>,
    ) -> Self {
        Self {
            input,
            pos: 0,
            names,
            bindings,
        }
    }

    pub(crate) fn tokenize(mut self) -> Result<Vec<Token>, EvalError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn rest(&self) -> &'a str {
        let input = self.input;
        &input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, EvalError> {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            return Ok(None);
        };

        if c.is_ascii_digit() || c == '.' {
            return self.read_number().map(Some);
        }

        let (token, width) = match c {
            '+' => (Token::Plus, 1),
            '-' => (Token::Minus, 1),
            '*' if self.peek_byte_at(1) == Some(b'*') => (Token::DoubleStar, 2),
            '*' => (Token::Star, 1),
            '/' if self.peek_byte_at(1) == Some(b'/') => (Token::DoubleSlash, 2),
            '/' => (Token::Slash, 1),
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            _ => return self.read_name().map(Some),
        };
        self.pos += width;
        Ok(Some(token))
    }

    fn read_name(&mut self) -> Result<Token, EvalError> {
        let Some(found) = self.names.find(self.rest()) else {
            return Err(EvalError::UnexpectedCharacter {
                position: self.pos,
                found: self.peek().unwrap_or_default(),
            });
        };
        let name = found.as_str();
        let builtin = self
            .bindings
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnknownName(name.to_string()))?;
        self.pos += found.end();
        Ok(Token::Name(builtin))
    }

    /// Digits with an optional fraction and exponent: `12`, `1.`, `.5`, `2.5e-3`.
    fn read_number(&mut self) -> Result<Token, EvalError> {
        let start = self.pos;
        let input = self.input;
        let bytes = input.as_bytes();

        let int_digits = self.consume_digits();
        let mut is_integer_literal = true;
        let mut frac_digits = 0;
        if bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            frac_digits = self.consume_digits();
            is_integer_literal = false;
        }
        if int_digits + frac_digits == 0 {
            return Err(EvalError::MalformedNumber(
                input[start..self.pos].to_string(),
            ));
        }

        if matches!(bytes.get(self.pos), Some(b'e' | b'E')) {
            let mut lookahead = self.pos + 1;
            if matches!(bytes.get(lookahead), Some(b'+' | b'-')) {
                lookahead += 1;
            }
            if bytes.get(lookahead).is_some_and(u8::is_ascii_digit) {
                self.pos = lookahead;
                self.consume_digits();
                is_integer_literal = false;
            }
        }

        let text = &input[start..self.pos];

        // `007` is not a number; `0`, `00` and `0.7` are.
        if is_integer_literal && text.starts_with('0') && text.bytes().any(|b| b != b'0') {
            return Err(EvalError::MalformedNumber(text.to_string()));
        }

        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| EvalError::MalformedNumber(text.to_string()))
    }

    fn consume_digits(&mut self) -> usize {
        let digits = self
            .rest()
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        self.pos += digits;
        digits
    }
}
