//! Recursive-descent parser producing [`Expr`].
//!
//! Precedence, loosest first: `or`, `and`, `not`, comparisons, `+ -`,
//! `* / // %`, unary `+ -`, postfix (`.name`, `[index]`, call), atoms.

use super::ast::{BinaryOp, BoolOp, CmpOp, Expr, Literal, UnaryOp};
use super::error::ParseError;
use super::lexer::{Token, TokenKind, tokenize};

/// Nesting bound so pathological input fails instead of overflowing the stack.
pub const MAX_DEPTH: usize = 64;

pub fn parse(src: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expression()?;
    let tail = parser.peek();
    if tail.kind != TokenKind::Eof {
        return Err(ParseError::new(
            format!("unexpected {}", tail.kind.describe()),
            tail.offset,
        ));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // `tokenize` always terminates the stream with `Eof`.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn peek_next_kind(&self) -> &TokenKind {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), ParseError> {
        if self.eat(&kind) {
            return Ok(());
        }
        let found = self.peek();
        Err(ParseError::new(
            format!("expected {what}, found {}", found.kind.describe()),
            found.offset,
        ))
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::new(
                "expression nested too deeply",
                self.peek().offset,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let expr = self.or_expr();
        self.leave();
        expr
    }

    fn or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.and_expr()?;
        while self.eat(&TokenKind::Or) {
            let right = self.and_expr()?;
            left = Expr::Bool {
                op: BoolOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.not_expr()?;
        while self.eat(&TokenKind::And) {
            let right = self.not_expr()?;
            left = Expr::Bool {
                op: BoolOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::Not) {
            self.enter()?;
            let operand = self.not_expr();
            self.leave();
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand?),
            });
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.sum()?;
        let mut rest = Vec::new();
        while let Some(op) = self.comparison_op() {
            rest.push((op, self.sum()?));
        }
        if rest.is_empty() {
            Ok(left)
        } else {
            Ok(Expr::Compare {
                left: Box::new(left),
                rest,
            })
        }
    }

    fn comparison_op(&mut self) -> Option<CmpOp> {
        let op = match self.peek_kind() {
            TokenKind::EqEq => CmpOp::Eq,
            TokenKind::NotEq => CmpOp::NotEq,
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::Le => CmpOp::Le,
            TokenKind::Gt => CmpOp::Gt,
            TokenKind::Ge => CmpOp::Ge,
            TokenKind::In => CmpOp::In,
            TokenKind::Not if *self.peek_next_kind() == TokenKind::In => CmpOp::NotIn,
            _ => return None,
        };
        if op == CmpOp::NotIn {
            self.advance();
        }
        self.advance();
        Some(op)
    }

    fn sum(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::SlashSlash => BinaryOp::FloorDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            _ => return self.postfix(),
        };
        self.advance();
        self.enter()?;
        let operand = self.unary();
        self.leave();
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand?),
        })
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.ident("attribute name")?;
                    expr = Expr::Attr {
                        target: Box::new(expr),
                        name,
                    };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.expression()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = Expr::Index {
                        target: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.sequence(TokenKind::RParen, "')'")?;
                    expr = Expr::Call {
                        func: Box::new(expr),
                        args,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance();
        let expr = match token.kind {
            TokenKind::Int(v) => Expr::Literal(Literal::Int(v)),
            TokenKind::Float(v) => Expr::Literal(Literal::Float(v)),
            TokenKind::Str(s) => Expr::Literal(Literal::Str(s)),
            TokenKind::True => Expr::Literal(Literal::Bool(true)),
            TokenKind::False => Expr::Literal(Literal::Bool(false)),
            TokenKind::None => Expr::Literal(Literal::None),
            TokenKind::Ident(first) => {
                let mut segments = vec![first];
                while *self.peek_kind() == TokenKind::Dot
                    && matches!(self.peek_next_kind(), TokenKind::Ident(_))
                {
                    self.advance();
                    segments.push(self.ident("attribute name")?);
                }
                Expr::Path(segments)
            }
            TokenKind::LParen => {
                let inner = self.expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                inner
            }
            TokenKind::LBracket => {
                self.enter()?;
                let items = self.sequence(TokenKind::RBracket, "']'");
                self.leave();
                Expr::List(items?)
            }
            other => {
                return Err(ParseError::new(
                    format!("unexpected {}", other.describe()),
                    token.offset,
                ));
            }
        };
        Ok(expr)
    }

    /// Comma-separated expressions up to `close`, allowing a trailing comma.
    fn sequence(&mut self, close: TokenKind, what: &str) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.eat(&close) {
                return Ok(items);
            }
            items.push(self.expression()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(close, what)?;
                return Ok(items);
            }
        }
    }

    fn ident(&mut self, what: &str) -> Result<String, ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Ident(name) => Ok(name),
            other => Err(ParseError::new(
                format!("expected {what}, found {}", other.describe()),
                token.offset,
            )),
        }
    }
}
