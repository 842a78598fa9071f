//! Parser for Wabbit
//!
//! Recursive descent parser with binding-power parsing for expressions.
//! Tokens are pulled from the lexer one at a time; the parser only ever
//! looks at the current token and never backtracks.

use log::debug;

use crate::frontend::ast::*;
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result};

/// The parser
pub struct Parser {
    lexer: Lexer,
    current: Token,
}

impl Parser {
    /// Create a new parser from a lexer, reading the first token
    pub fn new(mut lexer: Lexer) -> Result<Self> {
        let current = Self::pull(&mut lexer, 1)?;
        Ok(Self { lexer, current })
    }

    // ==================== Helper Methods ====================

    fn pull(lexer: &mut Lexer, line: usize) -> Result<Token> {
        lexer.next().unwrap_or_else(|| Ok(Token::eof(line)))
    }

    fn current_kind(&self) -> TokenKind {
        self.current.kind
    }

    fn advance(&mut self) -> Result<Token> {
        if self.is_at_end() {
            return Ok(self.current.clone());
        }
        let next = Self::pull(&mut self.lexer, self.current.line)?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    fn unexpected(&self, expected: impl Into<String>) -> Error {
        Error::UnexpectedToken {
            expected: expected.into(),
            got: self.current.to_string(),
            line: self.current.line,
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token> {
        if self.check(expected) {
            self.advance()
        } else {
            Err(self.unexpected(expected.describe()))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> Result<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // ==================== Parsing Methods ====================

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut stmts = Vec::new();

        while !self.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }

        debug!("parsed {} top-level statements", stmts.len());
        Ok(Program::new(Statements::new(stmts)))
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        if !self.check(TokenKind::Name) {
            return Err(self.unexpected("NAME"));
        }
        let token = self.advance()?;
        Ok(Ident::new(token.text, token.line))
    }

    fn parse_block(&mut self) -> Result<Statements> {
        self.expect(TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }

        self.expect(TokenKind::RBrace)?;
        Ok(Statements::new(stmts))
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        match self.current_kind() {
            TokenKind::Print => self.parse_print_stmt(),
            TokenKind::Var => self.parse_var_def(),
            TokenKind::Const => self.parse_const_def(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Break => {
                let line = self.advance()?.line;
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::Break { line })
            }
            TokenKind::Continue => {
                let line = self.advance()?.line;
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::Continue { line })
            }
            _ => self.parse_assign_or_expr_stmt(),
        }
    }

    /// `NAME = expr;` or `expr;`. The target is known to be a bare name only
    /// after it has been parsed as an expression.
    fn parse_assign_or_expr_stmt(&mut self) -> Result<Stmt> {
        let expr = self.parse_expr()?;

        if self.check(TokenKind::Assign) {
            let Expr::Name(target) = expr else {
                return Err(self.unexpected("';'"));
            };
            let line = self.advance()?.line;
            let value = self.parse_expr()?;
            self.expect(TokenKind::Semi)?;
            return Ok(Stmt::Assign {
                target,
                value,
                line,
            });
        }

        self.expect(TokenKind::Semi)?;
        Ok(Stmt::Expr(expr))
    }

    fn parse_print_stmt(&mut self) -> Result<Stmt> {
        let line = self.expect(TokenKind::Print)?.line;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::Print { expr, line })
    }

    fn parse_var_def(&mut self) -> Result<Stmt> {
        let line = self.expect(TokenKind::Var)?.line;
        let name = self.parse_ident()?;

        let ty = if self.check(TokenKind::Name) {
            Some(self.parse_ident()?)
        } else {
            None
        };

        let value = if self.consume(TokenKind::Assign)? {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let stmt = Stmt::var_def(name, ty, value, line)?;
        self.expect(TokenKind::Semi)?;
        Ok(stmt)
    }

    fn parse_const_def(&mut self) -> Result<Stmt> {
        let line = self.expect(TokenKind::Const)?.line;
        let name = self.parse_ident()?;

        let ty = if self.check(TokenKind::Name) {
            Some(self.parse_ident()?)
        } else {
            None
        };

        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;

        let stmt = Stmt::const_def(name, ty, value, line)?;
        self.expect(TokenKind::Semi)?;
        Ok(stmt)
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt> {
        let line = self.expect(TokenKind::If)?.line;
        let test = self.parse_expr()?;
        let then_block = self.parse_block()?;

        let else_block = if self.consume(TokenKind::Else)? {
            self.parse_block()?
        } else {
            Statements::default()
        };

        Ok(Stmt::If {
            test,
            then_block,
            else_block,
            line,
        })
    }

    fn parse_while_stmt(&mut self) -> Result<Stmt> {
        let line = self.expect(TokenKind::While)?.line;
        let test = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::While { test, body, line })
    }

    // ==================== Expression Parsing ====================

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_expr_bp(0)
    }

    /// Parse expression with binding power. Every binary operator is
    /// left-associative, so the right operand is parsed one tier higher.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let Some(bp) = self.current_kind().binary_precedence() else {
                break;
            };

            if bp < min_bp {
                break;
            }

            let op_token = self.advance()?;
            let op = BinOp::from_token(op_token.kind).ok_or_else(|| Error::UnexpectedToken {
                expected: "binary operator".to_string(),
                got: op_token.to_string(),
                line: op_token.line,
            })?;

            let right = self.parse_expr_bp(bp + 1)?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line: op_token.line,
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if let Some(op) = UnaryOp::from_token(self.current_kind()) {
            let line = self.advance()?.line;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                line,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let expr = match self.current_kind() {
            // Literals
            TokenKind::Integer => {
                let token = self.advance()?;
                let value = token.text.parse::<i64>().map_err(|_| Error::InvalidLiteral {
                    kind: "integer",
                    text: token.text.clone(),
                    line: token.line,
                })?;
                Expr::Literal(Literal::Int(value, token.line))
            }
            TokenKind::Float => {
                let token = self.advance()?;
                let value = token.text.parse::<f64>().map_err(|_| Error::InvalidLiteral {
                    kind: "float",
                    text: token.text.clone(),
                    line: token.line,
                })?;
                Expr::Literal(Literal::Float(value, token.line))
            }
            TokenKind::Char => {
                let token = self.advance()?;
                let value = decode_char(&token.text).ok_or_else(|| Error::InvalidLiteral {
                    kind: "character",
                    text: token.text.clone(),
                    line: token.line,
                })?;
                Expr::Literal(Literal::Char(value, token.line))
            }
            TokenKind::True => Expr::Literal(Literal::Bool(true, self.advance()?.line)),
            TokenKind::False => Expr::Literal(Literal::Bool(false, self.advance()?.line)),

            TokenKind::Name => Expr::Name(self.parse_ident()?),

            // Grouping
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                inner
            }

            // Compound expression
            TokenKind::LBrace => {
                let line = self.current.line;
                let body = self.parse_block()?;
                Expr::Block { body, line }
            }

            _ => return Err(self.unexpected("expression")),
        };

        Ok(expr)
    }
}

/// Convert the raw text of a character token (quotes included) to its value
fn decode_char(text: &str) -> Option<char> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;

    let Some(escape) = inner.strip_prefix('\\') else {
        let mut chars = inner.chars();
        let c = chars.next()?;
        return chars.next().is_none().then_some(c);
    };

    match escape {
        "n" => Some('\n'),
        "t" => Some('\t'),
        "r" => Some('\r'),
        "0" => Some('\0'),
        "\\" => Some('\\'),
        "'" => Some('\''),
        _ => {
            let hex = escape.strip_prefix('x')?;
            if hex.is_empty() || hex.len() > 2 {
                return None;
            }
            u8::from_str_radix(hex, 16).ok().map(char::from)
        }
    }
}
