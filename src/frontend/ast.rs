//! Abstract Syntax Tree definitions for Wabbit
//!
//! Every node records the source line it came from. Nodes are plain value
//! trees: the checker, the interpreter and the printer all read them without
//! mutating anything.

use serde::Serialize;
use std::fmt;

use crate::frontend::token::TokenKind;
use crate::utils::{Error, Result};

/// A complete program
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub body: Statements,
}

impl Program {
    pub fn new(body: Statements) -> Self {
        Self { body }
    }
}

/// Ordered statement sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statements {
    pub stmts: Vec<Stmt>,
}

impl Statements {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    /// const name [type] = literal;
    ConstDef {
        name: Ident,
        ty: Option<Ident>,
        value: Expr,
        line: usize,
    },
    /// var name [type] [= expr];
    VarDef {
        name: Ident,
        ty: Option<Ident>,
        value: Option<Expr>,
        line: usize,
    },
    /// name = expr;
    Assign {
        target: Ident,
        value: Expr,
        line: usize,
    },
    /// print expr;
    Print { expr: Expr, line: usize },
    /// if test { ... } [else { ... }]
    If {
        test: Expr,
        then_block: Statements,
        else_block: Statements,
        line: usize,
    },
    /// while test { ... }
    While {
        test: Expr,
        body: Statements,
        line: usize,
    },
    /// break;
    Break { line: usize },
    /// continue;
    Continue { line: usize },
    /// Expression statement
    Expr(Expr),
}

impl Stmt {
    /// Build a constant definition; the value must be a literal
    pub fn const_def(name: Ident, ty: Option<Ident>, value: Expr, line: usize) -> Result<Stmt> {
        if !value.is_literal() {
            return Err(Error::ConstNotLiteral {
                name: name.name,
                line,
            });
        }
        Ok(Stmt::ConstDef {
            name,
            ty,
            value,
            line,
        })
    }

    /// Build a variable definition; a type, a value or both must be given
    pub fn var_def(name: Ident, ty: Option<Ident>, value: Option<Expr>, line: usize) -> Result<Stmt> {
        if ty.is_none() && value.is_none() {
            return Err(Error::MissingTypeOrValue {
                name: name.name,
                line,
            });
        }
        Ok(Stmt::VarDef {
            name,
            ty,
            value,
            line,
        })
    }

    pub fn line(&self) -> usize {
        match self {
            Stmt::ConstDef { line, .. }
            | Stmt::VarDef { line, .. }
            | Stmt::Assign { line, .. }
            | Stmt::Print { line, .. }
            | Stmt::If { line, .. }
            | Stmt::While { line, .. }
            | Stmt::Break { line }
            | Stmt::Continue { line } => *line,
            Stmt::Expr(expr) => expr.line(),
        }
    }
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// Literal value
    Literal(Literal),
    /// Name lookup
    Name(Ident),
    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        line: usize,
    },
    /// Binary operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        line: usize,
    },
    /// Braced compound expression; its value is that of the last statement
    Block { body: Statements, line: usize },
}

impl Expr {
    pub fn line(&self) -> usize {
        match self {
            Expr::Literal(lit) => lit.line(),
            Expr::Name(ident) => ident.line,
            Expr::Unary { line, .. } | Expr::Binary { line, .. } | Expr::Block { line, .. } => *line,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Literal(_))
    }
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Int(i64, usize),
    Float(f64, usize),
    Bool(bool, usize),
    Char(char, usize),
}

impl Literal {
    pub fn line(&self) -> usize {
        match self {
            Literal::Int(_, l) | Literal::Float(_, l) | Literal::Bool(_, l) | Literal::Char(_, l) => *l,
        }
    }
}

/// Identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub name: String,
    pub line: usize,
}

impl Ident {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    // Logical
    And,
    Or,
}

impl BinOp {
    /// Map an operator token to a binary operator; anything else is rejected
    pub fn from_token(kind: TokenKind) -> Option<BinOp> {
        match kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            TokenKind::Times => Some(BinOp::Mul),
            TokenKind::Divide => Some(BinOp::Div),
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Le => Some(BinOp::Le),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::Ge => Some(BinOp::Ge),
            TokenKind::Eq => Some(BinOp::Eq),
            TokenKind::Ne => Some(BinOp::Ne),
            TokenKind::LAnd => Some(BinOp::And),
            TokenKind::LOr => Some(BinOp::Or),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    /// Precedence tier, higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::Eq | BinOp::Ne => 3,
            BinOp::Add | BinOp::Sub => 4,
            BinOp::Mul | BinOp::Div => 5,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    /// Identity (+)
    Pos,
    /// Negation (-)
    Neg,
    /// Logical not (!)
    Not,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<UnaryOp> {
        match kind {
            TokenKind::Plus => Some(UnaryOp::Pos),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::LNot => Some(UnaryOp::Not),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Expr {
        Expr::Literal(Literal::Int(v, 1))
    }

    #[test]
    fn test_const_requires_literal() {
        let ok = Stmt::const_def(Ident::new("n", 1), None, int(4), 1);
        assert!(ok.is_ok());

        let sum = Expr::Binary {
            op: BinOp::Add,
            left: Box::new(int(1)),
            right: Box::new(int(2)),
            line: 1,
        };
        let err = Stmt::const_def(Ident::new("n", 1), None, sum, 1).unwrap_err();
        assert_eq!(err, Error::ConstNotLiteral { name: "n".into(), line: 1 });
    }

    #[test]
    fn test_var_requires_type_or_value() {
        assert!(Stmt::var_def(Ident::new("x", 2), Some(Ident::new("int", 2)), None, 2).is_ok());
        assert!(Stmt::var_def(Ident::new("x", 2), None, Some(int(1)), 2).is_ok());

        let err = Stmt::var_def(Ident::new("x", 2), None, None, 2).unwrap_err();
        assert_eq!(err, Error::MissingTypeOrValue { name: "x".into(), line: 2 });
    }

    #[test]
    fn test_operator_sets_are_closed() {
        assert_eq!(BinOp::from_token(TokenKind::LAnd), Some(BinOp::And));
        assert_eq!(BinOp::from_token(TokenKind::Assign), None);
        assert_eq!(BinOp::from_token(TokenKind::LNot), None);
        assert_eq!(UnaryOp::from_token(TokenKind::LNot), Some(UnaryOp::Not));
        assert_eq!(UnaryOp::from_token(TokenKind::Times), None);
    }

    #[test]
    fn test_binop_precedence_matches_tokens() {
        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Times,
            TokenKind::Divide,
            TokenKind::Lt,
            TokenKind::Le,
            TokenKind::Gt,
            TokenKind::Ge,
            TokenKind::Eq,
            TokenKind::Ne,
            TokenKind::LAnd,
            TokenKind::LOr,
        ] {
            let op = BinOp::from_token(kind).unwrap();
            assert_eq!(Some(op.precedence()), kind.binary_precedence());
            assert_eq!(format!("'{}'", op), kind.describe());
        }
    }
}
