//! Tree-walking interpreter for Wabbit
//!
//! Runs a checked program against a fresh root scope and writes everything
//! `print` produces to the supplied writer. The checker has already ruled
//! out ill-typed programs; the runtime errors here exist for the cases it
//! cannot see (division by zero, overflow) and to surface any disagreement
//! between the two passes loudly.

use log::debug;
use std::io::Write;

use crate::frontend::ast::*;
use crate::runtime::environment::{BindingKind, Environment};
use crate::runtime::value::Value;
use crate::types::Type;
use crate::utils::{Error, Result};

/// How a statement finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Normal,
    Break,
    Continue,
}

/// The interpreter
pub struct Interpreter<W: Write> {
    env: Environment,
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self {
            env: Environment::new(),
            out,
        }
    }

    /// Run a program in a fresh root scope
    pub fn run(&mut self, program: &Program) -> Result<()> {
        self.env = Environment::new();
        debug!("interpreting {} top-level statements", program.body.stmts.len());

        self.exec_statements(&program.body)?;
        self.out.flush()?;
        Ok(())
    }

    /// Give back the output sink
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run statements in the current scope, stopping at break/continue
    fn exec_statements(&mut self, stmts: &Statements) -> Result<Flow> {
        for stmt in &stmts.stmts {
            let flow = self.exec_stmt(stmt)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Run statements in a child scope that is dropped however they finish
    fn exec_block(&mut self, stmts: &Statements) -> Result<Flow> {
        self.env.enter_scope();
        let flow = self.exec_statements(stmts);
        self.env.exit_scope();
        flow
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::ConstDef { name, value, .. } => {
                let value = self.eval(value)?;
                self.env.define(&name.name, BindingKind::Const, value);
            }
            Stmt::VarDef {
                name, ty, value, ..
            } => {
                let value = match (value, ty) {
                    (Some(expr), _) => self.eval(expr)?,
                    (None, Some(ty)) => {
                        let resolved = Type::from_name(&ty.name).ok_or_else(|| Error::UnknownType {
                            name: ty.name.clone(),
                            line: ty.line,
                        })?;
                        Value::zero(resolved)
                    }
                    (None, None) => {
                        return Err(Error::MissingTypeOrValue {
                            name: name.name.clone(),
                            line: name.line,
                        })
                    }
                };
                self.env.define(&name.name, BindingKind::Var, value);
            }
            Stmt::Assign {
                target,
                value,
                line,
            } => {
                let value = self.eval(value)?;
                self.env.assign(&target.name, value, *line)?;
            }
            Stmt::Print { expr, .. } => {
                let value = self.eval(expr)?;
                match value {
                    Value::Char(_) => write!(self.out, "{}", value)?,
                    _ => writeln!(self.out, "{}", value)?,
                }
            }
            Stmt::If {
                test,
                then_block,
                else_block,
                line,
            } => {
                let branch = if self.eval_condition("if", test, *line)? {
                    then_block
                } else {
                    else_block
                };
                return self.exec_block(branch);
            }
            Stmt::While { test, body, line } => {
                while self.eval_condition("while", test, *line)? {
                    // A fresh scope per iteration
                    if self.exec_block(body)? == Flow::Break {
                        break;
                    }
                }
            }
            Stmt::Break { .. } => return Ok(Flow::Break),
            Stmt::Continue { .. } => return Ok(Flow::Continue),
            Stmt::Expr(expr) => {
                self.eval(expr)?;
            }
        }
        Ok(Flow::Normal)
    }

    fn eval_condition(&mut self, construct: &'static str, test: &Expr, line: usize) -> Result<bool> {
        match self.eval(test)? {
            Value::Bool(b) => Ok(b),
            other => Err(Error::RuntimeTypeMismatch {
                op: construct.to_string(),
                operands: other.ty().to_string(),
                line,
            }),
        }
    }

    /// Evaluate an expression
    fn eval(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(lit) => Ok(match lit {
                Literal::Int(v, _) => Value::Int(*v),
                Literal::Float(v, _) => Value::Float(*v),
                Literal::Bool(v, _) => Value::Bool(*v),
                Literal::Char(c, _) => Value::Char(*c),
            }),
            Expr::Name(ident) => self
                .env
                .lookup(&ident.name)
                .map(|binding| binding.value)
                .ok_or_else(|| Error::UndefinedVariable {
                    name: ident.name.clone(),
                    line: ident.line,
                }),
            Expr::Unary { op, operand, line } => {
                let value = self.eval(operand)?;
                eval_unary(*op, value, *line)
            }
            Expr::Binary {
                op,
                left,
                right,
                line,
            } => {
                // Left to right, both sides always
                let l = self.eval(left)?;
                let r = self.eval(right)?;
                eval_binary(*op, l, r, *line)
            }
            Expr::Block { body, line } => {
                self.env.enter_scope();
                let value = self.eval_block_body(body, *line);
                self.env.exit_scope();
                value
            }
        }
    }

    fn eval_block_body(&mut self, body: &Statements, line: usize) -> Result<Value> {
        let no_value = || Error::NoValue { what: "block", line };

        let Some((last, init)) = body.stmts.split_last() else {
            return Err(no_value());
        };
        for stmt in init {
            if self.exec_stmt(stmt)? != Flow::Normal {
                return Err(no_value());
            }
        }
        match last {
            Stmt::Expr(expr) => self.eval(expr),
            _ => Err(no_value()),
        }
    }
}

fn eval_unary(op: UnaryOp, value: Value, line: usize) -> Result<Value> {
    match (op, value) {
        (UnaryOp::Pos, Value::Int(_) | Value::Float(_)) => Ok(value),
        (UnaryOp::Neg, Value::Int(v)) => v.checked_neg().map(Value::Int).ok_or_else(|| Error::IntegerOverflow {
            op: op.to_string(),
            line,
        }),
        (UnaryOp::Neg, Value::Float(v)) => Ok(Value::Float(-v)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        _ => Err(Error::RuntimeTypeMismatch {
            op: op.to_string(),
            operands: value.ty().to_string(),
            line,
        }),
    }
}

fn eval_binary(op: BinOp, left: Value, right: Value, line: usize) -> Result<Value> {
    use Value::*;

    let overflow = || Error::IntegerOverflow {
        op: op.to_string(),
        line,
    };

    let value = match (op, left, right) {
        // Integer arithmetic, checked; division truncates toward zero
        (BinOp::Add, Int(a), Int(b)) => Int(a.checked_add(b).ok_or_else(overflow)?),
        (BinOp::Sub, Int(a), Int(b)) => Int(a.checked_sub(b).ok_or_else(overflow)?),
        (BinOp::Mul, Int(a), Int(b)) => Int(a.checked_mul(b).ok_or_else(overflow)?),
        (BinOp::Div, Int(_), Int(0)) => return Err(Error::DivisionByZero { line }),
        (BinOp::Div, Int(a), Int(b)) => Int(a.checked_div(b).ok_or_else(overflow)?),

        // Float arithmetic
        (BinOp::Add, Float(a), Float(b)) => Float(a + b),
        (BinOp::Sub, Float(a), Float(b)) => Float(a - b),
        (BinOp::Mul, Float(a), Float(b)) => Float(a * b),
        (BinOp::Div, Float(_), Float(b)) if b == 0.0 => return Err(Error::DivisionByZero { line }),
        (BinOp::Div, Float(a), Float(b)) => Float(a / b),

        // Ordering
        (BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge, Int(a), Int(b)) => Bool(compare(op, a, b)),
        (BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge, Float(a), Float(b)) => Bool(compare(op, a, b)),
        (BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge, Char(a), Char(b)) => Bool(compare(op, a, b)),

        // Equality between values of one type
        (BinOp::Eq, l, r) if l.ty() == r.ty() => Bool(l == r),
        (BinOp::Ne, l, r) if l.ty() == r.ty() => Bool(l != r),

        // Logical
        (BinOp::And, Bool(a), Bool(b)) => Bool(a && b),
        (BinOp::Or, Bool(a), Bool(b)) => Bool(a || b),

        _ => {
            return Err(Error::RuntimeTypeMismatch {
                op: op.to_string(),
                operands: format!("{} and {}", left.ty(), right.ty()),
                line,
            })
        }
    };
    Ok(value)
}

fn compare<T: PartialOrd>(op: BinOp, a: T, b: T) -> bool {
    match op {
        BinOp::Lt => a < b,
        BinOp::Le => a <= b,
        BinOp::Gt => a > b,
        _ => a >= b,
    }
}
