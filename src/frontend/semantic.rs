//! Semantic Analysis for Wabbit
//!
//! Performs:
//! - Symbol table management (scopes, definitions)
//! - Type checking against the static operator tables
//! - Loop control placement (break/continue)
//!
//! The checker never stops at the first problem. Every violation is
//! collected and the whole program is visited before reporting.

use log::debug;
use std::collections::HashMap;

use crate::frontend::ast::*;
use crate::types::{binary_result, unary_result, Type};
use crate::utils::{Error, Result};

// ==================== Symbol Table ====================

/// Unique identifier for a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// Symbol information
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// `None` when the declaration itself failed to type
    pub ty: Option<Type>,
    pub line: usize,
}

/// Kind of symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Const,
    Var,
}

/// A scope containing symbols
#[derive(Debug)]
struct Scope {
    parent: Option<ScopeId>,
    symbols: HashMap<String, Symbol>,
}

/// Symbol table with nested scopes
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl SymbolTable {
    pub fn new() -> Self {
        // Create global scope
        let global = Scope {
            parent: None,
            symbols: HashMap::new(),
        };
        Self {
            scopes: vec![global],
            current: ScopeId(0),
        }
    }

    /// Enter a new scope
    pub fn enter_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(self.current),
            symbols: HashMap::new(),
        });
        self.current = id;
        id
    }

    /// Exit the current scope
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0].parent {
            self.current = parent;
        }
    }

    /// Define a symbol in the current scope
    pub fn define(&mut self, symbol: Symbol) -> Result<()> {
        let scope = &mut self.scopes[self.current.0];
        if scope.symbols.contains_key(&symbol.name) {
            return Err(Error::DuplicateDefinition {
                name: symbol.name,
                line: symbol.line,
            });
        }
        scope.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Look up a symbol, searching from current scope upward
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut scope_id = Some(self.current);
        while let Some(id) = scope_id {
            if let Some(symbol) = self.scopes[id.0].symbols.get(name) {
                return Some(symbol);
            }
            scope_id = self.scopes[id.0].parent;
        }
        None
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Type Checker ====================

/// Static checker for a parsed program
pub struct TypeChecker {
    pub symbols: SymbolTable,
    pub errors: Vec<Error>,
    /// Number of enclosing `while` bodies
    loop_depth: usize,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            errors: Vec::new(),
            loop_depth: 0,
        }
    }

    /// Check a program; all errors found are returned together
    pub fn check(&mut self, program: &Program) -> Result<()> {
        self.check_statements(&program.body);

        debug!("type check finished with {} error(s)", self.errors.len());
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::TypeErrors(std::mem::take(&mut self.errors)))
        }
    }

    fn report(&mut self, error: Error) {
        debug!("type error: {}", error);
        self.errors.push(error);
    }

    /// Check statements in the current scope.
    /// Returns the type of the trailing expression statement, if there is one.
    fn check_statements(&mut self, stmts: &Statements) -> Option<Type> {
        let mut last = None;
        for stmt in &stmts.stmts {
            last = self.check_stmt(stmt);
        }
        last
    }

    /// Check statements in a fresh child scope
    fn check_block(&mut self, stmts: &Statements) -> Option<Type> {
        self.symbols.enter_scope();
        let ty = self.check_statements(stmts);
        self.symbols.exit_scope();
        ty
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Option<Type> {
        match stmt {
            Stmt::ConstDef {
                name,
                ty,
                value,
                line,
            } => {
                self.check_definition(SymbolKind::Const, name, ty.as_ref(), Some(value), *line);
                None
            }
            Stmt::VarDef {
                name,
                ty,
                value,
                line,
            } => {
                self.check_definition(SymbolKind::Var, name, ty.as_ref(), value.as_ref(), *line);
                None
            }
            Stmt::Assign {
                target,
                value,
                line,
            } => {
                let value_ty = self.check_expr(value);
                let (kind, target_ty) = match self.symbols.lookup(&target.name) {
                    Some(symbol) => (symbol.kind, symbol.ty),
                    None => {
                        self.report(Error::UndefinedName {
                            name: target.name.clone(),
                            line: *line,
                        });
                        return None;
                    }
                };
                if kind == SymbolKind::Const {
                    self.report(Error::AssignToConst {
                        name: target.name.clone(),
                        line: *line,
                    });
                } else if let (Some(expected), Some(got)) = (target_ty, value_ty) {
                    if expected != got {
                        self.report(Error::TypeMismatch {
                            name: target.name.clone(),
                            expected: expected.to_string(),
                            got: got.to_string(),
                            line: *line,
                        });
                    }
                }
                None
            }
            Stmt::Print { expr, .. } => {
                self.check_expr(expr);
                None
            }
            Stmt::If {
                test,
                then_block,
                else_block,
                line,
            } => {
                self.check_condition("if", test, *line);
                self.check_block(then_block);
                self.check_block(else_block);
                None
            }
            Stmt::While { test, body, line } => {
                self.check_condition("while", test, *line);
                self.loop_depth += 1;
                self.check_block(body);
                self.loop_depth -= 1;
                None
            }
            Stmt::Break { line } => {
                self.check_loop_control("break", *line);
                None
            }
            Stmt::Continue { line } => {
                self.check_loop_control("continue", *line);
                None
            }
            Stmt::Expr(expr) => self.check_expr(expr),
        }
    }

    fn check_definition(
        &mut self,
        kind: SymbolKind,
        name: &Ident,
        declared: Option<&Ident>,
        value: Option<&Expr>,
        line: usize,
    ) {
        // The initializer sees the enclosing binding, not the one being made
        let value_ty = value.and_then(|v| self.check_expr(v));
        let declared_ty = declared.and_then(|ident| self.resolve_type(ident));

        let ty = match (declared_ty, value_ty) {
            (Some(expected), Some(got)) if expected != got => {
                self.report(Error::TypeMismatch {
                    name: name.name.clone(),
                    expected: expected.to_string(),
                    got: got.to_string(),
                    line,
                });
                Some(expected)
            }
            (Some(expected), _) => Some(expected),
            // An unresolvable declared type leaves the symbol untyped
            (None, _) if declared.is_some() => None,
            (None, got) => got,
        };

        let symbol = Symbol {
            name: name.name.clone(),
            kind,
            ty,
            line,
        };
        if let Err(e) = self.symbols.define(symbol) {
            self.report(e);
        }
    }

    fn resolve_type(&mut self, ident: &Ident) -> Option<Type> {
        let ty = Type::from_name(&ident.name);
        if ty.is_none() {
            self.report(Error::UnknownType {
                name: ident.name.clone(),
                line: ident.line,
            });
        }
        ty
    }

    fn check_condition(&mut self, construct: &'static str, test: &Expr, line: usize) {
        match self.check_expr(test) {
            Some(Type::Bool) | None => {}
            Some(other) => self.report(Error::ConditionNotBool {
                construct,
                got: other.to_string(),
                line,
            }),
        }
    }

    fn check_loop_control(&mut self, keyword: &'static str, line: usize) {
        if self.loop_depth == 0 {
            self.report(Error::LoopControlOutsideLoop { keyword, line });
        }
    }

    /// Type an expression. `None` means an error was already reported
    /// somewhere inside it, so callers stay quiet instead of cascading.
    fn check_expr(&mut self, expr: &Expr) -> Option<Type> {
        match expr {
            Expr::Literal(lit) => Some(match lit {
                Literal::Int(..) => Type::Int,
                Literal::Float(..) => Type::Float,
                Literal::Bool(..) => Type::Bool,
                Literal::Char(..) => Type::Char,
            }),
            Expr::Name(ident) => match self.symbols.lookup(&ident.name) {
                Some(symbol) => symbol.ty,
                None => {
                    self.report(Error::UndefinedName {
                        name: ident.name.clone(),
                        line: ident.line,
                    });
                    None
                }
            },
            Expr::Unary { op, operand, line } => {
                let operand_ty = self.check_expr(operand)?;
                let result = unary_result(*op, operand_ty);
                if result.is_none() {
                    self.report(Error::UnaryOpMismatch {
                        op: op.to_string(),
                        operand: operand_ty.to_string(),
                        line: *line,
                    });
                }
                result
            }
            Expr::Binary {
                op,
                left,
                right,
                line,
            } => {
                // Both sides are always visited so errors in each are reported
                let left_ty = self.check_expr(left);
                let right_ty = self.check_expr(right);
                let (left_ty, right_ty) = (left_ty?, right_ty?);
                let result = binary_result(*op, left_ty, right_ty);
                if result.is_none() {
                    self.report(Error::BinaryOpMismatch {
                        op: op.to_string(),
                        left: left_ty.to_string(),
                        right: right_ty.to_string(),
                        line: *line,
                    });
                }
                result
            }
            Expr::Block { body, line } => {
                // Loop control cannot escape an expression
                let depth = std::mem::replace(&mut self.loop_depth, 0);
                let ty = self.check_block(body);
                self.loop_depth = depth;

                match body.stmts.last() {
                    Some(Stmt::Expr(_)) => ty,
                    _ => {
                        self.report(Error::BlockWithoutValue { line: *line });
                        None
                    }
                }
            }
        }
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}
