//! Source Printer - render a Wabbit AST back to canonical source
//!
//! One statement per line, `if`/`while` bodies as braced blocks indented by
//! four spaces per level. Parentheses are emitted only where operator
//! precedence or left associativity would otherwise change the tree.

use crate::frontend::ast::*;

const INDENT: &str = "    ";

/// Pretty printer for Wabbit source
pub struct SourcePrinter {
    output: String,
    indent: usize,
}

impl SourcePrinter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Print a program to string
    pub fn print_program(&mut self, program: &Program) -> String {
        self.output.clear();
        self.print_statements(&program.body);
        std::mem::take(&mut self.output)
    }

    fn print_statements(&mut self, stmts: &Statements) {
        for stmt in &stmts.stmts {
            self.print_stmt(stmt);
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.output.push_str(INDENT);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn nested(&mut self, stmts: &Statements) {
        self.indent += 1;
        self.print_statements(stmts);
        self.indent -= 1;
    }

    fn print_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::ConstDef { name, ty, value, .. } => {
                let text = format!("const {}{} = {};", name.name, type_suffix(ty), self.expr(value));
                self.line(&text);
            }
            Stmt::VarDef { name, ty, value, .. } => {
                let init = match value {
                    Some(v) => format!(" = {}", self.expr(v)),
                    None => String::new(),
                };
                let text = format!("var {}{}{};", name.name, type_suffix(ty), init);
                self.line(&text);
            }
            Stmt::Assign { target, value, .. } => {
                let text = format!("{} = {};", target.name, self.expr(value));
                self.line(&text);
            }
            Stmt::Print { expr, .. } => {
                let text = format!("print {};", self.expr(expr));
                self.line(&text);
            }
            Stmt::If {
                test,
                then_block,
                else_block,
                ..
            } => {
                let header = format!("if {} {{", self.expr(test));
                self.line(&header);
                self.nested(then_block);
                if else_block.is_empty() {
                    self.line("}");
                } else {
                    self.line("} else {");
                    self.nested(else_block);
                    self.line("}");
                }
            }
            Stmt::While { test, body, .. } => {
                let header = format!("while {} {{", self.expr(test));
                self.line(&header);
                self.nested(body);
                self.line("}");
            }
            Stmt::Break { .. } => self.line("break;"),
            Stmt::Continue { .. } => self.line("continue;"),
            Stmt::Expr(expr) => {
                let text = format!("{};", self.expr(expr));
                self.line(&text);
            }
        }
    }

    /// Render an expression; block expressions continue at the current indent
    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(lit) => literal(lit),
            Expr::Name(ident) => ident.name.clone(),
            Expr::Unary { op, operand, .. } => {
                let inner = self.expr(operand);
                if matches!(**operand, Expr::Binary { .. }) {
                    format!("{}({})", op, inner)
                } else {
                    format!("{}{}", op, inner)
                }
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                let prec = op.precedence();
                let left_text = self.operand(left, |p| p < prec);
                let right_text = self.operand(right, |p| p <= prec);
                format!("{} {} {}", left_text, op, right_text)
            }
            Expr::Block { body, .. } => {
                let mut inner = SourcePrinter {
                    output: String::from("{\n"),
                    indent: self.indent + 1,
                };
                inner.print_statements(body);
                for _ in 0..self.indent {
                    inner.output.push_str(INDENT);
                }
                inner.output.push('}');
                inner.output
            }
        }
    }

    fn operand(&self, expr: &Expr, needs_parens: impl Fn(u8) -> bool) -> String {
        match expr {
            Expr::Binary { op, .. } if needs_parens(op.precedence()) => {
                format!("({})", self.expr(expr))
            }
            _ => self.expr(expr),
        }
    }
}

impl Default for SourcePrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a program as canonical source text
pub fn print_source(program: &Program) -> String {
    SourcePrinter::new().print_program(program)
}

fn type_suffix(ty: &Option<Ident>) -> String {
    match ty {
        Some(t) => format!(" {}", t.name),
        None => String::new(),
    }
}

fn literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(v, _) => v.to_string(),
        Literal::Float(v, _) => {
            // Keep the decimal point so the lexer reads a float back
            let text = v.to_string();
            if text.contains('.') {
                text
            } else {
                format!("{}.0", text)
            }
        }
        Literal::Bool(v, _) => v.to_string(),
        Literal::Char(c, _) => format!("'{}'", escape_char(*c)),
    }
}

fn escape_char(c: char) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        '\0' => "\\0".to_string(),
        '\\' => "\\\\".to_string(),
        '\'' => "\\'".to_string(),
        c if c.is_ascii_control() => format!("\\x{:02x}", c as u32),
        c => c.to_string(),
    }
}
