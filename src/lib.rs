//! Wabbit
//!
//! A small statically typed teaching language: lexer, parser, type
//! checker, tree-walking interpreter and canonical source printer.

pub mod feedback;
pub mod frontend;
pub mod runtime;
pub mod types;
pub mod utils;

use std::io::Write;

use frontend::ast::Program;
use frontend::lexer::Lexer;
use frontend::parser::Parser;
use frontend::printer::print_source;
use frontend::semantic::TypeChecker;
use frontend::token::Token;
use runtime::Interpreter;

pub use utils::{Error, Phase, Result};

/// Lex a source into its full token list, ending with Eof
pub fn tokenize_source(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

/// Parse a source into its AST
pub fn parse_source(source: &str) -> Result<Program> {
    Parser::new(Lexer::new(source))?.parse_program()
}

/// Type check a parsed program, reporting every error at once
pub fn check_program(program: &Program) -> Result<()> {
    TypeChecker::new().check(program)
}

/// Parse and type check a source
pub fn check_source(source: &str) -> Result<Program> {
    let program = parse_source(source)?;
    check_program(&program)?;
    Ok(program)
}

/// Run a program that has already been checked
pub fn run_program<W: Write>(program: &Program, out: W) -> Result<()> {
    Interpreter::new(out).run(program)
}

/// Parse, check and interpret a source. Nothing runs if any check fails.
pub fn run_source<W: Write>(source: &str, out: W) -> Result<()> {
    let program = check_source(source)?;
    run_program(&program, out)
}

/// Reformat a source into canonical form
pub fn format_source(source: &str) -> Result<String> {
    Ok(print_source(&parse_source(source)?))
}
