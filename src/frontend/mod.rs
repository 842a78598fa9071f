//! Frontend module - Lexer, Parser, Type Checker, Source Printer

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod printer;
pub mod semantic;
