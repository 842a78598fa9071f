//! Error handling for Wabbit

use serde::Serialize;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline phase an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lexical,
    Syntax,
    Type,
    Runtime,
    Io,
}

/// Wabbit error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ==================== Lexical Errors ====================
    #[error("line {line}: illegal character {ch:?}")]
    IllegalCharacter { ch: char, line: usize },

    #[error("line {line}: unterminated comment")]
    UnterminatedComment { line: usize },

    #[error("line {line}: unterminated character constant")]
    UnterminatedChar { line: usize },

    // ==================== Syntax Errors ====================
    #[error("line {line}: unexpected token {got:?}, expected {expected}")]
    UnexpectedToken {
        expected: String,
        got: String,
        line: usize,
    },

    /// Also raised for integers outside i64. The sign is a separate unary
    /// operator, so i64::MIN has no literal form.
    #[error("line {line}: invalid {kind} literal {text:?}")]
    InvalidLiteral {
        kind: &'static str,
        text: String,
        line: usize,
    },

    #[error("line {line}: constant '{name}' must be defined from a literal")]
    ConstNotLiteral { name: String, line: usize },

    #[error("line {line}: variable '{name}' needs a type or an initial value")]
    MissingTypeOrValue { name: String, line: usize },

    // ==================== Type Errors ====================
    #[error("line {line}: type error: {left} {op} {right} is not supported")]
    BinaryOpMismatch {
        op: String,
        left: String,
        right: String,
        line: usize,
    },

    #[error("line {line}: type error: unary {op} is not supported for {operand}")]
    UnaryOpMismatch {
        op: String,
        operand: String,
        line: usize,
    },

    #[error("line {line}: undefined name '{name}'")]
    UndefinedName { name: String, line: usize },

    #[error("line {line}: cannot assign to constant '{name}'")]
    AssignToConst { name: String, line: usize },

    #[error("line {line}: type mismatch for '{name}': expected {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: String,
        got: String,
        line: usize,
    },

    #[error("line {line}: {construct} condition must be bool, got {got}")]
    ConditionNotBool {
        construct: &'static str,
        got: String,
        line: usize,
    },

    #[error("line {line}: '{name}' is already defined in this scope")]
    DuplicateDefinition { name: String, line: usize },

    #[error("line {line}: unknown type '{name}'")]
    UnknownType { name: String, line: usize },

    #[error("line {line}: '{keyword}' outside of a while loop")]
    LoopControlOutsideLoop { keyword: &'static str, line: usize },

    #[error("line {line}: block expression must end with an expression")]
    BlockWithoutValue { line: usize },

    #[error("{} type error(s) found", .0.len())]
    TypeErrors(Vec<Error>),

    // ==================== Runtime Errors ====================
    #[error("line {line}: runtime error: '{name}' is not defined")]
    UndefinedVariable { name: String, line: usize },

    #[error("line {line}: runtime error: division by zero")]
    DivisionByZero { line: usize },

    #[error("line {line}: runtime error: integer overflow in {op}")]
    IntegerOverflow { op: String, line: usize },

    #[error("line {line}: runtime error: cannot apply {op} to {operands}")]
    RuntimeTypeMismatch {
        op: String,
        operands: String,
        line: usize,
    },

    #[error("line {line}: runtime error: {what} produced no value")]
    NoValue { what: &'static str, line: usize },

    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Get the source line associated with this error
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::IllegalCharacter { line, .. }
            | Self::UnterminatedComment { line }
            | Self::UnterminatedChar { line }
            | Self::UnexpectedToken { line, .. }
            | Self::InvalidLiteral { line, .. }
            | Self::ConstNotLiteral { line, .. }
            | Self::MissingTypeOrValue { line, .. }
            | Self::BinaryOpMismatch { line, .. }
            | Self::UnaryOpMismatch { line, .. }
            | Self::UndefinedName { line, .. }
            | Self::AssignToConst { line, .. }
            | Self::TypeMismatch { line, .. }
            | Self::ConditionNotBool { line, .. }
            | Self::DuplicateDefinition { line, .. }
            | Self::UnknownType { line, .. }
            | Self::LoopControlOutsideLoop { line, .. }
            | Self::BlockWithoutValue { line }
            | Self::UndefinedVariable { line, .. }
            | Self::DivisionByZero { line }
            | Self::IntegerOverflow { line, .. }
            | Self::RuntimeTypeMismatch { line, .. }
            | Self::NoValue { line, .. } => Some(*line),
            Self::TypeErrors(errors) => errors.first().and_then(Error::line),
            Self::Io(_) => None,
        }
    }

    /// Get the pipeline phase that produced this error
    pub fn phase(&self) -> Phase {
        match self {
            Self::IllegalCharacter { .. }
            | Self::UnterminatedComment { .. }
            | Self::UnterminatedChar { .. } => Phase::Lexical,
            Self::UnexpectedToken { .. }
            | Self::InvalidLiteral { .. }
            | Self::ConstNotLiteral { .. }
            | Self::MissingTypeOrValue { .. } => Phase::Syntax,
            Self::BinaryOpMismatch { .. }
            | Self::UnaryOpMismatch { .. }
            | Self::UndefinedName { .. }
            | Self::AssignToConst { .. }
            | Self::TypeMismatch { .. }
            | Self::ConditionNotBool { .. }
            | Self::DuplicateDefinition { .. }
            | Self::UnknownType { .. }
            | Self::LoopControlOutsideLoop { .. }
            | Self::BlockWithoutValue { .. }
            | Self::TypeErrors(_) => Phase::Type,
            Self::UndefinedVariable { .. }
            | Self::DivisionByZero { .. }
            | Self::IntegerOverflow { .. }
            | Self::RuntimeTypeMismatch { .. }
            | Self::NoValue { .. } => Phase::Runtime,
            Self::Io(_) => Phase::Io,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
