//! Structured Feedback Module
//!
//! Machine-readable diagnostics:
//! - JSON error reports with stable codes and fix suggestions
//! - Per-run check summary

use serde::Serialize;

use crate::frontend::ast::Program;
use crate::utils::{Error, Phase};

// ==================== Structured Error Report ====================

/// A structured error report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Error code (e.g., "E301")
    pub code: String,

    pub phase: Phase,

    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Source line, when the error has one
    pub line: Option<usize>,

    /// Suggested fixes
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    /// Description of the fix
    pub message: String,

    /// The replacement text
    pub replacement: Option<String>,
}

impl Suggestion {
    fn new(message: impl Into<String>, replacement: Option<String>) -> Self {
        Self {
            message: message.into(),
            replacement,
        }
    }
}

// ==================== Error Conversion ====================

impl ErrorReport {
    /// Create an error report from a single error
    pub fn from_error(error: &Error) -> Self {
        Self {
            code: error_code(error).to_string(),
            phase: error.phase(),
            severity: Severity::Error,
            message: error.to_string(),
            line: error.line(),
            suggestions: suggestions(error),
        }
    }
}

/// One report per error; a type error aggregate is flattened
pub fn report_all(error: &Error) -> Vec<ErrorReport> {
    match error {
        Error::TypeErrors(errors) => errors.iter().flat_map(report_all).collect(),
        other => vec![ErrorReport::from_error(other)],
    }
}

fn error_code(error: &Error) -> &'static str {
    match error {
        // Lexical
        Error::IllegalCharacter { .. } => "E101",
        Error::UnterminatedComment { .. } => "E102",
        Error::UnterminatedChar { .. } => "E103",
        // Syntax
        Error::UnexpectedToken { .. } => "E201",
        Error::InvalidLiteral { .. } => "E202",
        Error::ConstNotLiteral { .. } => "E203",
        Error::MissingTypeOrValue { .. } => "E204",
        // Type
        Error::BinaryOpMismatch { .. } => "E301",
        Error::UnaryOpMismatch { .. } => "E302",
        Error::UndefinedName { .. } => "E303",
        Error::AssignToConst { .. } => "E304",
        Error::TypeMismatch { .. } => "E305",
        Error::ConditionNotBool { .. } => "E306",
        Error::DuplicateDefinition { .. } => "E307",
        Error::UnknownType { .. } => "E308",
        Error::LoopControlOutsideLoop { .. } => "E309",
        Error::BlockWithoutValue { .. } => "E310",
        Error::TypeErrors(_) => "E300",
        // Runtime
        Error::UndefinedVariable { .. } => "E401",
        Error::DivisionByZero { .. } => "E402",
        Error::IntegerOverflow { .. } => "E403",
        Error::RuntimeTypeMismatch { .. } => "E404",
        Error::NoValue { .. } => "E405",
        Error::Io(_) => "E500",
    }
}

fn suggestions(error: &Error) -> Vec<Suggestion> {
    match error {
        Error::BinaryOpMismatch { left, right, .. } if is_numeric_mix(left, right) => vec![Suggestion::new(
            format!("{} and {} never mix; write the int operand as a float literal", left, right),
            None,
        )],
        Error::AssignToConst { name, .. } => vec![Suggestion::new(
            format!("declare '{}' with var to make it assignable", name),
            Some(format!("var {}", name)),
        )],
        Error::UndefinedName { name, .. } | Error::UndefinedVariable { name, .. } => vec![Suggestion::new(
            format!("declare '{}' before using it", name),
            Some(format!("var {} int;", name)),
        )],
        Error::MissingTypeOrValue { name, .. } => vec![Suggestion::new(
            "give the variable a type, an initial value, or both",
            Some(format!("var {} int;", name)),
        )],
        Error::UnknownType { .. } => vec![Suggestion::new("use one of int, float, bool, char", None)],
        Error::ConstNotLiteral { name, .. } => vec![Suggestion::new(
            format!("use var for '{}' if it needs a computed value", name),
            None,
        )],
        Error::LoopControlOutsideLoop { .. } => {
            vec![Suggestion::new("move the statement inside a while body", None)]
        }
        _ => vec![],
    }
}

fn is_numeric_mix(left: &str, right: &str) -> bool {
    matches!((left, right), ("int", "float") | ("float", "int"))
}

// ==================== Check Feedback ====================

/// Outcome of checking one source
#[derive(Debug, Clone, Serialize)]
pub struct CheckFeedback {
    pub success: bool,

    /// Source file, or "<inline>"
    pub source_file: String,

    /// All errors
    pub diagnostics: Vec<ErrorReport>,

    /// Top-level statement count, when parsing succeeded
    pub statements: Option<usize>,
}

impl CheckFeedback {
    pub fn success(source_file: String, program: &Program) -> Self {
        Self {
            success: true,
            source_file,
            diagnostics: vec![],
            statements: Some(program.body.stmts.len()),
        }
    }

    pub fn failure(source_file: String, error: &Error) -> Self {
        Self {
            success: false,
            source_file,
            diagnostics: report_all(error),
            statements: None,
        }
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_report_fields() {
        let report = ErrorReport::from_error(&Error::IllegalCharacter { ch: '$', line: 3 });
        assert_eq!(report.code, "E101");
        assert_eq!(report.phase, Phase::Lexical);
        assert_eq!(report.line, Some(3));
        assert_eq!(report.message, "line 3: illegal character '$'");
    }

    #[test]
    fn test_type_errors_are_flattened() {
        let aggregate = Error::TypeErrors(vec![
            Error::AssignToConst {
                name: "pi".into(),
                line: 2,
            },
            Error::BinaryOpMismatch {
                op: "+".into(),
                left: "int".into(),
                right: "float".into(),
                line: 5,
            },
        ]);
        let reports = report_all(&aggregate);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].code, "E304");
        assert_eq!(reports[1].code, "E301");
        assert_eq!(reports[1].line, Some(5));
        assert_eq!(reports[1].suggestions.len(), 1);
        assert_eq!(reports[1].suggestions[0].replacement, None);
    }

    #[test]
    fn test_json_shape() {
        let feedback = CheckFeedback::failure(
            "<inline>".to_string(),
            &Error::DivisionByZero { line: 1 },
        );
        let value: Value = serde_json::from_str(&feedback.to_json()).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["statements"], Value::Null);
        assert_eq!(
            value["diagnostics"][0],
            json!({
                "code": "E402",
                "phase": "runtime",
                "severity": "error",
                "message": "line 1: runtime error: division by zero",
                "line": 1,
                "suggestions": [],
            })
        );
    }
}
