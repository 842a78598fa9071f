//! End-to-end Wabbit programs through the library API

use pretty_assertions::{assert_eq, assert_ne};
use serde_json::Value;
use wabbit::frontend::ast::Program;
use wabbit::{check_source, format_source, parse_source, run_source, Error, Phase};

fn run(source: &str) -> String {
    let mut out = Vec::new();
    run_source(source, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn type_errors(source: &str) -> Vec<Error> {
    match check_source(source) {
        Err(Error::TypeErrors(errors)) => errors,
        other => panic!("expected type errors, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_factorial() {
    let source = "
const n = 4;
var x int = 1;
var fact int = 1;
while x < n {
    fact = fact * x;
    print fact;
    x = x + 1;
}
";
    assert!(check_source(source).is_ok());
    assert_eq!(run(source), "1\n2\n6\n");
}

#[test]
fn test_integer_division_truncates() {
    assert_eq!(run("print 7 / 2;"), "3\n");
    assert_eq!(run("print -7 / 2;"), "-3\n");
}

#[test]
fn test_float_formatting() {
    assert_eq!(run("print 2.0 - 3.0 / -4.0;"), "2.750000\n");
}

#[test]
fn test_loop_scope_is_not_observable() {
    let errors = type_errors("var i = 0;\nwhile i < 2 {\n    var x = i;\n    i = i + 1;\n}\nprint x;\n");
    assert!(matches!(&errors[..], [Error::UndefinedName { name, line: 6 }] if name == "x"));
}

#[test]
fn test_undeclared_assignment() {
    let errors = type_errors("y = 1;");
    assert!(matches!(&errors[..], [Error::UndefinedName { .. }]));
}

#[test]
fn test_const_is_immutable_and_nothing_runs() {
    let source = "print 1;\nconst pi = 3.14159;\npi = 3.0;\n";
    let errors = type_errors(source);
    assert_eq!(
        errors,
        vec![Error::AssignToConst {
            name: "pi".to_string(),
            line: 3,
        }]
    );

    let mut out = Vec::new();
    assert!(run_source(source, &mut out).is_err());
    assert!(out.is_empty());
}

#[test]
fn test_type_strictness() {
    assert!(check_source("print 2 + 3;").is_ok());
    let errors = type_errors("print 2 + 3.0;");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].phase(), Phase::Type);
}

#[test]
fn test_every_type_error_is_reported() {
    let source = "
var a int = 1.0;
var b = 'c' + 'd';
if a { }
const k = 1;
k = 2;
";
    assert_eq!(type_errors(source).len(), 4);
}

#[test]
fn test_determinism() {
    let source = "var i = 0; while i < 10 { print i * i; print 'x'; i = i + 1; }";
    assert_eq!(run(source), run(source));
}

#[test]
fn test_break_and_continue() {
    let source = "
var i = 0;
var total = 0;
while i < 100 {
    i = i + 1;
    if i / 2 * 2 == i {
        continue;
    }
    if i > 9 {
        break;
    }
    total = total + i;
}
print total;
";
    assert_eq!(run(source), "25\n");
}

#[test]
fn test_chars_and_escapes() {
    let source = r"
var c char = 'h';
print c;
print 'i';
print '\n';
print c < 'z';
";
    assert_eq!(run(source), "hi\ntrue\n");
}

#[test]
fn test_swap_with_block_expression() {
    let source = "
var x = 37;
var y = 42;
x = { var t = y; y = x; t; };
print x;
print y;
";
    assert_eq!(run(source), "42\n37\n");
}

/// The tree as JSON with every source line removed
fn without_lines(program: &Program) -> Value {
    fn strip(value: &mut Value) {
        match value {
            Value::Object(map) => {
                map.remove("line");
                for (key, inner) in map.iter_mut() {
                    // Literals serialize as [value, line]
                    if matches!(key.as_str(), "Int" | "Float" | "Bool" | "Char") {
                        if let Value::Array(items) = inner {
                            items.pop();
                        }
                    }
                    strip(inner);
                }
            }
            Value::Array(items) => items.iter_mut().for_each(strip),
            _ => {}
        }
    }

    let mut value = serde_json::to_value(program).unwrap();
    strip(&mut value);
    value
}

#[test]
fn test_round_trip() {
    let sources = [
        "const n = 4;\nvar x int = 1;\nvar fact int = 1;\nwhile x < n { fact = fact * x; print fact; x = x + 1; }",
        "var a float; if !(a < 1.0) || a == 0.0 { print -a; } else { print a * (2.0 - a); }",
        "var c = '\\x01'; print c == '\\''; x = { var y = 1; y + 2; };",
        "/* comment */ print 1 - (2 - 3) - 4; // trailing",
        "print -(a + b) * -c; print !(!x); print - -x;",
        "print a < b == (c < d) || e && (f || g);",
        "print { var t = { 1 - (2 - 3); }; t * 2; } + 2;",
        "print '\\x7f'; print '\\xff'; print '\\x85'; print '\\0';",
        "while true { if x { break; } else { continue; } }",
    ];
    for source in sources {
        let original = parse_source(source).unwrap();
        let printed = format_source(source).unwrap();
        let reparsed = parse_source(&printed).unwrap();

        assert_eq!(without_lines(&reparsed), without_lines(&original), "{}", printed);
        assert_eq!(format_source(&printed).unwrap(), printed);
    }
}

#[test]
fn test_round_trip_keeps_needed_parentheses() {
    // Dropping these parentheses would still print stably, but parse differently
    let source = "print 1 - (2 - 3); print (1 + 2) * 3;";
    let flattened = "print 1 - 2 - 3; print 1 + 2 * 3;";
    let printed = format_source(source).unwrap();

    assert_eq!(
        without_lines(&parse_source(&printed).unwrap()),
        without_lines(&parse_source(source).unwrap())
    );
    assert_ne!(
        without_lines(&parse_source(flattened).unwrap()),
        without_lines(&parse_source(source).unwrap())
    );
}

#[test]
fn test_lexical_and_syntax_errors() {
    let err = parse_source("print 1;\nprint 2 @ 3;").unwrap_err();
    assert_eq!(err.phase(), Phase::Lexical);
    assert_eq!(err.line(), Some(2));

    let err = parse_source("var x int = ;").unwrap_err();
    assert_eq!(err.phase(), Phase::Syntax);

    let err = parse_source("var x;").unwrap_err();
    assert!(matches!(err, Error::MissingTypeOrValue { .. }));

    let err = parse_source("const k = 1 + 2;").unwrap_err();
    assert!(matches!(err, Error::ConstNotLiteral { .. }));
}

#[test]
fn test_runtime_division_by_zero() {
    let mut out = Vec::new();
    let err = run_source("var z = 0;\nprint 1;\nprint 10 / z;", &mut out).unwrap_err();
    assert_eq!(err, Error::DivisionByZero { line: 3 });
    assert_eq!(out, b"1\n");
}
