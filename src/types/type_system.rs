//! Type System for Wabbit
//!
//! Wabbit types are nominal: two types are equal when their names are.
//! Operator compatibility is a literal table, keyed by operator and operand
//! types. There is no implicit promotion between int and float.

use serde::Serialize;
use std::fmt;

use crate::frontend::ast::{BinOp, UnaryOp};

/// Primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Int,
    Float,
    Bool,
    Char,
}

impl Type {
    /// Resolve a declared type name
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "int" => Some(Type::Int),
            "float" => Some(Type::Float),
            "bool" => Some(Type::Bool),
            "char" => Some(Type::Char),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Bool => "bool",
            Type::Char => "char",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// (operator, left, right) -> result
pub static BINARY_OPS: &[(BinOp, Type, Type, Type)] = &[
    // int ops
    (BinOp::Add, Type::Int, Type::Int, Type::Int),
    (BinOp::Sub, Type::Int, Type::Int, Type::Int),
    (BinOp::Mul, Type::Int, Type::Int, Type::Int),
    (BinOp::Div, Type::Int, Type::Int, Type::Int),
    (BinOp::Lt, Type::Int, Type::Int, Type::Bool),
    (BinOp::Le, Type::Int, Type::Int, Type::Bool),
    (BinOp::Gt, Type::Int, Type::Int, Type::Bool),
    (BinOp::Ge, Type::Int, Type::Int, Type::Bool),
    (BinOp::Eq, Type::Int, Type::Int, Type::Bool),
    (BinOp::Ne, Type::Int, Type::Int, Type::Bool),
    // float ops
    (BinOp::Add, Type::Float, Type::Float, Type::Float),
    (BinOp::Sub, Type::Float, Type::Float, Type::Float),
    (BinOp::Mul, Type::Float, Type::Float, Type::Float),
    (BinOp::Div, Type::Float, Type::Float, Type::Float),
    (BinOp::Lt, Type::Float, Type::Float, Type::Bool),
    (BinOp::Le, Type::Float, Type::Float, Type::Bool),
    (BinOp::Gt, Type::Float, Type::Float, Type::Bool),
    (BinOp::Ge, Type::Float, Type::Float, Type::Bool),
    (BinOp::Eq, Type::Float, Type::Float, Type::Bool),
    (BinOp::Ne, Type::Float, Type::Float, Type::Bool),
    // char ops
    (BinOp::Lt, Type::Char, Type::Char, Type::Bool),
    (BinOp::Le, Type::Char, Type::Char, Type::Bool),
    (BinOp::Gt, Type::Char, Type::Char, Type::Bool),
    (BinOp::Ge, Type::Char, Type::Char, Type::Bool),
    (BinOp::Eq, Type::Char, Type::Char, Type::Bool),
    (BinOp::Ne, Type::Char, Type::Char, Type::Bool),
    // bool ops
    (BinOp::Eq, Type::Bool, Type::Bool, Type::Bool),
    (BinOp::Ne, Type::Bool, Type::Bool, Type::Bool),
    (BinOp::And, Type::Bool, Type::Bool, Type::Bool),
    (BinOp::Or, Type::Bool, Type::Bool, Type::Bool),
];

/// (operator, operand) -> result
pub static UNARY_OPS: &[(UnaryOp, Type, Type)] = &[
    (UnaryOp::Pos, Type::Int, Type::Int),
    (UnaryOp::Neg, Type::Int, Type::Int),
    (UnaryOp::Pos, Type::Float, Type::Float),
    (UnaryOp::Neg, Type::Float, Type::Float),
    (UnaryOp::Not, Type::Bool, Type::Bool),
];

/// Look up the result type of a binary operation
pub fn binary_result(op: BinOp, left: Type, right: Type) -> Option<Type> {
    BINARY_OPS
        .iter()
        .find(|(o, l, r, _)| *o == op && *l == left && *r == right)
        .map(|(_, _, _, result)| *result)
}

/// Look up the result type of a unary operation
pub fn unary_result(op: UnaryOp, operand: Type) -> Option<Type> {
    UNARY_OPS
        .iter()
        .find(|(o, t, _)| *o == op && *t == operand)
        .map(|(_, _, result)| *result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL_TYPES: [Type; 4] = [Type::Int, Type::Float, Type::Bool, Type::Char];
    const ALL_BINOPS: [BinOp; 12] = [
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Lt,
        BinOp::Le,
        BinOp::Gt,
        BinOp::Ge,
        BinOp::Eq,
        BinOp::Ne,
        BinOp::And,
        BinOp::Or,
    ];

    fn expected_binary(op: BinOp, left: Type, right: Type) -> Option<Type> {
        if left != right {
            return None;
        }
        let arithmetic = matches!(op, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div);
        let ordering = matches!(op, BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge);
        let equality = matches!(op, BinOp::Eq | BinOp::Ne);
        let logical = matches!(op, BinOp::And | BinOp::Or);
        match left {
            Type::Int | Type::Float if arithmetic => Some(left),
            Type::Int | Type::Float | Type::Char if ordering || equality => Some(Type::Bool),
            Type::Bool if equality || logical => Some(Type::Bool),
            _ => None,
        }
    }

    #[test]
    fn test_binary_table_is_exhaustive() {
        for op in ALL_BINOPS {
            for left in ALL_TYPES {
                for right in ALL_TYPES {
                    assert_eq!(
                        binary_result(op, left, right),
                        expected_binary(op, left, right),
                        "{} {} {}",
                        left,
                        op,
                        right
                    );
                }
            }
        }
    }

    #[test]
    fn test_table_has_no_duplicate_keys() {
        let keys: HashSet<_> = BINARY_OPS.iter().map(|(o, l, r, _)| (*o, *l, *r)).collect();
        assert_eq!(keys.len(), BINARY_OPS.len());
        let keys: HashSet<_> = UNARY_OPS.iter().map(|(o, t, _)| (*o, *t)).collect();
        assert_eq!(keys.len(), UNARY_OPS.len());
    }

    #[test]
    fn test_no_implicit_promotion() {
        assert_eq!(binary_result(BinOp::Add, Type::Int, Type::Float), None);
        assert_eq!(binary_result(BinOp::Add, Type::Int, Type::Int), Some(Type::Int));
    }

    #[test]
    fn test_unary_ops() {
        assert_eq!(unary_result(UnaryOp::Neg, Type::Float), Some(Type::Float));
        assert_eq!(unary_result(UnaryOp::Pos, Type::Int), Some(Type::Int));
        assert_eq!(unary_result(UnaryOp::Not, Type::Bool), Some(Type::Bool));
        assert_eq!(unary_result(UnaryOp::Not, Type::Int), None);
        assert_eq!(unary_result(UnaryOp::Neg, Type::Char), None);
        assert_eq!(unary_result(UnaryOp::Neg, Type::Bool), None);
    }

    #[test]
    fn test_type_names() {
        for ty in ALL_TYPES {
            assert_eq!(Type::from_name(ty.name()), Some(ty));
        }
        assert_eq!(Type::from_name("string"), None);
    }
}
