//! Runtime values

use std::fmt;

use crate::types::Type;

/// A dynamically typed Wabbit value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl Value {
    /// The value a declaration without initializer starts with
    pub fn zero(ty: Type) -> Value {
        match ty {
            Type::Int => Value::Int(0),
            Type::Float => Value::Float(0.0),
            Type::Bool => Value::Bool(false),
            Type::Char => Value::Char('\0'),
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Bool(_) => Type::Bool,
            Value::Char(_) => Type::Char,
        }
    }
}

/// Print format: floats always carry six decimals, chars are raw
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:.6}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(c) => write!(f, "{}", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.75).to_string(), "2.750000");
        assert_eq!(Value::Float(-0.5).to_string(), "-0.500000");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Char('x').to_string(), "x");
    }

    #[test]
    fn test_zero_values() {
        for ty in [Type::Int, Type::Float, Type::Bool, Type::Char] {
            assert_eq!(Value::zero(ty).ty(), ty);
        }
        assert_eq!(Value::zero(Type::Char), Value::Char('\0'));
    }
}
