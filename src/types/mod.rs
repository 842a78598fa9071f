//! Types module

pub mod type_system;

pub use type_system::{binary_result, unary_result, Type};
