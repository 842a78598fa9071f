//! Runtime module - tree-walking interpreter

pub mod environment;
pub mod interpreter;
pub mod value;

pub use environment::{Binding, BindingKind, Environment};
pub use interpreter::Interpreter;
pub use value::Value;
