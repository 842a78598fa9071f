//! Interpreter environment
//!
//! A stack of scope frames linked to their parent by index. Lookup walks
//! the links from the innermost frame and ends at the root frame.

use log::trace;
use std::collections::HashMap;

use crate::runtime::value::Value;
use crate::utils::{Error, Result};

/// Whether a binding can be reassigned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Const,
    Var,
}

/// A named value
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub kind: BindingKind,
    pub value: Value,
}

#[derive(Debug)]
struct Frame {
    parent: Option<usize>,
    bindings: HashMap<String, Binding>,
}

/// Scope chain owned by one interpretation
#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
    current: usize,
}

impl Environment {
    /// A chain holding only the root frame
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                parent: None,
                bindings: HashMap::new(),
            }],
            current: 0,
        }
    }

    /// Number of live frames, the root included
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn enter_scope(&mut self) {
        self.frames.push(Frame {
            parent: Some(self.current),
            bindings: HashMap::new(),
        });
        self.current = self.frames.len() - 1;
        trace!("enter scope {}", self.current);
    }

    /// Destroy the innermost frame; the root frame is never removed
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.frames[self.current].parent {
            trace!("exit scope {}", self.current);
            self.frames.pop();
            self.current = parent;
        }
    }

    /// Bind a name in the innermost frame, replacing any binding it had there
    pub fn define(&mut self, name: &str, kind: BindingKind, value: Value) {
        self.frames[self.current]
            .bindings
            .insert(name.to_string(), Binding { kind, value });
    }

    fn resolve(&self, name: &str) -> Option<usize> {
        let mut frame = Some(self.current);
        while let Some(id) = frame {
            if self.frames[id].bindings.contains_key(name) {
                return Some(id);
            }
            frame = self.frames[id].parent;
        }
        None
    }

    /// Find the nearest binding of a name
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.resolve(name)
            .and_then(|id| self.frames[id].bindings.get(name))
    }

    /// Rebind a name in the frame that owns it
    pub fn assign(&mut self, name: &str, value: Value, line: usize) -> Result<()> {
        let Some(id) = self.resolve(name) else {
            return Err(Error::UndefinedVariable {
                name: name.to_string(),
                line,
            });
        };
        match self.frames[id].bindings.get_mut(name) {
            Some(binding) if binding.kind == BindingKind::Var => {
                binding.value = value;
                Ok(())
            }
            _ => Err(Error::AssignToConst {
                name: name.to_string(),
                line,
            }),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_outward() {
        let mut env = Environment::new();
        env.define("x", BindingKind::Var, Value::Int(1));
        env.enter_scope();
        env.define("y", BindingKind::Var, Value::Int(2));

        assert_eq!(env.lookup("x").map(|b| b.value), Some(Value::Int(1)));
        assert_eq!(env.lookup("y").map(|b| b.value), Some(Value::Int(2)));

        env.exit_scope();
        assert!(env.lookup("y").is_none());
    }

    #[test]
    fn test_shadowing_and_redefinition() {
        let mut env = Environment::new();
        env.define("x", BindingKind::Var, Value::Int(1));
        env.enter_scope();
        env.define("x", BindingKind::Const, Value::Bool(true));
        assert_eq!(env.lookup("x").map(|b| b.value), Some(Value::Bool(true)));
        env.exit_scope();

        env.define("x", BindingKind::Var, Value::Int(5));
        assert_eq!(env.lookup("x").map(|b| b.value), Some(Value::Int(5)));
    }

    #[test]
    fn test_assign_targets_owning_frame() {
        let mut env = Environment::new();
        env.define("x", BindingKind::Var, Value::Int(1));
        env.enter_scope();
        env.assign("x", Value::Int(7), 3).unwrap();
        env.exit_scope();

        assert_eq!(env.lookup("x").map(|b| b.value), Some(Value::Int(7)));
    }

    #[test]
    fn test_assign_failures() {
        let mut env = Environment::new();
        env.define("k", BindingKind::Const, Value::Int(1));

        assert_eq!(
            env.assign("missing", Value::Int(1), 4),
            Err(Error::UndefinedVariable {
                name: "missing".into(),
                line: 4
            })
        );
        assert_eq!(
            env.assign("k", Value::Int(2), 5),
            Err(Error::AssignToConst {
                name: "k".into(),
                line: 5
            })
        );
    }

    #[test]
    fn test_root_frame_survives_exit() {
        let mut env = Environment::new();
        env.define("x", BindingKind::Var, Value::Int(1));
        env.exit_scope();
        assert_eq!(env.depth(), 1);
        assert!(env.lookup("x").is_some());
    }
}
