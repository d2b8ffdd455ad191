//! Environment and bindings for the minic interpreter.
//!
//! One [`Env`] exists per function invocation. It is a stack of lexical
//! scopes: the outermost holds the parameters and the body's top-level
//! declarations, and every block pushes a fresh scope on top.

use std::collections::HashMap;

use crate::value::Value;
use minic_syntax::ast::Type;
use minic_syntax::error::{error, ErrorKind, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// The current value, always of the declared type
    pub value: Value,
    /// Declared type; assignments are converted to it
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct Env {
    scopes: Vec<HashMap<String, Binding>>,
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub(crate) fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of live scopes, the function scope included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Innermost visible binding for `name`.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|s| s.get(name))
    }

    /// Bind `name` in the innermost scope. Shadowing an outer scope is
    /// fine; a second declaration in the same scope is not.
    pub fn define(&mut self, name: &str, value: Value, ty: Type) -> Result<()> {
        let scope = self
            .scopes
            .last_mut()
            .ok_or_else(|| ErrorKind::UnboundVariable(name.to_string()))?;
        if scope.contains_key(name) {
            return error(ErrorKind::RedeclaredVariable(name.to_string()));
        }
        scope.insert(
            name.to_string(),
            Binding {
                value: value.convert(ty),
                ty,
            },
        );
        Ok(())
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|s| s.get_mut(name))
        {
            Some(b) => {
                b.value = value.convert(b.ty);
                Ok(())
            }
            None => error(ErrorKind::UnboundVariable(name.to_string())),
        }
    }

    /// All visible bindings, innermost shadowing outer, sorted by name.
    pub fn vars_snapshot(&self) -> Vec<(String, Value)> {
        let mut seen: HashMap<&str, Value> = HashMap::new();
        for scope in &self.scopes {
            for (k, b) in scope {
                seen.insert(k.as_str(), b.value);
            }
        }
        let mut vars: Vec<(String, Value)> =
            seen.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }
}
