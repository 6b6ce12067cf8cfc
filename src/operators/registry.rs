use std::collections::BTreeMap;

use crate::foundation::error::{VaryError, VaryResult};
use crate::operators::{OperatorKind, VariationOperator};
use crate::scene::model::Scene;

/// Explicit name → operator map owned by an engine.
///
/// Iteration order is the lexical order of operator names, which keeps sampling
/// reproducible for a given seed.
#[derive(Debug, Default)]
pub struct OperatorRegistry {
    operators: BTreeMap<String, Box<dyn VariationOperator>>,
}

impl OperatorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the ten built-in operators.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        for kind in OperatorKind::ALL {
            reg.register(kind.build());
        }
        reg
    }

    /// Add or replace an operator under its own name.
    pub fn register(&mut self, op: Box<dyn VariationOperator>) {
        self.operators.insert(op.name().to_string(), op);
    }

    /// Look up an operator, failing for unknown names.
    pub fn get(&self, name: &str) -> VaryResult<&dyn VariationOperator> {
        self.operators
            .get(name)
            .map(|op| op.as_ref())
            .ok_or_else(|| VaryError::unknown_operator(name))
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// Registered names in iteration order.
    pub fn names(&self) -> Vec<&str> {
        self.operators.keys().map(String::as_str).collect()
    }

    /// All operators in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn VariationOperator> {
        self.operators.values().map(|op| op.as_ref())
    }

    /// Operators applicable to `scene`, in iteration order.
    pub fn applicable(&self, scene: &Scene) -> Vec<&dyn VariationOperator> {
        self.iter().filter(|op| op.is_applicable(scene)).collect()
    }

    /// Number of registered operators.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}
