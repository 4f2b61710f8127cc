use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::SimplexError;

/// A decision variable, identified by its name
///
/// Cloning is cheap and yields the same identity. Ordering is by name, which
/// gives every map keyed by `Variable` a deterministic iteration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(Arc<str>);

impl Variable {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Variable {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Name-keyed, deduplicated set of variables
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: BTreeMap<Arc<str>, Variable>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable, returning the existing one if the name is taken
    pub fn register(&mut self, name: impl AsRef<str>) -> Variable {
        let name = name.as_ref();
        if let Some(existing) = self.variables.get(name) {
            return existing.clone();
        }
        let key: Arc<str> = Arc::from(name);
        let variable = Variable(key.clone());
        self.variables.insert(key, variable.clone());
        variable
    }

    pub fn lookup(&self, name: &str) -> Result<Variable, SimplexError> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| SimplexError::UnknownVariable(name.to_string()))
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.contains_name(variable.name())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Variables in name order
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = VariableRegistry::new();
        let a = registry.register("x");
        let b = registry.register("x");
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = VariableRegistry::new();
        assert_eq!(
            registry.lookup("ghost"),
            Err(SimplexError::UnknownVariable("ghost".to_string()))
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mut registry = VariableRegistry::new();
        let x = registry.register("x");

        let mut copy = registry.clone();
        copy.register("slack");

        assert!(copy.contains(&x));
        assert!(copy.contains_name("slack"));
        assert!(!registry.contains_name("slack"));
        assert_eq!(copy.lookup("x").unwrap(), x);
    }

    #[test]
    fn test_iteration_is_name_sorted() {
        let mut registry = VariableRegistry::new();
        registry.register("b");
        registry.register("c");
        registry.register("a");
        let names: Vec<&str> = registry.iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
