use crate::objective::{Direction, TargetFunction};
use crate::row::LinearRow;
use crate::variable::{Variable, VariableRegistry};

/// A linear programming problem as supplied by the caller
///
/// Solving never mutates the model; the solver works on a canonical copy.
#[derive(Debug, Clone)]
pub struct Model {
    /// Decision variables
    pub variables: VariableRegistry,
    /// Constraints, in the order they were added
    pub constraints: Vec<LinearRow>,
    /// Objective function
    pub objective: TargetFunction,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            variables: VariableRegistry::new(),
            constraints: Vec::new(),
            objective: TargetFunction::new(Direction::Minimize, []),
        }
    }
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables(variables: VariableRegistry) -> Self {
        Self {
            variables,
            ..Self::default()
        }
    }

    pub fn add_variable(&mut self, name: impl AsRef<str>) -> Variable {
        self.variables.register(name)
    }

    pub fn set_objective(&mut self, objective: TargetFunction) {
        self.objective = objective;
    }

    pub fn add_constraint(&mut self, row: LinearRow) {
        self.constraints.push(row);
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}
