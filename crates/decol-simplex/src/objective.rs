use std::collections::BTreeMap;

use crate::variable::Variable;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Minimize,
    Maximize,
}

/// Objective function: a direction plus one coefficient per variable
#[derive(Debug, Clone, PartialEq)]
pub struct TargetFunction {
    direction: Direction,
    coefficients: BTreeMap<Variable, f64>,
}

impl TargetFunction {
    pub fn new(direction: Direction, coefficients: impl IntoIterator<Item = (Variable, f64)>) -> Self {
        Self {
            direction,
            coefficients: coefficients.into_iter().collect(),
        }
    }

    pub fn minimize(coefficients: impl IntoIterator<Item = (Variable, f64)>) -> Self {
        Self::new(Direction::Minimize, coefficients)
    }

    pub fn maximize(coefficients: impl IntoIterator<Item = (Variable, f64)>) -> Self {
        Self::new(Direction::Maximize, coefficients)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn coefficient(&self, variable: &Variable) -> f64 {
        self.coefficients.get(variable).copied().unwrap_or(0.0)
    }

    pub fn coefficients(&self) -> impl Iterator<Item = (&Variable, f64)> {
        self.coefficients.iter().map(|(v, &c)| (v, c))
    }

    pub fn evaluate(&self, values: &BTreeMap<String, f64>) -> f64 {
        self.coefficients
            .iter()
            .map(|(v, c)| c * values.get(v.name()).copied().unwrap_or(0.0))
            .sum()
    }
}
