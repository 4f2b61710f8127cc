use std::collections::BTreeMap;

use crate::error::SimplexError;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// A phase hit the iteration limit, most likely by cycling
    IterationLimit,
    /// Malformed input or an internal invariant violation
    Error,
}

/// An optimal assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Value of every variable of the input model, zeros included
    pub values: BTreeMap<String, f64>,
    /// Objective value at the optimum
    pub objective_value: f64,
    /// Pivots spent repairing negative right-hand sides
    pub repair_pivots: usize,
    /// Pivots spent in the optimization loop
    pub optimization_pivots: usize,
}

impl Solution {
    pub fn value(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }
}

/// Flattened result of a solve: either a full assignment with an empty
/// error, or an empty assignment with a non-empty error
///
/// An empty `result` never means "zero of everything"; check `error` first.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexSolution {
    pub status: SolutionStatus,
    pub error: String,
    pub result: BTreeMap<String, f64>,
    pub objective_value: Option<f64>,
}

impl SimplexSolution {
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

impl From<Result<Solution, SimplexError>> for SimplexSolution {
    fn from(outcome: Result<Solution, SimplexError>) -> Self {
        match outcome {
            Ok(solution) => Self {
                status: SolutionStatus::Optimal,
                error: String::new(),
                result: solution.values,
                objective_value: Some(solution.objective_value),
            },
            Err(err) => Self {
                status: err.status(),
                error: err.to_string(),
                result: BTreeMap::new(),
                objective_value: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_error_has_empty_result() {
        let flat = SimplexSolution::from(Err(SimplexError::Unbounded("x".into())));
        assert_eq!(flat.status, SolutionStatus::Unbounded);
        assert!(!flat.error.is_empty());
        assert!(flat.result.is_empty());
        assert_eq!(flat.objective_value, None);
    }

    #[test]
    fn test_flatten_success_has_empty_error() {
        let solution = Solution {
            values: BTreeMap::from([("x".to_string(), 10.0)]),
            objective_value: 10.0,
            repair_pivots: 0,
            optimization_pivots: 1,
        };
        let flat = SimplexSolution::from(Ok(solution));
        assert!(flat.is_optimal());
        assert_eq!(flat.error, "");
        assert_eq!(flat.result.get("x"), Some(&10.0));
    }
}
