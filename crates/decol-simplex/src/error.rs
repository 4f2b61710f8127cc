use std::fmt;

use thiserror::Error;

use crate::row::Relation;
use crate::solution::SolutionStatus;

/// Which loop of the solver was running when a failure was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Driving negative right-hand sides to zero or above
    FeasibilityRepair,
    /// Pivoting on reduced costs until no variable improves the objective
    Optimization,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::FeasibilityRepair => write!(f, "feasibility repair"),
            Phase::Optimization => write!(f, "optimization"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimplexError {
    #[error("Unsupported relation {relation:?} in constraint '{row}': only <= and >= are accepted")]
    UnsupportedRelation { row: String, relation: Relation },
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Non-finite value {value} in {context}")]
    NonFiniteValue { context: String, value: f64 },
    #[error("Row {row} is out of range for a tableau of {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("No negative coefficient in row '{0}'")]
    NoNegativeCoefficient(String),
    #[error("Infeasible: constraint '{0}' cannot be satisfied with non-negative variables")]
    Infeasible(String),
    /// Carries a caller-facing description such as `variable 'x'` or
    /// `constraint 'floor'`; internal slack names never appear here
    #[error("Unbounded: objective improves without limit along {0}")]
    Unbounded(String),
    #[error("Variable '{0}' is already in the basis")]
    AlreadyBasic(String),
    #[error("Division by zero while scaling row '{0}'")]
    DivisionByZero(String),
    #[error("Negative value {value} for basic variable '{variable}' in the final basis")]
    NegativeSolution { variable: String, value: f64 },
    #[error("Iteration limit of {limit} exceeded during {phase}, possible cycling")]
    IterationLimitExceeded { phase: Phase, limit: usize },
}

impl SimplexError {
    /// Coarse classification used by the flattened solve result
    pub fn status(&self) -> SolutionStatus {
        match self {
            SimplexError::Infeasible(_) | SimplexError::NoNegativeCoefficient(_) => {
                SolutionStatus::Infeasible
            }
            SimplexError::Unbounded(_) => SolutionStatus::Unbounded,
            SimplexError::IterationLimitExceeded { .. } => SolutionStatus::IterationLimit,
            SimplexError::UnsupportedRelation { .. }
            | SimplexError::UnknownVariable(_)
            | SimplexError::NonFiniteValue { .. }
            | SimplexError::RowOutOfRange { .. }
            | SimplexError::AlreadyBasic(_)
            | SimplexError::DivisionByZero(_)
            | SimplexError::NegativeSolution { .. } => SolutionStatus::Error,
        }
    }
}
