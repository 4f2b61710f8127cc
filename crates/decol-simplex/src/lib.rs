mod error;
mod objective;
mod problem;
mod row;
mod simplex;
mod solution;
mod variable;

pub use error::{Phase, SimplexError};
pub use objective::{Direction, TargetFunction};
pub use problem::Model;
pub use row::{LinearRow, Relation, RowAlgebra};
pub use simplex::{Basis, ReducedCosts, Solver, Tableau};
pub use solution::{SimplexSolution, Solution, SolutionStatus};
pub use variable::{Variable, VariableRegistry};
