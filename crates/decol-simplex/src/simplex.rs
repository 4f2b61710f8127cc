use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::error::{Phase, SimplexError};
use crate::objective::{Direction, TargetFunction};
use crate::problem::Model;
use crate::row::{LinearRow, Relation, RowAlgebra};
use crate::solution::{SimplexSolution, Solution};
use crate::variable::{Variable, VariableRegistry};

/// Simplex solver for linear programming problems
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots per phase before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

/// Bijection between rows and the basic variable each one owns
#[derive(Debug, Clone)]
pub struct Basis {
    by_row: Vec<Variable>,
    by_variable: BTreeMap<Variable, usize>,
}

impl Basis {
    fn from_rows(by_row: Vec<Variable>) -> Self {
        let by_variable = by_row.iter().enumerate().map(|(i, v)| (v.clone(), i)).collect();
        Self { by_row, by_variable }
    }

    pub fn variable_of(&self, row: usize) -> Option<&Variable> {
        self.by_row.get(row)
    }

    pub fn row_of(&self, variable: &Variable) -> Option<usize> {
        self.by_variable.get(variable).copied()
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.by_variable.contains_key(variable)
    }

    pub fn len(&self) -> usize {
        self.by_row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_row.is_empty()
    }

    /// `(row, basic variable)` pairs in row order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Variable)> {
        self.by_row.iter().enumerate()
    }

    /// Make `entering` the basic variable of `row`, returning the one that left
    fn replace(&mut self, row: usize, entering: Variable) -> Result<Variable, SimplexError> {
        if self.by_variable.contains_key(&entering) {
            return Err(SimplexError::AlreadyBasic(entering.name().to_string()));
        }
        self.by_variable.insert(entering.clone(), row);
        let leaving = std::mem::replace(&mut self.by_row[row], entering);
        self.by_variable.remove(&leaving);
        Ok(leaving)
    }
}

/// Canonical working copy of a model: equality rows, each owning one basic
/// variable, plus the slack/surplus variables created for them
#[derive(Debug, Clone)]
pub struct Tableau {
    variables: VariableRegistry,
    rows: Vec<LinearRow>,
    basis: Basis,
    objective: TargetFunction,
    /// Slack/surplus variable -> name of the row it was created for
    owners: BTreeMap<Variable, String>,
}

/// Reduced cost of every variable and the objective value of the current basis
#[derive(Debug, Clone)]
pub struct ReducedCosts {
    pub deltas: BTreeMap<Variable, f64>,
    pub objective_value: f64,
}

impl ReducedCosts {
    pub fn is_optimal(&self, direction: Direction, tolerance: f64) -> bool {
        self.entering_variable(direction, tolerance).is_none()
    }

    /// Dantzig's rule; ties keep the first variable in name order
    pub fn entering_variable(&self, direction: Direction, tolerance: f64) -> Option<Variable> {
        let mut best: Option<(&Variable, f64)> = None;
        for (variable, &delta) in &self.deltas {
            let improves = match direction {
                Direction::Minimize => delta > tolerance && best.is_none_or(|(_, d)| delta > d),
                Direction::Maximize => delta < -tolerance && best.is_none_or(|(_, d)| delta < d),
            };
            if improves {
                best = Some((variable, delta));
            }
        }
        best.map(|(v, _)| v.clone())
    }
}

impl Tableau {
    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    pub fn rows(&self) -> &[LinearRow] {
        &self.rows
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn reduced_costs(&self) -> ReducedCosts {
        let mut weighted: BTreeMap<&Variable, f64> = BTreeMap::new();
        let mut objective_value = 0.0;

        for (row, basic) in self.basis.iter() {
            let cost = self.objective.coefficient(basic);
            if cost == 0.0 {
                continue;
            }
            objective_value += cost * self.rows[row].rhs;
            for (variable, value) in self.rows[row].coefficients() {
                *weighted.entry(variable).or_insert(0.0) += cost * value;
            }
        }

        let deltas = self
            .variables
            .iter()
            .map(|v| {
                let z = weighted.get(v).copied().unwrap_or(0.0);
                (v.clone(), z - self.objective.coefficient(v))
            })
            .collect();

        ReducedCosts { deltas, objective_value }
    }

    /// Caller-facing name for a variable: slack/surplus variables are
    /// reported by the constraint they belong to
    fn describe(&self, variable: &Variable) -> String {
        match self.owners.get(variable) {
            Some(row) => format!("constraint '{row}'"),
            None => format!("variable '{variable}'"),
        }
    }

    /// Row with the most negative right-hand side; ties keep the first row
    fn most_negative_rhs_row(&self, tolerance: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, row) in self.rows.iter().enumerate() {
            if row.rhs < -tolerance && best.is_none_or(|(_, rhs)| row.rhs < rhs) {
                best = Some((i, row.rhs));
            }
        }
        best.map(|(i, _)| i)
    }
}

fn check_finite(value: f64, context: impl FnOnce() -> String) -> Result<(), SimplexError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimplexError::NonFiniteValue {
            context: context(),
            value,
        })
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve the model, flattening any failure into the returned value
    pub fn solve(&self, model: &Model) -> SimplexSolution {
        let outcome = self.try_solve(model);
        if let Err(err) = &outcome {
            warn!(
                component = "simplex",
                operation = "solve",
                status = "failure",
                error = %err,
                "Solve failed"
            );
        }
        outcome.into()
    }

    /// Canonicalize, repair feasibility, optimize and extract
    pub fn try_solve(&self, model: &Model) -> Result<Solution, SimplexError> {
        let mut tableau = self.canonicalize(model)?;
        let repair_pivots = self.normalize_right_hand_sides(&mut tableau)?;
        let optimization_pivots = self.optimize(&mut tableau)?;

        let mut solution = self.extract_solution(&tableau, model)?;
        solution.repair_pivots = repair_pivots;
        solution.optimization_pivots = optimization_pivots;

        debug!(
            component = "simplex",
            operation = "solve",
            status = "success",
            repair_pivots,
            optimization_pivots,
            objective = solution.objective_value,
            "Found optimal solution"
        );
        Ok(solution)
    }

    /// Build the equality form of `model` with slack/surplus variables as the
    /// initial basis. The model itself is left untouched.
    pub fn canonicalize(&self, model: &Model) -> Result<Tableau, SimplexError> {
        for (variable, value) in model.objective.coefficients() {
            if !model.variables.contains(variable) {
                return Err(SimplexError::UnknownVariable(variable.name().to_string()));
            }
            check_finite(value, || format!("objective coefficient of '{variable}'"))?;
        }

        let mut variables = model.variables.clone();
        let mut rows = Vec::with_capacity(model.constraints.len());
        let mut basic = Vec::with_capacity(model.constraints.len());
        let mut owners = BTreeMap::new();
        let mut sequence = 0usize;

        for constraint in &model.constraints {
            check_finite(constraint.rhs, || format!("rhs of row '{}'", constraint.name))?;
            for (variable, value) in constraint.coefficients() {
                if !model.variables.contains(variable) {
                    return Err(SimplexError::UnknownVariable(variable.name().to_string()));
                }
                check_finite(value, || {
                    format!("coefficient of '{variable}' in row '{}'", constraint.name)
                })?;
            }

            let mut row = constraint.clone();
            let prefix = match constraint.relation {
                Relation::LessOrEqual => "slack",
                Relation::GreaterOrEqual => {
                    row.negate_in_place();
                    "surplus"
                }
                Relation::Equal => {
                    return Err(SimplexError::UnsupportedRelation {
                        row: constraint.name.clone(),
                        relation: constraint.relation,
                    });
                }
            };

            let mut name = format!("_{prefix}{sequence}:{}", constraint.name);
            while variables.contains_name(&name) {
                sequence += 1;
                name = format!("_{prefix}{sequence}:{}", constraint.name);
            }
            sequence += 1;

            let extra = variables.register(&name);
            owners.insert(extra.clone(), constraint.name.clone());
            row.set_coefficient(&extra, 1.0);
            row.relation = Relation::Equal;

            rows.push(row);
            basic.push(extra);
        }

        debug!(
            component = "simplex",
            operation = "canonicalize",
            status = "success",
            variables = model.variables.len(),
            extra_variables = basic.len(),
            rows = rows.len(),
            "Converted model to canonical form"
        );

        Ok(Tableau {
            variables,
            rows,
            basis: Basis::from_rows(basic),
            objective: model.objective.clone(),
            owners,
        })
    }

    /// Pivot until no right-hand side is negative. Returns the pivot count.
    pub fn normalize_right_hand_sides(&self, tableau: &mut Tableau) -> Result<usize, SimplexError> {
        let mut pivots = 0;

        while let Some(row) = tableau.most_negative_rhs_row(self.tolerance) {
            if pivots >= self.max_iterations {
                return Err(SimplexError::IterationLimitExceeded {
                    phase: Phase::FeasibilityRepair,
                    limit: self.max_iterations,
                });
            }

            let entering = tableau.rows[row]
                .most_negative_coefficient_variable(self.tolerance)
                .map_err(|_| SimplexError::Infeasible(tableau.rows[row].name.clone()))?;

            self.pivot(tableau, row, &entering)?;
            pivots += 1;
        }

        debug!(
            component = "simplex",
            operation = "normalize_rhs",
            status = "success",
            pivots,
            "All right-hand sides non-negative"
        );
        Ok(pivots)
    }

    /// Bring `entering` into the basis at `row`, making its column a unit vector
    pub fn pivot(&self, tableau: &mut Tableau, row: usize, entering: &Variable) -> Result<(), SimplexError> {
        if row >= tableau.rows.len() {
            return Err(SimplexError::RowOutOfRange {
                row,
                rows: tableau.rows.len(),
            });
        }
        if tableau.basis.contains(entering) {
            return Err(SimplexError::AlreadyBasic(entering.name().to_string()));
        }
        let coefficient = tableau.rows[row].coefficient(entering);
        if coefficient.abs() <= self.tolerance {
            return Err(SimplexError::DivisionByZero(tableau.rows[row].name.clone()));
        }

        let leaving = tableau.basis.replace(row, entering.clone())?;

        tableau.rows[row].scale_in_place(coefficient)?;
        tableau.rows[row].set_coefficient(entering, 1.0);

        let pivot_row = tableau.rows[row].clone();
        for (i, other) in tableau.rows.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = other.coefficient(entering);
            if factor != 0.0 {
                other.subtract_scaled_in_place(&pivot_row, factor);
                other.set_coefficient(entering, 0.0);
            }
        }

        trace!(
            component = "simplex",
            operation = "pivot",
            row = %pivot_row.name,
            entering = %entering,
            leaving = %leaving,
            coefficient,
            "Pivoted"
        );
        Ok(())
    }

    /// Improve the objective until every reduced cost has the optimal sign.
    /// Returns the pivot count.
    pub fn optimize(&self, tableau: &mut Tableau) -> Result<usize, SimplexError> {
        let direction = tableau.objective.direction();
        let mut pivots = 0;

        loop {
            let costs = tableau.reduced_costs();
            let Some(entering) = costs.entering_variable(direction, self.tolerance) else {
                return Ok(pivots);
            };

            if pivots >= self.max_iterations {
                return Err(SimplexError::IterationLimitExceeded {
                    phase: Phase::Optimization,
                    limit: self.max_iterations,
                });
            }

            let row = self.leaving_row(tableau, &entering)?;
            self.pivot(tableau, row, &entering)?;
            pivots += 1;
        }
    }

    /// Minimum-ratio test; ties keep the first row
    ///
    /// Only rows with a positive entering coefficient qualify: a negative one
    /// would give a negative ratio and drive that row's basic variable below zero.
    fn leaving_row(&self, tableau: &Tableau, entering: &Variable) -> Result<usize, SimplexError> {
        let mut best: Option<(usize, f64)> = None;

        for (i, row) in tableau.rows.iter().enumerate() {
            let coefficient = row.coefficient(entering);
            if coefficient > self.tolerance && row.rhs >= -self.tolerance {
                let ratio = row.rhs.max(0.0) / coefficient;
                if best.is_none_or(|(_, min)| ratio < min) {
                    best = Some((i, ratio));
                }
            }
        }

        best.map(|(i, _)| i)
            .ok_or_else(|| SimplexError::Unbounded(tableau.describe(entering)))
    }

    /// Read basic values off the tableau, restricted to the model's own variables
    fn extract_solution(&self, tableau: &Tableau, model: &Model) -> Result<Solution, SimplexError> {
        let mut basic_values = BTreeMap::new();
        for (row, variable) in tableau.basis.iter() {
            let value = tableau.rows[row].rhs;
            if value < -self.tolerance {
                return Err(SimplexError::NegativeSolution {
                    variable: variable.name().to_string(),
                    value,
                });
            }
            basic_values.insert(variable, value.max(0.0));
        }

        let values: BTreeMap<String, f64> = model
            .variables
            .iter()
            .map(|v| (v.name().to_string(), basic_values.get(v).copied().unwrap_or(0.0)))
            .collect();
        let objective_value = model.objective.evaluate(&values);

        Ok(Solution {
            values,
            objective_value,
            repair_pivots: 0,
            optimization_pivots: 0,
        })
    }
}
