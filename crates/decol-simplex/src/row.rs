use std::collections::BTreeMap;

use crate::error::SimplexError;
use crate::variable::Variable;

/// Relation between a row's left-hand side and its right-hand side
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (<=)
    LessOrEqual,
    /// Greater than or equal (>=)
    GreaterOrEqual,
    /// Equal (=), produced only by canonicalization
    Equal,
}

/// Elementary row operations used by canonicalization and pivoting
pub trait RowAlgebra {
    /// Flip the sign of the right-hand side and every coefficient
    fn negate_in_place(&mut self);

    /// Divide the right-hand side and every coefficient by `divisor`
    fn scale_in_place(&mut self, divisor: f64) -> Result<(), SimplexError>;

    /// `self -= other * factor`, over the union of both rows' variables
    fn subtract_scaled_in_place(&mut self, other: &Self, factor: f64);
}

/// A linear constraint: `sum(coef * var) <relation> rhs`
///
/// Variables without an entry have an implicit coefficient of zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRow {
    /// Name/label for the row (for diagnostics)
    pub name: String,
    pub relation: Relation,
    pub rhs: f64,
    coefficients: BTreeMap<Variable, f64>,
}

impl LinearRow {
    pub fn new(name: impl Into<String>, relation: Relation, rhs: f64) -> Self {
        Self {
            name: name.into(),
            relation,
            rhs,
            coefficients: BTreeMap::new(),
        }
    }

    pub fn with_coefficient(mut self, variable: &Variable, value: f64) -> Self {
        self.set_coefficient(variable, value);
        self
    }

    pub fn set_coefficient(&mut self, variable: &Variable, value: f64) {
        self.coefficients.insert(variable.clone(), value);
    }

    pub fn coefficient(&self, variable: &Variable) -> f64 {
        self.coefficients.get(variable).copied().unwrap_or(0.0)
    }

    /// Explicit entries in variable-name order
    pub fn coefficients(&self) -> impl Iterator<Item = (&Variable, f64)> {
        self.coefficients.iter().map(|(v, &c)| (v, c))
    }

    /// Evaluate the left-hand side against an assignment keyed by variable name
    pub fn evaluate(&self, values: &BTreeMap<String, f64>) -> f64 {
        self.coefficients
            .iter()
            .map(|(v, c)| c * values.get(v.name()).copied().unwrap_or(0.0))
            .sum()
    }

    /// The variable with the most negative coefficient below `-tolerance`
    ///
    /// Ties keep the first variable in name order.
    pub fn most_negative_coefficient_variable(&self, tolerance: f64) -> Result<Variable, SimplexError> {
        let mut best: Option<(&Variable, f64)> = None;
        for (variable, &value) in &self.coefficients {
            if value < -tolerance && best.is_none_or(|(_, current)| value < current) {
                best = Some((variable, value));
            }
        }
        best.map(|(v, _)| v.clone())
            .ok_or_else(|| SimplexError::NoNegativeCoefficient(self.name.clone()))
    }
}

impl RowAlgebra for LinearRow {
    fn negate_in_place(&mut self) {
        self.rhs = -self.rhs;
        for value in self.coefficients.values_mut() {
            *value = -*value;
        }
    }

    fn scale_in_place(&mut self, divisor: f64) -> Result<(), SimplexError> {
        if divisor == 0.0 {
            return Err(SimplexError::DivisionByZero(self.name.clone()));
        }
        self.rhs /= divisor;
        for value in self.coefficients.values_mut() {
            *value /= divisor;
        }
        Ok(())
    }

    fn subtract_scaled_in_place(&mut self, other: &Self, factor: f64) {
        self.rhs -= other.rhs * factor;
        for (variable, &value) in &other.coefficients {
            *self.coefficients.entry(variable.clone()).or_insert(0.0) -= value * factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::VariableRegistry;

    fn vars() -> (Variable, Variable, Variable) {
        let mut registry = VariableRegistry::new();
        (registry.register("x"), registry.register("y"), registry.register("z"))
    }

    #[test]
    fn test_negate() {
        let (x, y, _) = vars();
        let mut row = LinearRow::new("r", Relation::GreaterOrEqual, 4.0)
            .with_coefficient(&x, 1.0)
            .with_coefficient(&y, -2.0);
        row.negate_in_place();
        assert_eq!(row.rhs, -4.0);
        assert_eq!(row.coefficient(&x), -1.0);
        assert_eq!(row.coefficient(&y), 2.0);
    }

    #[test]
    fn test_scale_rejects_zero() {
        let (x, _, _) = vars();
        let mut row = LinearRow::new("r", Relation::Equal, 6.0).with_coefficient(&x, 3.0);
        assert_eq!(row.scale_in_place(0.0), Err(SimplexError::DivisionByZero("r".into())));
        assert_eq!(row.rhs, 6.0);

        row.scale_in_place(3.0).unwrap();
        assert_eq!(row.rhs, 2.0);
        assert_eq!(row.coefficient(&x), 1.0);
    }

    #[test]
    fn test_subtract_scaled_covers_missing_entries() {
        let (x, y, z) = vars();
        let mut row = LinearRow::new("a", Relation::Equal, 10.0)
            .with_coefficient(&x, 2.0)
            .with_coefficient(&y, 1.0);
        let other = LinearRow::new("b", Relation::Equal, 3.0)
            .with_coefficient(&x, 1.0)
            .with_coefficient(&z, 1.0);

        row.subtract_scaled_in_place(&other, 2.0);

        assert_eq!(row.rhs, 4.0);
        assert_eq!(row.coefficient(&x), 0.0);
        assert_eq!(row.coefficient(&y), 1.0);
        assert_eq!(row.coefficient(&z), -2.0);
    }

    #[test]
    fn test_most_negative_coefficient() {
        let (x, y, z) = vars();
        let row = LinearRow::new("r", Relation::Equal, -1.0)
            .with_coefficient(&x, -1.0)
            .with_coefficient(&y, -3.0)
            .with_coefficient(&z, -3.0);
        assert_eq!(row.most_negative_coefficient_variable(1e-9).unwrap(), y);

        let row = LinearRow::new("pos", Relation::Equal, -1.0).with_coefficient(&x, 1.0);
        assert_eq!(
            row.most_negative_coefficient_variable(1e-9),
            Err(SimplexError::NoNegativeCoefficient("pos".into()))
        );
    }

    #[test]
    fn test_clone_is_deep() {
        let (x, _, _) = vars();
        let row = LinearRow::new("r", Relation::LessOrEqual, 1.0).with_coefficient(&x, 1.0);
        let mut copy = row.clone();
        copy.negate_in_place();
        assert_eq!(row.coefficient(&x), 1.0);
        assert_eq!(copy.coefficient(&x), -1.0);
    }
}
