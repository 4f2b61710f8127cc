use std::collections::{BTreeMap, HashSet};

use decol_simplex::{LinearRow, Model, Relation, TargetFunction, Variable};
use tracing::debug;

use crate::error::OrderError;
use crate::request::OrderRequest;

/// What the order minimizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostMode {
    /// Total area of every decol on every ordered layout
    #[default]
    Area,
    /// Number of layouts ordered
    LayoutCount,
}

/// A base material piece
#[derive(Debug, Clone, PartialEq)]
pub struct Decol {
    pub id: String,
    pub square: f64,
}

/// A fixed recipe of decols with a minimum order quantity
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub id: String,
    pub min_order: f64,
    /// Decol id -> pieces per layout
    pub parts: BTreeMap<String, f64>,
}

impl Layout {
    pub fn count_of(&self, decol: &str) -> f64 {
        self.parts.get(decol).copied().unwrap_or(0.0)
    }

    pub fn area(&self, decols: &[Decol]) -> f64 {
        decols.iter().map(|d| d.square * self.count_of(&d.id)).sum()
    }
}

/// A validated order together with the LP model built from it
#[derive(Debug, Clone)]
pub struct OrderModel {
    pub decols: Vec<Decol>,
    pub layouts: Vec<Layout>,
    /// Decol id -> required pieces; decols not listed require zero
    pub required: BTreeMap<String, f64>,
    pub model: Model,
}

impl OrderModel {
    pub fn required_of(&self, decol: &str) -> f64 {
        self.required.get(decol).copied().unwrap_or(0.0)
    }
}

fn check_count(context: impl FnOnce() -> String, value: f64) -> Result<f64, OrderError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(OrderError::InvalidCount {
            context: context(),
            value,
        })
    }
}

/// Validate the request and translate it into an LP model: one variable per
/// layout, a `>=` row per layout minimum and per decol requirement
pub fn build_model(request: &OrderRequest, mode: CostMode) -> Result<OrderModel, OrderError> {
    let mut decols = Vec::with_capacity(request.decoli.len());
    let mut decol_ids = HashSet::new();
    for spec in &request.decoli {
        if !decol_ids.insert(spec.id.as_str()) {
            return Err(OrderError::DuplicateDecol(spec.id.clone()));
        }
        decols.push(Decol {
            id: spec.id.clone(),
            square: spec.square.value(&spec.id)?,
        });
    }

    let mut layouts = Vec::with_capacity(request.layouts.len());
    let mut layout_ids = HashSet::new();
    for spec in &request.layouts {
        if !layout_ids.insert(spec.id.as_str()) {
            return Err(OrderError::DuplicateLayout(spec.id.clone()));
        }
        let mut parts = BTreeMap::new();
        for part in &spec.decoli {
            if !decol_ids.contains(part.decol_id.as_str()) {
                return Err(OrderError::UnknownLayoutDecol {
                    layout: spec.id.clone(),
                    decol: part.decol_id.clone(),
                });
            }
            let count = check_count(|| format!("decol '{}' in layout '{}'", part.decol_id, spec.id), part.count)?;
            *parts.entry(part.decol_id.clone()).or_insert(0.0) += count;
        }
        layouts.push(Layout {
            id: spec.id.clone(),
            min_order: check_count(|| format!("minimum order of layout '{}'", spec.id), spec.min_order)?,
            parts,
        });
    }

    let mut required = BTreeMap::new();
    for entry in &request.required {
        if !decol_ids.contains(entry.decol_id.as_str()) {
            return Err(OrderError::UnknownRequiredDecol(entry.decol_id.clone()));
        }
        let count = check_count(|| format!("required decol '{}'", entry.decol_id), entry.count)?;
        required.insert(entry.decol_id.clone(), count);
    }

    let mut model = Model::new();
    let variables: Vec<Variable> = layouts.iter().map(|l| model.add_variable(&l.id)).collect();

    for (layout, variable) in layouts.iter().zip(&variables) {
        model.add_constraint(
            LinearRow::new(format!("min_order:{}", layout.id), Relation::GreaterOrEqual, layout.min_order)
                .with_coefficient(variable, 1.0),
        );
    }

    for decol in &decols {
        let mut row = LinearRow::new(
            format!("required:{}", decol.id),
            Relation::GreaterOrEqual,
            required.get(&decol.id).copied().unwrap_or(0.0),
        );
        for (layout, variable) in layouts.iter().zip(&variables) {
            row.set_coefficient(variable, layout.count_of(&decol.id));
        }
        model.add_constraint(row);
    }

    let costs = layouts.iter().zip(&variables).map(|(layout, variable)| {
        let cost = match mode {
            CostMode::Area => layout.area(&decols),
            CostMode::LayoutCount => 1.0,
        };
        (variable.clone(), cost)
    });
    model.set_objective(TargetFunction::minimize(costs.collect::<Vec<_>>()));

    debug!(
        component = "order",
        operation = "build_model",
        status = "success",
        decols = decols.len(),
        layouts = layouts.len(),
        constraints = model.num_constraints(),
        mode = ?mode,
        "Built order model"
    );

    Ok(OrderModel {
        decols,
        layouts,
        required,
        model,
    })
}
