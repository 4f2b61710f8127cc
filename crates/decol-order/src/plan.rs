use std::collections::BTreeMap;

use decol_simplex::Solver;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::builder::{CostMode, OrderModel, build_model};
use crate::error::OrderError;
use crate::request::OrderRequest;

/// Continuous values closer than this to an integer round to it instead of up
const ROUNDING_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Default)]
pub struct OrderOptions {
    pub objective: CostMode,
    pub solver: Solver,
}

/// Ordered quantity of one layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOrder {
    pub layout_id: String,
    /// LP value before rounding
    pub value: f64,
    /// Whole layouts to order
    pub count: u64,
}

/// A solved order, rounded up to whole layouts
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlan {
    /// One entry per layout, in request order
    pub layouts: Vec<LayoutOrder>,
    /// Decol id -> pieces produced by the rounded order
    pub produced: BTreeMap<String, f64>,
    /// Area produced beyond what was required
    pub wasted_area: f64,
    /// Objective value of the continuous optimum
    pub objective_value: f64,
}

/// Boundary shape of an answer: a non-empty `error` means no plan was found
/// and `result` is empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub error: String,
    pub result: Vec<LayoutCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCount {
    pub layout_id: String,
    pub count: u64,
}

pub fn round_up(value: f64) -> u64 {
    let nearest = value.round();
    let rounded = if (value - nearest).abs() <= ROUNDING_TOLERANCE {
        nearest
    } else {
        value.ceil()
    };
    rounded.max(0.0) as u64
}

/// Build, solve and round an order
pub fn optimize(request: &OrderRequest, options: &OrderOptions) -> Result<OrderPlan, OrderError> {
    let order = build_model(request, options.objective)?;
    solve_order(&order, &options.solver)
}

pub fn solve_order(order: &OrderModel, solver: &Solver) -> Result<OrderPlan, OrderError> {
    let solution = solver.try_solve(&order.model)?;

    let layouts: Vec<LayoutOrder> = order
        .layouts
        .iter()
        .map(|layout| {
            let value = solution.value(&layout.id);
            LayoutOrder {
                layout_id: layout.id.clone(),
                value,
                count: round_up(value),
            }
        })
        .collect();

    let mut produced: BTreeMap<String, f64> = order.decols.iter().map(|d| (d.id.clone(), 0.0)).collect();
    for (layout, ordered) in order.layouts.iter().zip(&layouts) {
        for (decol, pieces) in &layout.parts {
            *produced.entry(decol.clone()).or_insert(0.0) += pieces * ordered.count as f64;
        }
    }

    let wasted_area = order
        .decols
        .iter()
        .map(|d| (produced[&d.id] - order.required_of(&d.id)) * d.square)
        .sum();

    debug!(
        component = "order",
        operation = "solve",
        status = "success",
        layouts = layouts.len(),
        wasted_area,
        "Solved order"
    );

    Ok(OrderPlan {
        layouts,
        produced,
        wasted_area,
        objective_value: solution.objective_value,
    })
}

impl From<Result<OrderPlan, OrderError>> for OrderResponse {
    fn from(outcome: Result<OrderPlan, OrderError>) -> Self {
        match outcome {
            Ok(plan) => Self {
                error: String::new(),
                result: plan
                    .layouts
                    .into_iter()
                    .map(|l| LayoutCount {
                        layout_id: l.layout_id,
                        count: l.count,
                    })
                    .collect(),
            },
            Err(err) => Self {
                error: err.to_string(),
                result: Vec::new(),
            },
        }
    }
}

/// JSON in, JSON out; failures are reported inside the response
pub fn optimize_order_json(json: &str, options: &OrderOptions) -> String {
    let outcome = OrderRequest::from_json(json).and_then(|request| optimize(&request, options));
    if let Err(err) = &outcome {
        warn!(
            component = "order",
            operation = "optimize_json",
            status = "failure",
            error = %err,
            "Order optimization failed"
        );
    }
    let response = OrderResponse::from(outcome);
    serde_json::to_string(&response)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string(), "result": [] }).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(300.0), 300);
        assert_eq!(round_up(300.0000000001), 300);
        assert_eq!(round_up(299.9999999), 300);
        assert_eq!(round_up(11.5), 12);
        assert_eq!(round_up(0.2), 1);
        assert_eq!(round_up(0.0), 0);
    }

    #[test]
    fn test_error_response_is_empty() {
        let response = OrderResponse::from(Err(OrderError::DuplicateDecol("d1".into())));
        assert_eq!(response.error, "Duplicate decol id: d1");
        assert!(response.result.is_empty());
    }

    #[test]
    fn test_json_error_is_escaped() {
        let json = optimize_order_json(r#"{"decoli": "oops \"quoted\""}"#, &OrderOptions::default());
        let response: OrderResponse = serde_json::from_str(&json).unwrap();
        assert!(response.error.starts_with("Invalid order request"), "error = {}", response.error);
        assert!(response.result.is_empty());
    }

    #[test]
    fn test_optimize_two_layouts() {
        let json = r#"{
            "decoli": [
                { "id": "d1", "square": 10 },
                { "id": "d2", "square": 50 },
                { "id": "d3", "square": 80 }
            ],
            "layouts": [
                { "id": "layout1", "minOrder": 50, "decoli": [{ "decolId": "d1", "count": 5 }, { "decolId": "d2", "count": 7 }] },
                { "id": "layout2", "minOrder": 100, "decoli": [{ "decolId": "d2", "count": 15 }, { "decolId": "d3", "count": 3 }] }
            ],
            "required": [
                { "decolId": "d1", "count": 1500 },
                { "decolId": "d2", "count": 2300 },
                { "decolId": "d3", "count": 1800 }
            ]
        }"#;
        let request = OrderRequest::from_json(json).unwrap();

        let plan = optimize(&request, &OrderOptions::default()).unwrap();

        assert_eq!(plan.layouts[0].count, 300);
        assert_eq!(plan.layouts[1].count, 600);
        assert_eq!(plan.produced["d1"], 1500.0);
        assert_eq!(plan.produced["d2"], 7.0 * 300.0 + 15.0 * 600.0);
        assert_eq!(plan.produced["d3"], 1800.0);
        // only d2 is overproduced: (11100 - 2300) * 50
        assert!((plan.wasted_area - 440000.0).abs() < 1e-6, "wasted = {}", plan.wasted_area);
        assert!((plan.objective_value - (300.0 * 400.0 + 600.0 * 990.0)).abs() < 1e-6);
    }
}
