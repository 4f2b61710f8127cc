use decol_order::{CostMode, OrderOptions, OrderResponse, optimize, optimize_order_json, OrderRequest};

const REQUEST: &str = r#"{
    "decoli": [
        { "id": "d1", "square": "15,0" },
        { "id": "d2", "square": "5,0" },
        { "id": "d3", "square": "25" }
    ],
    "layouts": [
        { "id": "l1", "minOrder": 1, "decoli": [{ "decolId": "d1", "count": 15 }, { "decolId": "d2", "count": 5 }] },
        { "id": "l2", "minOrder": 1, "decoli": [{ "decolId": "d1", "count": 10 }, { "decolId": "d2", "count": 10 }] },
        { "id": "l3", "minOrder": 1, "decoli": [
            { "decolId": "d1", "count": 4 }, { "decolId": "d2", "count": 6 }, { "decolId": "d3", "count": 6 }
        ] }
    ],
    "required": [
        { "decolId": "d1", "count": 1200 },
        { "decolId": "d2", "count": 500 },
        { "decolId": "d3", "count": 30 }
    ]
}"#;

fn parse(json: &str) -> OrderResponse {
    serde_json::from_str(json).expect("response is valid JSON")
}

#[test]
fn test_three_layouts_by_area() {
    let response = parse(&optimize_order_json(REQUEST, &OrderOptions::default()));

    assert_eq!(response.error, "");
    let counts: Vec<(&str, u64)> = response
        .result
        .iter()
        .map(|c| (c.layout_id.as_str(), c.count))
        .collect();
    // continuous optimum is l1 = 71, l2 = 11.5, l3 = 5
    assert_eq!(counts, vec![("l1", 71), ("l2", 12), ("l3", 5)]);
}

#[test]
fn test_rounded_counts_meet_requirements() {
    let request = OrderRequest::from_json(REQUEST).unwrap();

    for objective in [CostMode::Area, CostMode::LayoutCount] {
        let options = OrderOptions {
            objective,
            ..OrderOptions::default()
        };
        let plan = optimize(&request, &options).unwrap();

        for required in &request.required {
            assert!(
                plan.produced[&required.decol_id] >= required.count,
                "{:?}: {} produced {} < {}",
                objective,
                required.decol_id,
                plan.produced[&required.decol_id],
                required.count
            );
        }
        for (layout, ordered) in request.layouts.iter().zip(&plan.layouts) {
            assert!(ordered.count as f64 >= layout.min_order);
        }
        assert!(plan.wasted_area >= 0.0);
    }
}

#[test]
fn test_layout_count_objective() {
    let request = OrderRequest::from_json(REQUEST).unwrap();
    let options = OrderOptions {
        objective: CostMode::LayoutCount,
        ..OrderOptions::default()
    };

    let plan = optimize(&request, &options).unwrap();

    assert!((plan.objective_value - 87.5).abs() < 1e-6, "obj = {}", plan.objective_value);
}

#[test]
fn test_unproducible_decol_is_infeasible() {
    let json = r#"{
        "decoli": [{ "id": "d1", "square": 1 }, { "id": "d2", "square": 1 }],
        "layouts": [{ "id": "l1", "minOrder": 0, "decoli": [{ "decolId": "d1", "count": 2 }] }],
        "required": [{ "decolId": "d2", "count": 3 }]
    }"#;

    let response = parse(&optimize_order_json(json, &OrderOptions::default()));

    assert!(response.error.starts_with("Infeasible"), "error = {}", response.error);
    assert!(response.result.is_empty());
}

#[test]
fn test_bad_input_is_reported_not_raised() {
    let response = parse(&optimize_order_json("not json", &OrderOptions::default()));
    assert!(response.error.starts_with("Invalid order request"));
    assert!(response.result.is_empty());

    let json = r#"{
        "decoli": [{ "id": "d1", "square": 1 }],
        "layouts": [{ "id": "l1", "minOrder": 1, "decoli": [{ "decolId": "nope", "count": 2 }] }],
        "required": []
    }"#;
    let response = parse(&optimize_order_json(json, &OrderOptions::default()));
    assert_eq!(response.error, "Layout 'l1' references unknown decol 'nope'");
}
