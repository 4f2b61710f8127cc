//! WASM bindings for decol order optimization
//!
//! Both entry points use the default options: area cost and the default
//! solver limits.

use wasm_bindgen::prelude::*;

use crate::plan::{OrderOptions, OrderResponse, optimize as optimize_request, optimize_order_json};
use crate::request::OrderRequest;

/// Optimize an order given as a JSON string, returning the response as a JSON string
#[wasm_bindgen(js_name = optimizeDecolsOrder)]
pub fn optimize_decols_order(json: &str) -> String {
    optimize_order_json(json, &OrderOptions::default())
}

/// Optimize an order given as a plain JavaScript object
#[wasm_bindgen]
pub fn optimize(value: JsValue) -> Result<JsValue, JsValue> {
    let request: OrderRequest =
        serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let response = OrderResponse::from(optimize_request(&request, &OrderOptions::default()));
    serde_wasm_bindgen::to_value(&response).map_err(|e| JsValue::from_str(&e.to_string()))
}
