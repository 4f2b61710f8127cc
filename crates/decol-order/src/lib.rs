pub mod builder;
pub mod error;
pub mod plan;
pub mod request;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use builder::{CostMode, Decol, Layout, OrderModel, build_model};
pub use error::OrderError;
pub use plan::{
    LayoutCount, LayoutOrder, OrderOptions, OrderPlan, OrderResponse, optimize, optimize_order_json,
    round_up, solve_order,
};
pub use request::{DecolCount, DecolSpec, LayoutSpec, OrderRequest, Square};
