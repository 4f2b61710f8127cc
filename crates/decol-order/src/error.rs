use decol_simplex::SimplexError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Duplicate decol id: {0}")]
    DuplicateDecol(String),
    #[error("Duplicate layout id: {0}")]
    DuplicateLayout(String),
    #[error("Layout '{layout}' references unknown decol '{decol}'")]
    UnknownLayoutDecol { layout: String, decol: String },
    #[error("Required quantity references unknown decol '{0}'")]
    UnknownRequiredDecol(String),
    #[error("Invalid square '{value}' for decol '{decol}'")]
    InvalidSquare { decol: String, value: String },
    #[error("Invalid count {value} for {context}")]
    InvalidCount { context: String, value: f64 },
    #[error("Invalid order request: {0}")]
    Json(String),
    #[error(transparent)]
    Solve(#[from] SimplexError),
}
