pub mod catalog;
mod dto;
pub mod estimator;
mod handlers;
pub mod model;
pub mod planner;
pub mod selector;

use axum::Router;
use thiserror::Error;

use crate::state::AppState;

#[derive(Debug, Error)]
pub enum NutritionError {
    #[error("{0}")]
    Validation(String),
    #[error("computation failed: {0}")]
    Computation(String),
}

pub fn router() -> Router<AppState> {
    handlers::calorie_routes()
}
