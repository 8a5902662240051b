pub mod guidance;
mod handlers;

use axum::Router;

use crate::state::AppState;

pub use guidance::FitnessGuidance;

pub fn router() -> Router<AppState> {
    handlers::fitness_routes()
}
