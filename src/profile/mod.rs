mod handlers;
pub mod repo;

use axum::Router;

use crate::state::AppState;

pub use repo::{PgProfileStore, ProfileStore};

pub fn router() -> Router<AppState> {
    handlers::profile_routes()
}
