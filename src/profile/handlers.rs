use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::repo::StoredProfile;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    nutrition::model::ProfileFields,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(get_profile).put(put_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<StoredProfile>> {
    state
        .profiles
        .get(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))
}

#[instrument(skip(state, payload))]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<ProfileFields>, JsonRejection>,
) -> ApiResult<Json<StoredProfile>> {
    let Json(fields) = payload?;
    fields.check_provided()?;

    let stored = state.profiles.upsert(user_id, &fields).await?;
    info!(%user_id, "profile updated");
    Ok(Json(stored))
}
