use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{SuggestFoodsRequest, SuggestFoodsResponse},
    estimator,
    model::{EstimationResult, ProfileFields},
    planner,
    selector::RngSelector,
};
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn calorie_routes() -> Router<AppState> {
    Router::new()
        .route("/calories/calculate", post(calculate))
        .route("/calories/suggest-foods", post(suggest_foods))
}

/// Fields missing from the body are taken from the caller's stored profile.
/// Numbers that are present must already be valid; they are never replaced.
#[instrument(skip(state, payload))]
pub async fn calculate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<ProfileFields>, JsonRejection>,
) -> ApiResult<Json<EstimationResult>> {
    let Json(body) = payload?;
    body.check_provided()?;
    let fields = match state.profiles.get(user_id).await? {
        Some(stored) => body.or(&stored.fields),
        None => body,
    };

    let result = estimator::estimate(&fields)?;
    info!(
        %user_id,
        bmr = result.bmr,
        target = result.target_calories,
        goal = ?result.goal,
        "calories calculated"
    );
    Ok(Json(result))
}

#[instrument(skip(state, payload))]
pub async fn suggest_foods(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<SuggestFoodsRequest>, JsonRejection>,
) -> ApiResult<Json<SuggestFoodsResponse>> {
    let Json(body) = payload?;
    let (Some(target), Some(preferences)) = (body.target_calories, body.dietary_preferences)
    else {
        return Err(ApiError::Validation(
            "Target calories and dietary preferences are required".into(),
        ));
    };

    let plan = {
        let mut selector = RngSelector::thread_local();
        planner::suggest_meals(target, &preferences, &state.catalog, &mut selector)?
    };

    info!(
        %user_id,
        target,
        items = plan.meals.iter().map(|m| m.foods.len()).sum::<usize>(),
        preferences_applied = plan.preferences_applied,
        "meal plan suggested"
    );
    Ok(Json(SuggestFoodsResponse {
        daily_target: target,
        suggestions: plan.meals,
        dietary_preferences: preferences,
        preferences_applied: plan.preferences_applied,
    }))
}
