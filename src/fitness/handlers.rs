use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::guidance::{Exercise, Tip};
use crate::{auth::AuthUser, nutrition::model::Goal, state::AppState};

pub fn fitness_routes() -> Router<AppState> {
    Router::new()
        .route("/fitness/tips", get(tips))
        .route("/fitness/exercises", get(exercises))
}

#[derive(Debug, Deserialize)]
pub struct GoalQuery {
    pub goal: Option<String>,
}

impl GoalQuery {
    /// Raw goal as given, `maintain` when absent or blank.
    fn raw(self) -> String {
        self.goal
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| "maintain".into())
    }
}

#[derive(Debug, Serialize)]
pub struct TipsResponse {
    pub tips: Vec<Tip>,
    pub goal: String,
}

#[derive(Debug, Serialize)]
pub struct ExercisesResponse {
    pub exercises: Vec<Exercise>,
    pub goal: String,
}

#[instrument(skip(state))]
pub async fn tips(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<GoalQuery>,
) -> Json<TipsResponse> {
    let goal = q.raw();
    let tips = state.guidance.tips(Goal::parse(Some(&goal))).to_vec();
    debug!(%goal, count = tips.len(), "tips served");
    Json(TipsResponse { tips, goal })
}

#[instrument(skip(state))]
pub async fn exercises(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<GoalQuery>,
) -> Json<ExercisesResponse> {
    let goal = q.raw();
    let exercises = state.guidance.exercises(Goal::parse(Some(&goal))).to_vec();
    debug!(%goal, count = exercises.len(), "exercises served");
    Json(ExercisesResponse { exercises, goal })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use uuid::Uuid;

    use crate::test_support::TestApp;

    #[tokio::test]
    async fn tips_default_to_maintain() {
        let app = TestApp::new();
        let (status, body) = app.get(Uuid::new_v4(), "/api/fitness/tips").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["goal"], "maintain");
        assert_eq!(body["tips"][0]["title"], "Balance Your Calories");
    }

    #[tokio::test]
    async fn goal_is_case_insensitive_and_echoed() {
        let app = TestApp::new();
        let (status, body) = app.get(Uuid::new_v4(), "/api/fitness/exercises?goal=GAIN").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["goal"], "GAIN");
        assert_eq!(body["exercises"].as_array().unwrap().len(), 5);
        assert_eq!(body["exercises"][0]["sets"], "4-5");
    }

    #[tokio::test]
    async fn unknown_goal_serves_maintain_list() {
        let app = TestApp::new();
        let (_, body) = app.get(Uuid::new_v4(), "/api/fitness/tips?goal=bulk").await;
        assert_eq!(body["goal"], "bulk");
        assert_eq!(body["tips"][1]["title"], "Stay Active");
    }

    #[tokio::test]
    async fn guidance_requires_token() {
        let app = TestApp::new();
        let (status, body) = app.get_anonymous("/api/fitness/exercises").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing Authorization header");
    }
}
