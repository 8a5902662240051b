use serde::{Deserialize, Serialize};

use super::planner::DailyMeals;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestFoodsRequest {
    #[serde(default)]
    pub target_calories: Option<f64>,
    #[serde(default)]
    pub dietary_preferences: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestFoodsResponse {
    pub daily_target: f64,
    pub suggestions: DailyMeals,
    pub dietary_preferences: Vec<String>,
    /// `false` when no food matched and the whole catalog was used.
    pub preferences_applied: bool,
}
