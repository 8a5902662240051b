use serde::{Deserialize, Serialize};

use super::NutritionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Anything other than "male" uses the female equation.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("male") {
            Sex::Male
        } else {
            Sex::Female
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    #[cfg(test)]
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// Unknown or missing levels fall back to moderate.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("sedentary") => ActivityLevel::Sedentary,
            Some("light") => ActivityLevel::Light,
            Some("active") => ActivityLevel::Active,
            Some("very_active") => ActivityLevel::VeryActive,
            _ => ActivityLevel::Moderate,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    /// Unknown or missing goals carry no calorie adjustment, same as maintain.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("lose") => Goal::Lose,
            Some("gain") => Goal::Gain,
            _ => Goal::Maintain,
        }
    }

    pub fn calorie_adjustment(self) -> f64 {
        match self {
            Goal::Lose => -500.0,
            Goal::Maintain => 0.0,
            Goal::Gain => 500.0,
        }
    }
}

/// Wire-level body metrics. Every field may be absent; the calculator fills
/// gaps from the stored profile before validating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    /// Centimetres.
    #[serde(default)]
    pub height: Option<f64>,
    /// Kilograms.
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

fn non_blank(v: &Option<String>) -> Option<String> {
    v.as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ProfileFields {
    /// Field-by-field merge: values present here win, blanks and
    /// non-positive numbers are taken from `fallback`.
    pub fn or(&self, fallback: &ProfileFields) -> ProfileFields {
        ProfileFields {
            age: self.age.filter(|a| *a > 0).or(fallback.age),
            gender: non_blank(&self.gender).or_else(|| fallback.gender.clone()),
            height: positive(self.height).or(fallback.height),
            weight: positive(self.weight).or(fallback.weight),
            activity_level: non_blank(&self.activity_level)
                .or_else(|| fallback.activity_level.clone()),
            goal: non_blank(&self.goal).or_else(|| fallback.goal.clone()),
        }
    }

    /// Rejects provided numbers that are zero, negative or not finite.
    /// Absent fields are fine.
    pub fn check_provided(&self) -> Result<(), NutritionError> {
        let mut bad = Vec::new();
        if self.age == Some(0) {
            bad.push("age");
        }
        if self.height.is_some() && positive(self.height).is_none() {
            bad.push("height");
        }
        if self.weight.is_some() && positive(self.weight).is_none() {
            bad.push("weight");
        }
        if bad.is_empty() {
            Ok(())
        } else {
            Err(NutritionError::Validation(format!(
                "Must be positive numbers: {}",
                bad.join(", ")
            )))
        }
    }
}

/// Validated input to the estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub sex: Sex,
    pub activity: ActivityLevel,
    pub goal: Goal,
}

impl TryFrom<&ProfileFields> for Profile {
    type Error = NutritionError;

    fn try_from(fields: &ProfileFields) -> Result<Self, Self::Error> {
        let age = fields.age.filter(|a| *a > 0);
        let weight = positive(fields.weight);
        let height = positive(fields.height);
        let gender = non_blank(&fields.gender);

        match (age, weight, height, gender) {
            (Some(age), Some(weight_kg), Some(height_cm), Some(gender)) => Ok(Profile {
                age,
                weight_kg,
                height_cm,
                sex: Sex::parse(&gender),
                activity: ActivityLevel::parse(fields.activity_level.as_deref()),
                goal: Goal::parse(fields.goal.as_deref()),
            }),
            (age, weight, height, gender) => {
                let missing: Vec<&str> = [
                    ("age", age.is_none()),
                    ("weight", weight.is_none()),
                    ("height", height.is_none()),
                    ("gender", gender.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(NutritionError::Validation(format!(
                    "Age, weight, height, and gender are required (missing or invalid: {})",
                    missing.join(", ")
                )))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroSplit {
    pub grams: i64,
    pub calories: f64,
    pub percentage: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Macros {
    pub protein: MacroSplit,
    pub carbs: MacroSplit,
    pub fat: MacroSplit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationResult {
    pub bmr: i64,
    pub tdee: i64,
    pub target_calories: i64,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub macros: Macros,
}

/// Half-up rounding, `round(-2.5) == -2`.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
