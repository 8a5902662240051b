//! Greedy, randomized daily meal suggestions.
//!
//! Each meal is filled independently: one protein, one carb, one
//! vegetable/fruit and one fat source, each sized against what is left of
//! the meal's calorie budget. Output is advisory only; totals are not
//! corrected towards the target and repeated calls differ.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use super::catalog::{FoodCatalog, FoodItem};
use super::model::round_half_up;
use super::selector::Selector;
use super::NutritionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealType {
    pub fn share(self) -> f64 {
        match self {
            MealType::Breakfast => 0.25,
            MealType::Lunch => 0.35,
            MealType::Dinner => 0.30,
            MealType::Snacks => 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealEntry {
    #[serde(flatten)]
    pub food: FoodItem,
    pub servings: f64,
    pub meal_calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub meal_type: MealType,
    pub foods: Vec<MealEntry>,
    pub total_calories: i64,
    pub target_calories: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMeals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    pub snacks: Meal,
}

impl DailyMeals {
    pub fn iter(&self) -> impl Iterator<Item = &Meal> {
        [&self.breakfast, &self.lunch, &self.dinner, &self.snacks].into_iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealPlan {
    pub meals: DailyMeals,
    pub preferences_applied: bool,
}

/// Trims and lowercases tags, dropping blanks.
pub fn normalize_tags(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn suggest_meals(
    daily_target: f64,
    dietary_preferences: &[String],
    catalog: &FoodCatalog,
    selector: &mut dyn Selector,
) -> Result<MealPlan, NutritionError> {
    if !daily_target.is_finite() || daily_target <= 0.0 {
        return Err(NutritionError::Validation(
            "Target calories must be a positive number".into(),
        ));
    }
    let tags = normalize_tags(dietary_preferences);
    if tags.is_empty() {
        return Err(NutritionError::Validation(
            "At least one dietary preference is required".into(),
        ));
    }

    let selection = catalog.select(&tags);
    if !selection.preferences_applied {
        warn!(?tags, "no foods match dietary preferences; using full catalog");
    }

    let mut build = |meal_type: MealType| {
        let budget = round_half_up(daily_target * meal_type.share());
        build_meal(meal_type, budget, &selection.items, selector)
    };

    let meals = DailyMeals {
        breakfast: build(MealType::Breakfast),
        lunch: build(MealType::Lunch),
        dinner: build(MealType::Dinner),
        snacks: build(MealType::Snacks),
    };

    Ok(MealPlan {
        meals,
        preferences_applied: selection.preferences_applied,
    })
}

struct MealBuilder<'a, 'f> {
    foods: &'a [&'f FoodItem],
    used: HashSet<u32>,
    entries: Vec<MealEntry>,
    remaining: f64,
}

impl<'a, 'f> MealBuilder<'a, 'f> {
    /// Zero-calorie items are never candidates: every serving size divides
    /// by the item's calories.
    fn candidates(&self, keep: impl Fn(&FoodItem) -> bool) -> Vec<&'f FoodItem> {
        self.foods
            .iter()
            .copied()
            .filter(|f| f.calories > 0 && !self.used.contains(&f.id) && keep(*f))
            .collect()
    }

    fn take(&mut self, food: &FoodItem, servings: f64) {
        let meal_calories = food.kcal() * servings;
        self.remaining -= meal_calories;
        self.used.insert(food.id);
        self.entries.push(MealEntry {
            food: food.clone(),
            servings,
            meal_calories,
        });
    }
}

fn choose<'f>(candidates: &[&'f FoodItem], selector: &mut dyn Selector) -> Option<&'f FoodItem> {
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[selector.pick(candidates.len())])
    }
}

fn is_produce(food: &FoodItem) -> bool {
    let name = food.name.to_lowercase();
    food.calories < 100
        || name.contains("vegetable")
        || name.contains("broccoli")
        || name.contains("spinach")
}

pub fn build_meal(
    meal_type: MealType,
    budget: f64,
    foods: &[&FoodItem],
    selector: &mut dyn Selector,
) -> Meal {
    let mut meal = MealBuilder {
        foods,
        used: HashSet::new(),
        entries: Vec::new(),
        remaining: budget,
    };

    // protein
    let limit = meal.remaining * 0.4;
    let proteins = meal.candidates(|f| f.protein > 10.0 && f.kcal() <= limit);
    if let Some(food) = choose(&proteins, selector) {
        let servings = (budget * 0.3 / food.kcal()).floor().max(1.0);
        meal.take(food, servings);
    }

    // carb
    let limit = meal.remaining * 0.4;
    let carbs = meal.candidates(|f| f.carbs > 10.0 && f.kcal() <= limit);
    if meal.remaining > 100.0 {
        if let Some(food) = choose(&carbs, selector) {
            let servings = (budget * 0.25 / food.kcal()).floor().max(1.0);
            meal.take(food, servings);
        }
    }

    // vegetables and fruit
    let limit = meal.remaining;
    let produce = meal.candidates(|f| is_produce(f) && f.kcal() <= limit);
    if meal.remaining > 50.0 {
        if let Some(food) = choose(&produce, selector) {
            let servings = (meal.remaining / food.kcal()).floor().max(1.0);
            meal.take(food, servings);
        }
    }

    // fat
    if meal.remaining > 50.0 {
        let limit = meal.remaining;
        let fats = meal.candidates(|f| f.fat > 5.0 && f.kcal() <= limit);
        if let Some(food) = choose(&fats, selector) {
            let servings = (meal.remaining / food.kcal()).floor().max(0.5);
            meal.take(food, servings);
        }
    }

    let total: f64 = meal.entries.iter().map(|e| e.meal_calories).sum();
    debug!(
        ?meal_type,
        budget,
        total,
        items = meal.entries.len(),
        "meal built"
    );

    Meal {
        meal_type,
        foods: meal.entries,
        total_calories: round_half_up(total) as i64,
        target_calories: budget as i64,
    }
}
