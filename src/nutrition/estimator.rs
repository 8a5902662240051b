//! Mifflin-St Jeor energy estimate and the fixed macro split derived from it.

use super::model::{
    round_half_up, EstimationResult, MacroSplit, Macros, Profile, ProfileFields, Sex,
};
use super::NutritionError;

const PROTEIN_KCAL_PER_G: f64 = 4.0;
const CARB_KCAL_PER_G: f64 = 4.0;
const FAT_KCAL_PER_G: f64 = 9.0;

/// Protein target is ~1 g per pound of body weight.
const PROTEIN_G_PER_KG: f64 = 2.2;
const FAT_SHARE: f64 = 0.25;

pub fn bmr(profile: &Profile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

pub fn tdee(profile: &Profile) -> f64 {
    bmr(profile) * profile.activity.multiplier()
}

/// Validates `fields` and runs the estimate.
pub fn estimate(fields: &ProfileFields) -> Result<EstimationResult, NutritionError> {
    let profile = Profile::try_from(fields)?;
    estimate_profile(&profile)
}

pub fn estimate_profile(profile: &Profile) -> Result<EstimationResult, NutritionError> {
    let bmr_kcal = bmr(profile);
    let tdee_kcal = tdee(profile);
    // adjustment goes on the unrounded TDEE; rounding happens on output only
    let target = tdee_kcal + profile.goal.calorie_adjustment();

    let protein_g = round_half_up(profile.weight_kg * PROTEIN_G_PER_KG);
    let protein_kcal = protein_g * PROTEIN_KCAL_PER_G;
    let fat_g = round_half_up(target * FAT_SHARE / FAT_KCAL_PER_G);
    let fat_kcal = fat_g * FAT_KCAL_PER_G;
    let carb_kcal = target - protein_kcal - fat_kcal;
    let carb_g = round_half_up(carb_kcal / CARB_KCAL_PER_G);

    let values = [bmr_kcal, tdee_kcal, target, protein_kcal, fat_kcal, carb_kcal];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(NutritionError::Computation(
            "energy estimate is not a finite number".into(),
        ));
    }
    if target <= 0.0 {
        return Err(NutritionError::Computation(format!(
            "target calories {target:.2} is not positive; macro split is undefined"
        )));
    }

    let split = |grams: f64, calories: f64| MacroSplit {
        grams: grams as i64,
        calories,
        percentage: round_half_up(calories / target * 100.0) as i64,
    };

    Ok(EstimationResult {
        bmr: round_half_up(bmr_kcal) as i64,
        tdee: round_half_up(tdee_kcal) as i64,
        target_calories: round_half_up(target) as i64,
        goal: profile.goal,
        activity_level: profile.activity,
        macros: Macros {
            protein: split(protein_g, protein_kcal),
            carbs: split(carb_g, carb_kcal),
            fat: split(fat_g, fat_kcal),
        },
    })
}
