use crate::models::{PlanRequest, PlanTargets};
use crate::planner::constants::{KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN};

/// Per-day nutrition targets.
///
/// Macro grams are ceilings; calories are the centre of a band, not a bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutritionTargets {
    pub calories_per_day: f64,
    pub carbs_g: u32,
    pub fat_g: u32,
    pub protein_g: u32,
}

impl NutritionTargets {
    /// Calorie window `[target - band, target + band]`.
    pub fn calorie_band(&self, band: f64) -> (f64, f64) {
        (self.calories_per_day - band, self.calories_per_day + band)
    }

    pub fn to_plan_targets(&self) -> PlanTargets {
        PlanTargets {
            calories_per_day: self.calories_per_day,
            carbs: self.carbs_g,
            protein: self.protein_g,
            fats: self.fat_g,
        }
    }
}

fn grams(calories: f64, ratio: f64, kcal_per_gram: f64) -> u32 {
    (calories * ratio / kcal_per_gram).floor().max(0.0) as u32
}

/// Convert a daily calorie figure and macro ratios into gram ceilings.
///
/// Ratios are not required to sum to 1. Grams are floor-divided.
pub fn calculate_targets(
    calories_per_day: f64,
    carbs_ratio: f64,
    fat_ratio: f64,
    protein_ratio: f64,
) -> NutritionTargets {
    NutritionTargets {
        calories_per_day,
        carbs_g: grams(calories_per_day, carbs_ratio, KCAL_PER_GRAM_CARBS),
        fat_g: grams(calories_per_day, fat_ratio, KCAL_PER_GRAM_FAT),
        protein_g: grams(calories_per_day, protein_ratio, KCAL_PER_GRAM_PROTEIN),
    }
}

/// Targets for a validated request.
pub fn targets_for(request: &PlanRequest) -> NutritionTargets {
    calculate_targets(
        request.calories,
        request.carbs_ratio,
        request.fats_ratio,
        request.protein_ratio,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_targets() {
        let t = calculate_targets(2000.0, 0.5, 0.3, 0.2);
        assert_eq!(t.carbs_g, 250);
        assert_eq!(t.fat_g, 66); // 600 / 9 = 66.67
        assert_eq!(t.protein_g, 100);
    }

    #[test]
    fn test_floor_division() {
        let t = calculate_targets(1850.0, 0.45, 0.35, 0.2);
        assert_eq!(t.carbs_g, 208); // 832.5 / 4 = 208.125
        assert_eq!(t.fat_g, 71); // 647.5 / 9 = 71.94
        assert_eq!(t.protein_g, 92); // 370 / 4 = 92.5
    }

    #[test]
    fn test_calorie_band() {
        let t = calculate_targets(2000.0, 0.5, 0.3, 0.2);
        assert_eq!(t.calorie_band(100.0), (1900.0, 2100.0));
    }
}
