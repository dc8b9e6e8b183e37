use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::MealType;

/// Longest horizon a request may ask for.
pub const MAX_DAYS: usize = 14;

/// A meal plan request as received from a caller, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MealPlanRequest {
    pub calories: f64,
    #[serde(alias = "carbs")]
    pub carbs_ratio: f64,
    #[serde(alias = "fats")]
    pub fats_ratio: f64,
    #[serde(alias = "protein")]
    pub protein_ratio: f64,
    /// Canonical meal type indices (0 = breakfast .. 4 = dinner).
    #[serde(alias = "types")]
    pub meal_types: Vec<u8>,
    pub days: usize,
}

impl Default for MealPlanRequest {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            carbs_ratio: 0.5,
            fats_ratio: 0.3,
            protein_ratio: 0.2,
            meal_types: vec![0, 1, 2, 3, 4],
            days: 7,
        }
    }
}

/// A request whose fields have been range-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub calories: f64,
    pub carbs_ratio: f64,
    pub fats_ratio: f64,
    pub protein_ratio: f64,
    pub meal_types: Vec<MealType>,
    pub days: usize,
}

fn check_ratio(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PlanError::InvalidInput(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )))
    }
}

impl MealPlanRequest {
    /// Range-check every field.
    ///
    /// Duplicate meal types are dropped, keeping the first occurrence.
    pub fn validate(&self) -> Result<PlanRequest> {
        if !self.calories.is_finite() || self.calories <= 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "calories must be positive, got {}",
                self.calories
            )));
        }
        check_ratio("carbsRatio", self.carbs_ratio)?;
        check_ratio("fatsRatio", self.fats_ratio)?;
        check_ratio("proteinRatio", self.protein_ratio)?;

        if !(1..=MAX_DAYS).contains(&self.days) {
            return Err(PlanError::InvalidInput(format!(
                "days must be between 1 and {}, got {}",
                MAX_DAYS, self.days
            )));
        }

        let mut meal_types: Vec<MealType> = Vec::with_capacity(self.meal_types.len());
        for &index in &self.meal_types {
            let mt = MealType::from_index(index).ok_or_else(|| {
                PlanError::InvalidInput(format!("Unknown meal type index {}", index))
            })?;
            if !meal_types.contains(&mt) {
                meal_types.push(mt);
            }
        }
        if meal_types.is_empty() {
            return Err(PlanError::InvalidInput(
                "at least one meal type is required".to_string(),
            ));
        }

        Ok(PlanRequest {
            calories: self.calories,
            carbs_ratio: self.carbs_ratio,
            fats_ratio: self.fats_ratio,
            protein_ratio: self.protein_ratio,
            meal_types,
            days: self.days,
        })
    }
}
