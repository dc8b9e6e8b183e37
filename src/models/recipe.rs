use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::{PlanError, Result};
use crate::models::{MealType, Nutrition};

/// A recipe with per-serving nutrition facts and the meal slots it suits.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: u32,
    pub name: String,
    pub calories: f64,
    pub carbs: f64,
    pub fats: f64,
    pub protein: f64,
    pub meal_types: BTreeSet<MealType>,
    /// Servings one preparation yields; caps the greedy allocation.
    pub servings: u32,
}

impl Recipe {
    /// Nutrition of a single serving.
    #[inline]
    pub fn nutrition(&self) -> Nutrition {
        Nutrition::new(self.calories, self.carbs, self.protein, self.fats)
    }

    #[inline]
    pub fn suits(&self, meal_type: MealType) -> bool {
        self.meal_types.contains(&meal_type)
    }

    /// True when the recipe suits at least one of the given meal types.
    pub fn suits_any(&self, meal_types: &[MealType]) -> bool {
        meal_types.iter().any(|mt| self.suits(*mt))
    }

    /// Basic validation: non-negative nutrition and at least one meal type.
    pub fn is_valid(&self) -> bool {
        self.calories >= 0.0
            && self.carbs >= 0.0
            && self.fats >= 0.0
            && self.protein >= 0.0
            && !self.meal_types.is_empty()
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "#{} {}: {} kcal, C:{} F:{} P:{}, serves {}",
            self.id, self.name, self.calories, self.carbs, self.fats, self.protein, self.servings
        )
    }
}

/// A recipe row as stored in the catalog file.
///
/// `categories` is a comma-separated list of canonical meal type indices.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeRecord {
    pub id: u32,
    pub name: String,
    #[serde(rename = "energy_kcal")]
    pub calories: f64,
    pub carbs: f64,
    #[serde(rename = "total_fats", alias = "fat", alias = "fats")]
    pub fats: f64,
    pub protein: f64,
    pub categories: String,
    #[serde(default = "default_servings")]
    pub servings: u32,
}

fn default_servings() -> u32 {
    1
}

/// Parse a `categories` cell such as `"0,2,4"`.
pub fn parse_categories(raw: &str) -> Result<BTreeSet<MealType>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let index: u8 = part
                .parse()
                .map_err(|_| PlanError::InvalidInput(format!("Invalid category '{}'", part)))?;
            MealType::from_index(index)
                .ok_or_else(|| PlanError::InvalidInput(format!("Unknown category {}", index)))
        })
        .collect()
}

impl TryFrom<RecipeRecord> for Recipe {
    type Error = PlanError;

    fn try_from(record: RecipeRecord) -> Result<Self> {
        let recipe = Recipe {
            id: record.id,
            meal_types: parse_categories(&record.categories)?,
            name: record.name,
            calories: record.calories,
            carbs: record.carbs,
            fats: record.fats,
            protein: record.protein,
            servings: record.servings,
        };

        if !recipe.is_valid() {
            return Err(PlanError::InvalidInput(format!(
                "Recipe {} has negative nutrition or no categories",
                recipe.id
            )));
        }

        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> RecipeRecord {
        RecipeRecord {
            id: 7,
            name: "Oat Porridge".to_string(),
            calories: 350.0,
            carbs: 55.0,
            fats: 8.0,
            protein: 12.0,
            categories: "0, 1".to_string(),
            servings: 2,
        }
    }

    #[test]
    fn test_parse_categories() {
        let set = parse_categories("0,2,4").unwrap();
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner]
        );
        assert!(parse_categories("1,9").is_err());
        assert!(parse_categories("lunch").is_err());
    }

    #[test]
    fn test_record_conversion() {
        let recipe = Recipe::try_from(sample_record()).unwrap();
        assert!(recipe.suits(MealType::Breakfast));
        assert!(recipe.suits(MealType::MidMorningSnack));
        assert!(!recipe.suits(MealType::Dinner));
        assert!(recipe.suits_any(&[MealType::Dinner, MealType::Breakfast]));
    }

    #[test]
    fn test_rejects_negative_nutrition() {
        let mut record = sample_record();
        record.carbs = -1.0;
        assert!(Recipe::try_from(record).is_err());

        let mut record = sample_record();
        record.categories = String::new();
        assert!(Recipe::try_from(record).is_err());
    }
}
