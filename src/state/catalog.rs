use std::collections::HashMap;

use tracing::debug;

use crate::models::{MealType, Recipe};

/// Immutable, in-memory recipe table.
///
/// Built once and shared read-only by every planning request.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
    /// Position in `recipes` keyed by recipe id.
    by_id: HashMap<u32, usize>,
}

impl RecipeCatalog {
    /// Create a catalog from a list of recipes.
    ///
    /// Deduplicates by id (last occurrence wins) and keeps ids in ascending order.
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let mut seen: HashMap<u32, Recipe> = HashMap::new();
        for recipe in recipes {
            if let Some(previous) = seen.insert(recipe.id, recipe) {
                debug!(replaced = %previous.debug_string(), "duplicate recipe id in catalog");
            }
        }

        let mut recipes: Vec<Recipe> = seen.into_values().collect();
        recipes.sort_by_key(|r| r.id);

        let by_id = recipes
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id, pos))
            .collect();

        Self { recipes, by_id }
    }

    pub fn get(&self, id: u32) -> Option<&Recipe> {
        self.by_id.get(&id).map(|&pos| &self.recipes[pos])
    }

    /// All recipes in ascending id order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// Recipes tagged for a meal type.
    pub fn suited_to(&self, meal_type: MealType) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| r.suits(meal_type)).collect()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl FromIterator<Recipe> for RecipeCatalog {
    fn from_iter<I: IntoIterator<Item = Recipe>>(iter: I) -> Self {
        RecipeCatalog::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn recipe(id: u32, name: &str, meal_types: &[MealType]) -> Recipe {
        Recipe {
            id,
            name: name.to_string(),
            calories: 300.0,
            carbs: 30.0,
            fats: 10.0,
            protein: 15.0,
            meal_types: meal_types.iter().copied().collect::<BTreeSet<_>>(),
            servings: 1,
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = RecipeCatalog::new(vec![
            recipe(10, "Omelette", &[MealType::Breakfast]),
            recipe(3, "Salad", &[MealType::Lunch, MealType::Dinner]),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(3).unwrap().name, "Salad");
        assert!(catalog.get(4).is_none());
        assert_eq!(catalog.recipes()[0].id, 3);
    }

    #[test]
    fn test_deduplicates_last_wins() {
        let catalog = RecipeCatalog::new(vec![
            recipe(1, "Old", &[MealType::Lunch]),
            recipe(1, "New", &[MealType::Dinner]),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(1).unwrap().name, "New");
    }

    #[test]
    fn test_suited_to() {
        let catalog: RecipeCatalog = vec![
            recipe(1, "Toast", &[MealType::Breakfast]),
            recipe(2, "Soup", &[MealType::Lunch, MealType::Dinner]),
            recipe(3, "Stew", &[MealType::Dinner]),
        ]
        .into_iter()
        .collect();

        let dinners: Vec<u32> = catalog
            .suited_to(MealType::Dinner)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(dinners, vec![2, 3]);
        assert!(catalog.suited_to(MealType::AfternoonSnack).is_empty());
    }
}
