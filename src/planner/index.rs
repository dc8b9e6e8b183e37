use std::collections::HashMap;

use crate::models::{MealType, Nutrition, Recipe};
use crate::state::RecipeCatalog;

/// Per-request lookup tables over the recipes eligible for the requested meal types.
///
/// Recipes live in a dense arena; everything else refers to them by arena slot,
/// so model building and allocation never rescan the catalog.
#[derive(Debug)]
pub struct CatalogIndex<'a> {
    meal_types: Vec<MealType>,
    recipes: Vec<&'a Recipe>,
    nutrition: Vec<Nutrition>,
    slot_by_id: HashMap<u32, usize>,
    /// Arena slots eligible for each meal type, indexed by `MealType::index`.
    by_meal_type: [Vec<usize>; 5],
}

impl<'a> CatalogIndex<'a> {
    /// Index the recipes tagged with at least one of `meal_types`.
    pub fn build(catalog: &'a RecipeCatalog, meal_types: &[MealType]) -> Self {
        let recipes: Vec<&Recipe> = catalog
            .iter()
            .filter(|r| r.suits_any(meal_types))
            .collect();

        let nutrition = recipes.iter().map(|r| r.nutrition()).collect();
        let slot_by_id = recipes
            .iter()
            .enumerate()
            .map(|(slot, r)| (r.id, slot))
            .collect();

        let mut by_meal_type: [Vec<usize>; 5] = Default::default();
        for mt in meal_types {
            by_meal_type[mt.index() as usize] = recipes
                .iter()
                .enumerate()
                .filter(|(_, r)| r.suits(*mt))
                .map(|(slot, _)| slot)
                .collect();
        }

        Self {
            meal_types: meal_types.to_vec(),
            recipes,
            nutrition,
            slot_by_id,
            by_meal_type,
        }
    }

    /// The requested meal types, in request order.
    pub fn meal_types(&self) -> &[MealType] {
        &self.meal_types
    }

    /// Arena slots of the recipes eligible for a meal type.
    ///
    /// Empty for meal types that were not requested.
    pub fn eligible(&self, meal_type: MealType) -> &[usize] {
        &self.by_meal_type[meal_type.index() as usize]
    }

    #[inline]
    pub fn recipe(&self, slot: usize) -> &'a Recipe {
        self.recipes[slot]
    }

    #[inline]
    pub fn nutrition(&self, slot: usize) -> &Nutrition {
        &self.nutrition[slot]
    }

    pub fn slot_of(&self, id: u32) -> Option<usize> {
        self.slot_by_id.get(&id).copied()
    }

    /// First requested meal type the recipe in `slot` is tagged for.
    pub fn primary_meal_type(&self, slot: usize) -> Option<MealType> {
        let recipe = self.recipes[slot];
        self.meal_types.iter().copied().find(|mt| recipe.suits(*mt))
    }

    /// Number of indexed recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
