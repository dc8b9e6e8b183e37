use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::models::{MealType, Nutrition};
use crate::planner::assembler::Selection;
use crate::planner::constants::DEFAULT_SLOT_TOLERANCE;
use crate::planner::index::CatalogIndex;
use crate::planner::targets::NutritionTargets;

/// Solver-free construction heuristic: one randomized bin-packing pass per slot.
///
/// Recipes are used at most once across the whole plan. A slot that no candidate
/// fits is left empty rather than reported as an error.
pub struct GreedyAllocator<'i, 'a> {
    index: &'i CatalogIndex<'a>,
    targets: NutritionTargets,
    tolerance: f64,
}

impl<'i, 'a> GreedyAllocator<'i, 'a> {
    pub fn new(index: &'i CatalogIndex<'a>, targets: NutritionTargets) -> Self {
        Self {
            index,
            targets,
            tolerance: DEFAULT_SLOT_TOLERANCE,
        }
    }

    /// Relative half-width of each slot's calorie window.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Calorie window `[lower, upper]` for a slot.
    ///
    /// Shares are renormalized over the requested meal types so a partial day still
    /// aims at the full daily target.
    pub fn slot_window(&self, meal_type: MealType) -> (f64, f64) {
        let total_share: f64 = self
            .index
            .meal_types()
            .iter()
            .map(|mt| mt.calorie_share())
            .sum();
        let share = if total_share > 0.0 {
            meal_type.calorie_share() / total_share
        } else {
            0.0
        };
        let centre = share * self.targets.calories_per_day;
        (centre * (1.0 - self.tolerance), centre * (1.0 + self.tolerance))
    }

    /// Fill `days` days and return the selections in day, then slot order.
    pub fn allocate<R: Rng + ?Sized>(&self, days: usize, rng: &mut R) -> Vec<Selection> {
        let mut used = vec![false; self.index.len()];
        let mut selections = Vec::new();

        let mut slots: Vec<MealType> = self.index.meal_types().to_vec();
        slots.sort();

        for day in 1..=days {
            let mut day_total = Nutrition::default();

            for &meal_type in &slots {
                let before = selections.len();
                let slot_total =
                    self.fill_slot(day, meal_type, &mut used, &mut selections, rng);
                day_total += slot_total;

                if selections.len() == before {
                    debug!(day, meal_type = %meal_type, "no recipe fits slot, leaving it empty");
                }
            }

            debug!(
                day,
                calories = day_total.calories,
                target = self.targets.calories_per_day,
                "greedy day filled"
            );
        }

        selections
    }

    fn fill_slot<R: Rng + ?Sized>(
        &self,
        day: usize,
        meal_type: MealType,
        used: &mut [bool],
        selections: &mut Vec<Selection>,
        rng: &mut R,
    ) -> Nutrition {
        let (lower, upper) = self.slot_window(meal_type);

        let mut candidates: Vec<usize> = self
            .index
            .eligible(meal_type)
            .iter()
            .copied()
            .filter(|&slot| !used[slot])
            .collect();
        candidates.shuffle(rng);

        let mut total = Nutrition::default();

        for slot in candidates {
            if total.calories >= lower {
                break;
            }

            let per_serving = *self.index.nutrition(slot);
            if per_serving.calories <= 0.0 {
                continue;
            }

            let room = ((upper - total.calories) / per_serving.calories).floor();
            if room < 1.0 {
                continue;
            }
            let servings = (room as u32).min(self.index.recipe(slot).servings);
            if servings == 0 {
                continue;
            }

            let added = per_serving.scaled(servings);
            if total.calories + added.calories > upper {
                continue;
            }

            used[slot] = true;
            total += added;
            selections.push(Selection {
                day,
                meal_type,
                recipe_id: self.index.recipe(slot).id,
                servings,
            });
        }

        total
    }
}
