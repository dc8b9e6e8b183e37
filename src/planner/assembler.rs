use std::collections::BTreeMap;

use crate::error::{PlanError, Result};
use crate::models::{
    day_label, DailyTotals, DayPlan, MealPlanResponse, MealType, Nutrition, PlanLine,
};
use crate::planner::targets::NutritionTargets;
use crate::state::RecipeCatalog;

/// A recipe chosen for a meal slot, before nutrition is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// 1-based plan day.
    pub day: usize,
    pub meal_type: MealType,
    pub recipe_id: u32,
    pub servings: u32,
}

/// Build the response structure from raw slot selections.
///
/// Lines keep their selection order within a slot; slots follow canonical meal type
/// order, and empty slots are left out. Daily totals are accumulated in the same
/// order the lines appear in the output.
pub fn assemble_plan(
    catalog: &RecipeCatalog,
    targets: &NutritionTargets,
    days: usize,
    selections: &[Selection],
) -> Result<MealPlanResponse> {
    let mut grouped: Vec<BTreeMap<MealType, Vec<PlanLine>>> = vec![BTreeMap::new(); days];

    for selection in selections.iter().filter(|s| s.servings > 0) {
        if !(1..=days).contains(&selection.day) {
            return Err(PlanError::InvalidInput(format!(
                "Selection for day {} outside a {}-day plan",
                selection.day, days
            )));
        }

        let recipe = catalog
            .get(selection.recipe_id)
            .ok_or(PlanError::RecipeNotFound(selection.recipe_id))?;

        grouped[selection.day - 1]
            .entry(selection.meal_type)
            .or_default()
            .push(PlanLine {
                recipe_id: recipe.id,
                name: recipe.name.clone(),
                servings: selection.servings,
                nutrition: recipe.nutrition().scaled(selection.servings),
            });
    }

    let meal_plan = grouped
        .into_iter()
        .enumerate()
        .map(|(day, meal_types)| {
            let nutrition = sum_lines(meal_types.values().flatten());
            DayPlan {
                day: day_label(day + 1).to_string(),
                daily_totals: DailyTotals {
                    nutrition,
                    calorie_deviation: nutrition.calories - targets.calories_per_day,
                },
                meal_types,
            }
        })
        .collect();

    Ok(MealPlanResponse {
        success: true,
        meal_plan,
        targets: targets.to_plan_targets(),
    })
}

fn sum_lines<'a>(lines: impl Iterator<Item = &'a PlanLine>) -> Nutrition {
    lines.fold(Nutrition::default(), |acc, line| acc + line.nutrition)
}

/// Re-derive a day's totals from its lines.
pub fn recompute_totals(day: &DayPlan) -> Nutrition {
    sum_lines(day.meal_types.values().flatten())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::models::Recipe;
    use crate::planner::targets::calculate_targets;

    fn catalog() -> RecipeCatalog {
        let recipe = |id: u32, name: &str, calories: f64, mt: MealType| Recipe {
            id,
            name: name.to_string(),
            calories,
            carbs: calories / 10.0,
            fats: calories / 40.0,
            protein: calories / 20.0,
            meal_types: [mt].into_iter().collect::<BTreeSet<_>>(),
            servings: 4,
        };
        RecipeCatalog::new(vec![
            recipe(1, "Granola", 330.5, MealType::Breakfast),
            recipe(2, "Apple", 95.3, MealType::MidMorningSnack),
            recipe(3, "Curry", 720.1, MealType::Dinner),
        ])
    }

    #[test]
    fn test_groups_by_meal_type_in_canonical_order() {
        let catalog = catalog();
        let targets = calculate_targets(2000.0, 0.5, 0.3, 0.2);
        let selections = [
            Selection { day: 1, meal_type: MealType::Dinner, recipe_id: 3, servings: 1 },
            Selection { day: 1, meal_type: MealType::Breakfast, recipe_id: 1, servings: 2 },
        ];

        let plan = assemble_plan(&catalog, &targets, 2, &selections).unwrap();
        assert!(plan.success);
        assert_eq!(plan.meal_plan.len(), 2);

        let day1 = &plan.meal_plan[0];
        assert_eq!(day1.day, "MONDAY");
        let keys: Vec<MealType> = day1.meal_types.keys().copied().collect();
        assert_eq!(keys, vec![MealType::Breakfast, MealType::Dinner]);
        assert_eq!(day1.meal_types[&MealType::Breakfast][0].nutrition.calories, 661.0);

        let day2 = &plan.meal_plan[1];
        assert_eq!(day2.day, "TUESDAY");
        assert!(day2.meal_types.is_empty());
        assert_eq!(day2.daily_totals.calorie_deviation, -2000.0);
    }

    #[test]
    fn test_deviation_is_signed() {
        let catalog = catalog();
        let targets = calculate_targets(500.0, 0.5, 0.3, 0.2);
        let selections = [Selection { day: 1, meal_type: MealType::Dinner, recipe_id: 3, servings: 1 }];

        let plan = assemble_plan(&catalog, &targets, 1, &selections).unwrap();
        let deviation = plan.meal_plan[0].daily_totals.calorie_deviation;
        assert!((deviation - 220.1).abs() < 1e-9);
    }

    #[test]
    fn test_totals_match_lines() {
        let catalog = catalog();
        let targets = calculate_targets(1800.0, 0.5, 0.3, 0.2);
        let selections = [
            Selection { day: 1, meal_type: MealType::MidMorningSnack, recipe_id: 2, servings: 3 },
            Selection { day: 1, meal_type: MealType::Dinner, recipe_id: 3, servings: 1 },
            Selection { day: 1, meal_type: MealType::Breakfast, recipe_id: 1, servings: 1 },
        ];

        let plan = assemble_plan(&catalog, &targets, 1, &selections).unwrap();
        let day = &plan.meal_plan[0];
        assert_eq!(recompute_totals(day), day.daily_totals.nutrition);
        assert_eq!(day.recipe_count(), 3);
    }

    #[test]
    fn test_zero_servings_dropped() {
        let catalog = catalog();
        let targets = calculate_targets(2000.0, 0.5, 0.3, 0.2);
        let selections = [Selection { day: 1, meal_type: MealType::Dinner, recipe_id: 3, servings: 0 }];

        let plan = assemble_plan(&catalog, &targets, 1, &selections).unwrap();
        assert!(plan.meal_plan[0].meal_types.is_empty());
    }

    #[test]
    fn test_rejects_unknown_recipe_and_day() {
        let catalog = catalog();
        let targets = calculate_targets(2000.0, 0.5, 0.3, 0.2);

        let unknown = [Selection { day: 1, meal_type: MealType::Lunch, recipe_id: 99, servings: 1 }];
        assert!(matches!(
            assemble_plan(&catalog, &targets, 1, &unknown),
            Err(PlanError::RecipeNotFound(99))
        ));

        let late = [Selection { day: 3, meal_type: MealType::Dinner, recipe_id: 3, servings: 1 }];
        assert!(matches!(
            assemble_plan(&catalog, &targets, 2, &late),
            Err(PlanError::InvalidInput(_))
        ));
    }
}
