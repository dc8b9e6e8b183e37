use crate::models::{MealPlanResponse, MealType};
use crate::state::RecipeCatalog;

/// Display a meal plan day by day.
pub fn display_meal_plan(plan: &MealPlanResponse) {
    if plan.meal_plan.is_empty() {
        println!("No meal plan generated.");
        return;
    }

    let max_name_len = plan
        .meal_plan
        .iter()
        .flat_map(|day| day.lines())
        .map(|(_, line)| line.name.len())
        .max()
        .unwrap_or(10);

    println!();
    println!("=== Meal Plan ({} days) ===", plan.meal_plan.len());

    for day in &plan.meal_plan {
        println!();
        println!("--- {} ---", day.day);

        if day.meal_types.is_empty() {
            println!("  (no meals)");
        }

        for (meal_type, lines) in &day.meal_types {
            println!("  {}:", meal_type.response_key());
            for line in lines {
                println!(
                    "    {:<width$} x{} - {:>5.0} kcal | C {:.1} / P {:.1} / F {:.1}",
                    line.name,
                    line.servings,
                    line.nutrition.calories,
                    line.nutrition.carbs,
                    line.nutrition.protein,
                    line.nutrition.fats,
                    width = max_name_len
                );
            }
        }

        let totals = &day.daily_totals;
        let sign = if totals.calorie_deviation >= 0.0 { "+" } else { "" };
        println!(
            "  Total: {:.0} kcal ({}{:.0}) | C {:.1} / P {:.1} / F {:.1}",
            totals.nutrition.calories,
            sign,
            totals.calorie_deviation,
            totals.nutrition.carbs,
            totals.nutrition.protein,
            totals.nutrition.fats
        );
    }

    let targets = &plan.targets;
    println!();
    println!("--- Targets ---");
    println!("Calories per day: {:.0}", targets.calories_per_day);
    println!(
        "Carbs <= {} g, Protein <= {} g, Fats <= {} g",
        targets.carbs, targets.protein, targets.fats
    );
    println!();
}

/// Display the catalog grouped by meal type.
pub fn display_recipe_list(catalog: &RecipeCatalog) {
    if catalog.is_empty() {
        println!("Catalog is empty.");
        return;
    }

    println!();
    println!("=== Recipes ({} items) ===", catalog.len());

    for meal_type in MealType::ALL {
        let recipes = catalog.suited_to(meal_type);
        println!();
        println!("{} ({}):", meal_type.display_name(), recipes.len());
        for recipe in recipes {
            println!(
                "  [{}] {} - {} kcal, C:{} P:{} F:{}, servings:{}",
                recipe.id,
                recipe.name,
                recipe.calories,
                recipe.carbs,
                recipe.protein,
                recipe.fats,
                recipe.servings
            );
        }
    }

    println!();
}
