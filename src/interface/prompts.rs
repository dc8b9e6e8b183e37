use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{PlanError, Result};
use crate::models::{MealPlanRequest, MealType, MAX_DAYS};

/// Similarity a meal type name needs to be offered as a suggestion.
const MATCH_THRESHOLD: f64 = 0.7;

/// Outcome of matching typed text against the meal type names.
#[derive(Debug, Clone, PartialEq)]
pub enum MealTypeMatch {
    Exact(MealType),
    /// Close matches, best first.
    Candidates(Vec<MealType>),
    NoMatch,
}

/// Match typed text against meal type names, exact first, then fuzzy.
pub fn match_meal_type(input: &str) -> MealTypeMatch {
    let input = input.trim();
    if let Ok(meal_type) = input.parse::<MealType>() {
        return MealTypeMatch::Exact(meal_type);
    }

    let needle = input.to_lowercase().replace(['_', '-'], " ");
    let mut scored: Vec<(MealType, f64)> = MealType::ALL
        .into_iter()
        .map(|mt| (mt, jaro_winkler(&mt.slug().replace('_', " "), &needle)))
        .filter(|(_, score)| *score > MATCH_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    if scored.is_empty() {
        MealTypeMatch::NoMatch
    } else {
        MealTypeMatch::Candidates(scored.into_iter().map(|(mt, _)| mt).collect())
    }
}

fn prompt_number<T>(prompt: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + ToString,
{
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidInput(format!("Invalid number: {}", input)))
}

/// Prompt for meal types by name, with fuzzy matching.
///
/// An empty first answer keeps `defaults`.
pub fn prompt_meal_types(defaults: &[MealType]) -> Result<Vec<MealType>> {
    let mut meal_types = Vec::new();

    loop {
        let input: String = Input::new()
            .with_prompt("Enter a meal type (or press Enter to finish)")
            .allow_empty(true)
            .interact_text()?;

        if input.trim().is_empty() {
            break;
        }

        let chosen = match match_meal_type(&input) {
            MealTypeMatch::Exact(mt) => Some(mt),
            MealTypeMatch::NoMatch => {
                println!("No matching meal type found for '{}'", input.trim());
                None
            }
            MealTypeMatch::Candidates(candidates) if candidates.len() == 1 => {
                let mt = candidates[0];
                let confirm = Confirm::new()
                    .with_prompt(format!("Did you mean '{}'?", mt.slug()))
                    .default(true)
                    .interact()?;
                confirm.then_some(mt)
            }
            MealTypeMatch::Candidates(candidates) => {
                let mut options: Vec<&str> = candidates.iter().map(|mt| mt.slug()).collect();
                options.push("None of these");

                let selection = Select::new()
                    .with_prompt("Which did you mean?")
                    .items(&options)
                    .default(0)
                    .interact()?;
                candidates.get(selection).copied()
            }
        };

        if let Some(mt) = chosen {
            if meal_types.contains(&mt) {
                println!("Already added: {}", mt.slug());
            } else {
                meal_types.push(mt);
                println!("Added: {}", mt.slug());
            }
        }
    }

    if meal_types.is_empty() {
        meal_types = defaults.to_vec();
    }
    Ok(meal_types)
}

/// Strategy picked in an interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyChoice {
    Exact,
    Greedy,
}

pub fn prompt_strategy() -> Result<StrategyChoice> {
    let selection = Select::new()
        .with_prompt("Planning strategy")
        .items(&["exact (solver)", "greedy (fast, best effort)"])
        .default(0)
        .interact()?;

    Ok(if selection == 0 {
        StrategyChoice::Exact
    } else {
        StrategyChoice::Greedy
    })
}

/// Collect a full plan request interactively.
pub fn collect_plan_request() -> Result<MealPlanRequest> {
    let defaults = MealPlanRequest::default();

    let calories = prompt_number("Daily calorie target", defaults.calories)?;
    let carbs_ratio = prompt_number("Share of calories from carbs (0-1)", defaults.carbs_ratio)?;
    let fats_ratio = prompt_number("Share of calories from fat (0-1)", defaults.fats_ratio)?;
    let protein_ratio =
        prompt_number("Share of calories from protein (0-1)", defaults.protein_ratio)?;

    println!("Meal types: breakfast, mid morning snack, lunch, afternoon snack, dinner");
    let meal_types = prompt_meal_types(&MealType::ALL)?;

    let days = prompt_number(&format!("Number of days (1-{})", MAX_DAYS), defaults.days)?;

    Ok(MealPlanRequest {
        calories,
        carbs_ratio,
        fats_ratio,
        protein_ratio,
        meal_types: meal_types.iter().map(|mt| mt.index()).collect(),
        days,
    })
}
