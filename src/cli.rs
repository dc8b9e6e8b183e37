use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::FormulationKind;
use crate::error::Result;
use crate::models::{MealPlanRequest, MealType};

/// mealplan: allocates recipes to meal slots within daily calorie and macro budgets.
#[derive(Parser, Debug)]
#[command(name = "mealplan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to a TOML settings file (default: mealplan.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Recipe catalog (CSV or JSON).
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Where the most recent plan is written.
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Print the JSON response instead of the table.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a plan with the exact solver.
    Plan {
        #[command(flatten)]
        request: RequestArgs,

        /// Model formulation.
        #[arg(long, value_enum)]
        formulation: Option<FormulationKind>,

        /// Servings cap per recipe and day (daily-frequency formulation).
        #[arg(long)]
        meal_cap: Option<u32>,

        /// Solve time ceiling per attempt in seconds; 0 disables it.
        #[arg(long)]
        time_limit: Option<u64>,
    },

    /// Generate a plan with the greedy heuristic.
    Greedy {
        #[command(flatten)]
        request: RequestArgs,

        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Build a request through prompts.
    Interactive,

    /// Print the most recently saved plan.
    Show,

    /// List the recipe catalog by meal type.
    Recipes,
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan {
            request: RequestArgs::default(),
            formulation: None,
            meal_cap: None,
            time_limit: None,
        }
    }
}

/// Request fields; anything not given falls back to the request file, then defaults.
#[derive(Args, Debug, Default)]
pub struct RequestArgs {
    /// Read a JSON request payload from this file.
    #[arg(long)]
    pub request: Option<PathBuf>,

    /// Daily calorie target.
    #[arg(long)]
    pub calories: Option<f64>,

    /// Share of calories from carbohydrates (0-1).
    #[arg(long)]
    pub carbs: Option<f64>,

    /// Share of calories from fat (0-1).
    #[arg(long)]
    pub fats: Option<f64>,

    /// Share of calories from protein (0-1).
    #[arg(long)]
    pub protein: Option<f64>,

    /// Meal types by index or name, comma-separated (e.g. `0,2,dinner`).
    #[arg(long, value_delimiter = ',')]
    pub meal_types: Vec<String>,

    /// Number of days to plan.
    #[arg(long)]
    pub days: Option<usize>,
}

impl RequestArgs {
    /// Overlay command-line values on `base`.
    pub fn apply(&self, base: MealPlanRequest) -> Result<MealPlanRequest> {
        let mut request = base;
        if let Some(calories) = self.calories {
            request.calories = calories;
        }
        if let Some(carbs) = self.carbs {
            request.carbs_ratio = carbs;
        }
        if let Some(fats) = self.fats {
            request.fats_ratio = fats;
        }
        if let Some(protein) = self.protein {
            request.protein_ratio = protein;
        }
        if !self.meal_types.is_empty() {
            request.meal_types = self
                .meal_types
                .iter()
                .map(|s| s.parse::<MealType>().map(|mt| mt.index()))
                .collect::<Result<Vec<u8>>>()?;
        }
        if let Some(days) = self.days {
            request.days = days;
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan_flags() {
        let cli = Cli::parse_from([
            "mealplan",
            "--json",
            "plan",
            "--calories",
            "1800",
            "--meal-types",
            "lunch,4",
            "--formulation",
            "daily-frequency",
        ]);
        assert!(cli.json);

        match cli.command {
            Some(Command::Plan {
                request,
                formulation,
                ..
            }) => {
                assert_eq!(formulation, Some(FormulationKind::DailyFrequency));
                let merged = request.apply(MealPlanRequest::default()).unwrap();
                assert_eq!(merged.calories, 1800.0);
                assert_eq!(merged.meal_types, vec![2, 4]);
                assert_eq!(merged.days, 7);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_meal_type_rejected() {
        let args = RequestArgs {
            meal_types: vec!["brunch".to_string()],
            ..Default::default()
        };
        assert!(args.apply(MealPlanRequest::default()).is_err());
    }
}
