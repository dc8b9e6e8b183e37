pub mod prompts;
pub mod render;

pub use prompts::{
    collect_plan_request, match_meal_type, prompt_meal_types, prompt_strategy, MealTypeMatch,
    StrategyChoice,
};
pub use render::{display_meal_plan, display_recipe_list};
