mod meal_type;
mod nutrition;
mod plan;
mod recipe;
mod request;

pub use meal_type::MealType;
pub use nutrition::Nutrition;
pub use plan::{day_label, DailyTotals, DayPlan, MealPlanResponse, PlanLine, PlanTargets, DAY_LABELS};
pub use recipe::{parse_categories, Recipe, RecipeRecord};
pub use request::{MealPlanRequest, PlanRequest, MAX_DAYS};
