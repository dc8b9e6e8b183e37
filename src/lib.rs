pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod observability;
pub mod planner;
pub mod state;

pub use error::{PlanError, Result};
pub use models::{MealPlanRequest, MealPlanResponse, MealType, PlanRequest, Recipe};
pub use planner::{generate_exact_plan, generate_greedy_plan};
pub use state::RecipeCatalog;
