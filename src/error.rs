use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Both coverage levels were tried and neither produced a plan.
    #[error("Could not generate a feasible plan (tried {attempts} coverage levels)")]
    Infeasible { attempts: usize },

    #[error("Solver failure: {0}")]
    SolverFault(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
