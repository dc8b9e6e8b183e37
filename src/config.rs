use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{PlanError, Result};
use crate::planner::constants::{
    DEFAULT_MEAL_FREQUENCY_CAP, DEFAULT_SLOT_TOLERANCE, DEFAULT_SOLVE_TIME_LIMIT_SECS,
};
use crate::planner::Formulation;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "mealplan.toml";

/// Prefix for environment overrides, e.g. `MEALPLAN__SOLVER__TIME_LIMIT_SECS=10`.
pub const ENV_PREFIX: &str = "MEALPLAN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FormulationKind {
    PerSlot,
    DailyFrequency,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolverSettings {
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: u64,
    #[serde(default = "default_formulation")]
    pub formulation: FormulationKind,
    #[serde(default = "default_meal_frequency_cap")]
    pub meal_frequency_cap: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: default_time_limit(),
            formulation: default_formulation(),
            meal_frequency_cap: default_meal_frequency_cap(),
        }
    }
}

impl SolverSettings {
    /// `None` when the ceiling is disabled with `0`.
    pub fn time_limit(&self) -> Option<Duration> {
        (self.time_limit_secs > 0).then(|| Duration::from_secs(self.time_limit_secs))
    }

    pub fn formulation(&self) -> Formulation {
        match self.formulation {
            FormulationKind::PerSlot => Formulation::PerSlot,
            FormulationKind::DailyFrequency => Formulation::DailyFrequency {
                cap: self.meal_frequency_cap,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GreedySettings {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for GreedySettings {
    fn default() -> Self {
        Self {
            seed: None,
            tolerance: default_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub solver: SolverSettings,
    #[serde(default)]
    pub greedy: GreedySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            output_path: default_output_path(),
            log_level: default_log_level(),
            solver: SolverSettings::default(),
            greedy: GreedySettings::default(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/recipes.csv")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output/last_plan.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_time_limit() -> u64 {
    DEFAULT_SOLVE_TIME_LIMIT_SECS
}

fn default_formulation() -> FormulationKind {
    FormulationKind::PerSlot
}

fn default_meal_frequency_cap() -> u32 {
    DEFAULT_MEAL_FREQUENCY_CAP
}

fn default_tolerance() -> f64 {
    DEFAULT_SLOT_TOLERANCE
}

impl Settings {
    /// Load settings from defaults, an optional TOML file and `MEALPLAN__*` variables.
    ///
    /// An explicitly named file must exist; the default file is only read if present.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(PlanError::InvalidInput(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                builder = builder.add_source(File::from(path));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
            }
            None => {}
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.greedy.tolerance > 0.0 && self.greedy.tolerance < 1.0) {
            return Err(PlanError::InvalidInput(format!(
                "greedy.tolerance must be between 0 and 1, got {}",
                self.greedy.tolerance
            )));
        }
        if self.solver.meal_frequency_cap == 0 {
            return Err(PlanError::InvalidInput(
                "solver.meal_frequency_cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
