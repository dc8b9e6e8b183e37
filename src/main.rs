use std::fs;
use std::path::Path;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use mealplan_allocator_rs::cli::{Cli, Command, RequestArgs};
use mealplan_allocator_rs::config::{FormulationKind, Settings};
use mealplan_allocator_rs::error::{PlanError, Result};
use mealplan_allocator_rs::interface::{
    collect_plan_request, display_meal_plan, display_recipe_list, prompt_strategy, StrategyChoice,
};
use mealplan_allocator_rs::models::{MealPlanRequest, MealPlanResponse, PlanRequest};
use mealplan_allocator_rs::observability::init_logging;
use mealplan_allocator_rs::planner::{
    generate_exact_plan, generate_greedy_plan, ExactOptions, GoodLpSolver, GreedyOptions,
};
use mealplan_allocator_rs::state::{load_catalog, load_plan, save_plan, RecipeCatalog};

fn main() {
    if let Err(e) = run() {
        match e {
            PlanError::Infeasible { .. } => eprintln!("Error: could not generate a feasible plan"),
            other => eprintln!("Error: {}", other),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(catalog) = &cli.catalog {
        settings.catalog_path = catalog.clone();
    }
    if let Some(output) = &cli.output {
        settings.output_path = output.clone();
    }
    init_logging(&settings.log_level)?;

    let command = cli.command.unwrap_or_default();

    match command {
        Command::Plan {
            request,
            formulation,
            meal_cap,
            time_limit,
        } => {
            if let Some(kind) = formulation {
                settings.solver.formulation = kind;
            }
            if let Some(cap) = meal_cap {
                settings.solver.meal_frequency_cap = cap;
            }
            if let Some(secs) = time_limit {
                settings.solver.time_limit_secs = secs;
            }
            settings.validate()?;
            let request = resolve_request(&request)?;
            cmd_exact(&settings, &request, cli.json)
        }
        Command::Greedy { request, seed } => {
            if seed.is_some() {
                settings.greedy.seed = seed;
            }
            let request = resolve_request(&request)?;
            cmd_greedy(&settings, &request, cli.json)
        }
        Command::Interactive => cmd_interactive(&settings, cli.json),
        Command::Show => cmd_show(&settings, cli.json),
        Command::Recipes => cmd_recipes(&settings),
    }
}

/// Merge a request file (if any) with command-line fields and validate it.
fn resolve_request(args: &RequestArgs) -> Result<PlanRequest> {
    let base = match &args.request {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => MealPlanRequest::default(),
    };
    args.apply(base)?.validate()
}

fn open_catalog(settings: &Settings) -> Result<RecipeCatalog> {
    let path = &settings.catalog_path;
    if !path.exists() {
        return Err(PlanError::InvalidInput(format!(
            "Recipe catalog not found: {}",
            path.display()
        )));
    }
    load_catalog(path)
}

fn exact_plan(
    settings: &Settings,
    catalog: &RecipeCatalog,
    request: &PlanRequest,
) -> Result<MealPlanResponse> {
    let mut solver = GoodLpSolver::new();
    if let Some(limit) = settings.solver.time_limit() {
        solver = solver.with_time_limit(limit);
    }
    let options = ExactOptions {
        formulation: settings.solver.formulation(),
        ..ExactOptions::default()
    };
    generate_exact_plan(catalog, request, &options, &solver)
}

fn greedy_plan(
    settings: &Settings,
    catalog: &RecipeCatalog,
    request: &PlanRequest,
) -> Result<MealPlanResponse> {
    let mut rng = match settings.greedy.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let options = GreedyOptions {
        tolerance: settings.greedy.tolerance,
    };
    generate_greedy_plan(catalog, request, &options, &mut rng)
}

/// Print the plan and keep it as the most recent result.
fn finish(settings: &Settings, plan: &MealPlanResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(plan)?);
    } else {
        display_meal_plan(plan);
    }
    save_plan(&settings.output_path, plan)?;
    info!(path = %settings.output_path.display(), "most recent plan updated");
    Ok(())
}

/// Generate a plan with the exact solver.
fn cmd_exact(settings: &Settings, request: &PlanRequest, json: bool) -> Result<()> {
    let catalog = open_catalog(settings)?;
    if settings.solver.formulation == FormulationKind::DailyFrequency {
        info!(cap = settings.solver.meal_frequency_cap, "using daily-frequency formulation");
    }
    let plan = exact_plan(settings, &catalog, request)?;
    finish(settings, &plan, json)
}

/// Generate a plan with the greedy heuristic.
fn cmd_greedy(settings: &Settings, request: &PlanRequest, json: bool) -> Result<()> {
    let catalog = open_catalog(settings)?;
    let plan = greedy_plan(settings, &catalog, request)?;
    finish(settings, &plan, json)
}

/// Prompt for a request, then plan with the chosen strategy.
fn cmd_interactive(settings: &Settings, json: bool) -> Result<()> {
    let catalog = open_catalog(settings)?;
    println!("Loaded {} recipes", catalog.len());
    println!();

    let request = collect_plan_request()?.validate()?;
    let strategy = prompt_strategy()?;

    let plan = match strategy {
        StrategyChoice::Exact => exact_plan(settings, &catalog, &request),
        StrategyChoice::Greedy => greedy_plan(settings, &catalog, &request),
    }?;

    finish(settings, &plan, json)
}

/// Print the most recently saved plan.
fn cmd_show(settings: &Settings, json: bool) -> Result<()> {
    let path: &Path = &settings.output_path;
    if !path.exists() {
        println!("No saved plan at {}", path.display());
        return Ok(());
    }

    let plan = load_plan(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        display_meal_plan(&plan);
    }
    Ok(())
}

/// List the catalog grouped by meal type.
fn cmd_recipes(settings: &Settings) -> Result<()> {
    let catalog = open_catalog(settings)?;
    display_recipe_list(&catalog);
    Ok(())
}
