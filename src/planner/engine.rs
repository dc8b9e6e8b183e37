use rand::Rng;
use tracing::info;

use crate::error::Result;
use crate::models::{MealPlanResponse, PlanRequest};
use crate::planner::assembler::{assemble_plan, Selection};
use crate::planner::constants::{CALORIE_BAND, DEFAULT_SLOT_TOLERANCE};
use crate::planner::greedy::GreedyAllocator;
use crate::planner::index::CatalogIndex;
use crate::planner::model::{Formulation, ModelBuilder};
use crate::planner::relaxation::RelaxationController;
use crate::planner::solver::{Assignment, ExactSolver};
use crate::planner::targets::targets_for;
use crate::state::RecipeCatalog;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExactOptions {
    pub formulation: Formulation,
    /// Half-width of the daily calorie window, in kcal.
    pub calorie_band: f64,
}

impl Default for ExactOptions {
    fn default() -> Self {
        Self {
            formulation: Formulation::PerSlot,
            calorie_band: CALORIE_BAND,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreedyOptions {
    pub tolerance: f64,
}

impl Default for GreedyOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_SLOT_TOLERANCE,
        }
    }
}

/// Plan with the exact strategy. All-or-nothing: either every day satisfies the
/// calorie band and macro ceilings, or an error is returned.
#[tracing::instrument(skip_all, fields(days = request.days, calories = request.calories))]
pub fn generate_exact_plan<S: ExactSolver + ?Sized>(
    catalog: &RecipeCatalog,
    request: &PlanRequest,
    options: &ExactOptions,
    solver: &S,
) -> Result<MealPlanResponse> {
    let targets = targets_for(request);
    let index = CatalogIndex::build(catalog, &request.meal_types);
    info!(eligible = index.len(), formulation = ?options.formulation, "building exact model");

    let builder =
        ModelBuilder::new(&index, targets, request.days).with_calorie_band(options.calorie_band);
    let outcome = RelaxationController::new(solver).run(&builder, options.formulation)?;

    let selections = selections_from_assignments(&index, &outcome.assignments);
    assemble_plan(catalog, &targets, request.days, &selections)
}

/// Plan with the greedy heuristic. Always returns a plan, possibly with empty slots.
#[tracing::instrument(skip_all, fields(days = request.days, calories = request.calories))]
pub fn generate_greedy_plan<R: Rng + ?Sized>(
    catalog: &RecipeCatalog,
    request: &PlanRequest,
    options: &GreedyOptions,
    rng: &mut R,
) -> Result<MealPlanResponse> {
    let targets = targets_for(request);
    let index = CatalogIndex::build(catalog, &request.meal_types);

    let selections = GreedyAllocator::new(&index, targets)
        .with_tolerance(options.tolerance)
        .allocate(request.days, rng);
    info!(selections = selections.len(), "greedy allocation finished");

    assemble_plan(catalog, &targets, request.days, &selections)
}

fn selections_from_assignments(
    index: &CatalogIndex<'_>,
    assignments: &[Assignment],
) -> Vec<Selection> {
    assignments
        .iter()
        .filter_map(|a| {
            let meal_type = a
                .key
                .meal_type
                .or_else(|| index.primary_meal_type(a.key.slot))?;
            Some(Selection {
                day: a.key.day + 1,
                meal_type,
                recipe_id: index.recipe(a.key.slot).id,
                servings: a.servings,
            })
        })
        .collect()
}
