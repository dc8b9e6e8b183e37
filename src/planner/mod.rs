pub mod assembler;
pub mod constants;
pub mod engine;
pub mod greedy;
pub mod index;
pub mod model;
pub mod relaxation;
pub mod solver;
pub mod targets;

pub use assembler::{assemble_plan, recompute_totals, Selection};
pub use constants::*;
pub use engine::{generate_exact_plan, generate_greedy_plan, ExactOptions, GreedyOptions};
pub use greedy::GreedyAllocator;
pub use index::CatalogIndex;
pub use model::{
    ConstraintKind, ConstraintModel, Coverage, Formulation, LinearConstraint, ModelBuilder,
    Relation, VarId, VarKey,
};
pub use relaxation::{RelaxationController, RelaxationOutcome};
pub use solver::{Assignment, ExactSolver, GoodLpSolver, SolveOutcome, SolveStatus};
pub use targets::{calculate_targets, targets_for, NutritionTargets};
