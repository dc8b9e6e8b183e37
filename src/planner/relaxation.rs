use tracing::{info, warn};

use crate::error::{PlanError, Result};
use crate::planner::model::{Coverage, Formulation, ModelBuilder};
use crate::planner::solver::{Assignment, ExactSolver};

/// A solved attempt of the relaxation ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationOutcome {
    /// Coverage level that produced the plan.
    pub coverage: Coverage,
    /// Number of solve attempts made, including the successful one.
    pub attempts: usize,
    pub assignments: Vec<Assignment>,
}

/// Runs the exact strategy down the `Strict -> Relaxed` ladder.
///
/// Each level is tried at most once. Solver faults end the run immediately.
pub struct RelaxationController<'s, S: ExactSolver + ?Sized> {
    solver: &'s S,
}

impl<'s, S: ExactSolver + ?Sized> RelaxationController<'s, S> {
    pub fn new(solver: &'s S) -> Self {
        Self { solver }
    }

    pub fn run(
        &self,
        builder: &ModelBuilder<'_, '_>,
        formulation: Formulation,
    ) -> Result<RelaxationOutcome> {
        let mut level = Some(Coverage::Strict);
        let mut attempts = 0;

        while let Some(coverage) = level {
            attempts += 1;
            let model = builder.build(coverage, formulation);
            let outcome = self.solver.solve(&model)?;

            if outcome.status.is_solved() {
                info!(?coverage, attempts, status = ?outcome.status, "meal plan solved");
                return Ok(RelaxationOutcome {
                    coverage,
                    attempts,
                    assignments: outcome.assignments(&model),
                });
            }

            level = coverage.relax();
            match level {
                Some(next) => warn!(
                    ?coverage,
                    ?next,
                    status = ?outcome.status,
                    "no plan at this coverage level, relaxing"
                ),
                None => warn!(status = ?outcome.status, "no feasible meal plan found"),
            }
        }

        Err(PlanError::Infeasible { attempts })
    }
}
