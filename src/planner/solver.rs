use std::time::Duration;

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError,
    Solution, SolutionStatus, SolverModel, Variable, WithTimeLimit,
};
use tracing::{debug, warn};

use crate::error::{PlanError, Result};
use crate::planner::model::{ConstraintModel, Relation, VarId, VarKey};

/// Classification of a solve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    /// No answer within the time ceiling, or the solver could not decide.
    Unknown,
}

impl SolveStatus {
    pub fn is_solved(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// A variable resolved to a non-zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub key: VarKey,
    pub servings: u32,
}

/// Result of one solve: a status and, when solved, a value per variable.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    values: Vec<u32>,
}

impl SolveOutcome {
    pub fn solved(status: SolveStatus, values: Vec<u32>) -> Self {
        Self { status, values }
    }

    pub fn unsolved(status: SolveStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
        }
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Non-zero variables, in model order.
    pub fn assignments(&self, model: &ConstraintModel) -> Vec<Assignment> {
        model
            .variables()
            .iter()
            .zip(&self.values)
            .filter(|(_, value)| **value > 0)
            .map(|(var, &servings)| Assignment {
                key: var.key,
                servings,
            })
            .collect()
    }
}

/// Any integer solver able to take a [`ConstraintModel`].
///
/// Implementations report infeasibility through the status; `Err` is reserved
/// for faults of the solver itself.
pub trait ExactSolver {
    fn solve(&self, model: &ConstraintModel) -> Result<SolveOutcome>;
}

/// Branch-and-bound through `good_lp`'s pure-Rust `microlp` backend.
#[derive(Debug, Clone, Default)]
pub struct GoodLpSolver {
    time_limit: Option<Duration>,
}

impl GoodLpSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop searching after `limit`.
    ///
    /// An incumbent found by then is reported as [`SolveStatus::Feasible`];
    /// with none the attempt is [`SolveStatus::Unknown`].
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }
}

impl ExactSolver for GoodLpSolver {
    fn solve(&self, model: &ConstraintModel) -> Result<SolveOutcome> {
        if model.has_contradiction() {
            debug!("model contains an unsatisfiable constant row");
            return Ok(SolveOutcome::unsolved(SolveStatus::Infeasible));
        }

        solve_with_good_lp(model, self.time_limit).map_err(PlanError::SolverFault)
    }
}

fn linear_expression(handles: &[Variable], terms: &[(VarId, f64)]) -> Expression {
    terms
        .iter()
        .fold(Expression::from(0.0), |acc, &(var, coef)| {
            acc + handles[var.index()] * coef
        })
}

fn solve_with_good_lp(
    model: &ConstraintModel,
    time_limit: Option<Duration>,
) -> std::result::Result<SolveOutcome, String> {
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .variables()
        .iter()
        .map(|v| vars.add(variable().integer().min(0.0).max(v.upper as f64)))
        .collect();

    let objective = model
        .objective()
        .map(|terms| linear_expression(&handles, terms))
        .unwrap_or_else(|| Expression::from(0.0));

    let mut problem = vars.maximise(objective).using(default_solver);
    if let Some(limit) = time_limit {
        problem = problem.with_time_limit(limit.as_secs_f64());
    }

    for row in model.constraints().iter().filter(|c| !c.is_constant()) {
        let lhs = linear_expression(&handles, &row.terms);
        let bound = row.bound;
        let c = match row.relation {
            Relation::LessEq => constraint!(lhs <= bound),
            Relation::Eq => constraint!(lhs == bound),
            Relation::GreaterEq => constraint!(lhs >= bound),
        };
        problem.add_constraint(c);
    }

    match problem.solve() {
        Ok(solution) => {
            let status = match solution.status() {
                SolutionStatus::Optimal => SolveStatus::Optimal,
                SolutionStatus::TimeLimit | SolutionStatus::GapLimit => {
                    warn!("solver stopped early; keeping its best incumbent");
                    SolveStatus::Feasible
                }
            };
            let values = handles
                .iter()
                .map(|&h| solution.value(h).round().max(0.0) as u32)
                .collect();
            Ok(SolveOutcome::solved(status, values))
        }
        Err(ResolutionError::Infeasible) => Ok(SolveOutcome::unsolved(SolveStatus::Infeasible)),
        Err(ResolutionError::Unbounded) => Ok(SolveOutcome::unsolved(SolveStatus::Unknown)),
        // microlp's only `Other` error is an expired time limit with no incumbent.
        Err(ResolutionError::Other(reason)) if time_limit.is_some() => {
            warn!(
                limit_secs = time_limit.map(|l| l.as_secs_f64()),
                reason, "solver exceeded time limit"
            );
            Ok(SolveOutcome::unsolved(SolveStatus::Unknown))
        }
        Err(other) => Err(other.to_string()),
    }
}
