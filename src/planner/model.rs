use tracing::debug;

use crate::models::{MealType, Nutrition};
use crate::planner::constants::CALORIE_BAND;
use crate::planner::index::CatalogIndex;
use crate::planner::targets::NutritionTargets;

/// Tolerance used when checking a solution against a constraint.
const FEASIBILITY_EPSILON: f64 = 1e-6;

/// Handle to a decision variable inside one [`ConstraintModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a decision variable stands for.
///
/// `day` is 0-based and `slot` is the recipe's position in the [`CatalogIndex`].
/// `meal_type` is `None` in the daily-frequency formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarKey {
    pub day: usize,
    pub meal_type: Option<MealType>,
    pub slot: usize,
}

/// An integer variable with domain `[0, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionVariable {
    pub key: VarKey,
    pub upper: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessEq,
    Eq,
    GreaterEq,
}

impl Relation {
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Relation::LessEq => lhs <= rhs + FEASIBILITY_EPSILON,
            Relation::Eq => (lhs - rhs).abs() <= FEASIBILITY_EPSILON,
            Relation::GreaterEq => lhs >= rhs - FEASIBILITY_EPSILON,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    CalorieFloor,
    CalorieCeiling,
    CarbsCeiling,
    FatCeiling,
    ProteinCeiling,
    SlotCoverage,
    DailyMeals,
    Uniqueness,
}

/// `sum(coef * var) <relation> bound`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    /// 0-based day the constraint belongs to; `None` for horizon-wide rows.
    pub day: Option<usize>,
    pub terms: Vec<(VarId, f64)>,
    pub relation: Relation,
    pub bound: f64,
}

impl LinearConstraint {
    /// Left-hand side under an assignment of variable values.
    pub fn evaluate(&self, values: &[u32]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * values[var.index()] as f64)
            .sum()
    }

    pub fn is_satisfied_by(&self, values: &[u32]) -> bool {
        self.relation.holds(self.evaluate(values), self.bound)
    }

    /// A row without variables; its truth does not depend on any assignment.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Solver-independent integer model: variables, linear rows, optional objective.
///
/// The objective, when present, is maximized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintModel {
    variables: Vec<DecisionVariable>,
    constraints: Vec<LinearConstraint>,
    objective: Option<Vec<(VarId, f64)>>,
}

impl ConstraintModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, key: VarKey, upper: u32) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(DecisionVariable { key, upper });
        id
    }

    pub fn add_constraint(
        &mut self,
        kind: ConstraintKind,
        day: Option<usize>,
        terms: Vec<(VarId, f64)>,
        relation: Relation,
        bound: f64,
    ) {
        self.constraints.push(LinearConstraint {
            kind,
            day,
            terms,
            relation,
            bound,
        });
    }

    pub fn set_objective(&mut self, terms: Vec<(VarId, f64)>) {
        self.objective = Some(terms);
    }

    pub fn variables(&self) -> &[DecisionVariable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraints_of(&self, kind: ConstraintKind) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints.iter().filter(move |c| c.kind == kind)
    }

    pub fn objective(&self) -> Option<&[(VarId, f64)]> {
        self.objective.as_deref()
    }

    /// True if some variable-free row is already violated.
    pub fn has_contradiction(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| c.is_constant() && !c.relation.holds(0.0, c.bound))
    }

    /// Check domains and every row against a full assignment.
    pub fn is_satisfied_by(&self, values: &[u32]) -> bool {
        values.len() == self.variables.len()
            && self
                .variables
                .iter()
                .zip(values)
                .all(|(var, &value)| value <= var.upper)
            && self.constraints.iter().all(|c| c.is_satisfied_by(values))
    }

    /// Objective value under an assignment (0 without an objective).
    pub fn objective_value(&self, values: &[u32]) -> f64 {
        self.objective
            .as_deref()
            .map(|terms| {
                terms
                    .iter()
                    .map(|&(var, coef)| coef * values[var.index()] as f64)
                    .sum()
            })
            .unwrap_or(0.0)
    }
}

/// Slot coverage tightness.
///
/// `Strict` demands exactly one dish per slot; `Relaxed` allows several.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    Strict,
    Relaxed,
}

impl Coverage {
    pub fn allows_multiple_dishes(self) -> bool {
        matches!(self, Coverage::Relaxed)
    }

    /// The next, looser level; `None` once fully relaxed.
    pub fn relax(self) -> Option<Coverage> {
        match self {
            Coverage::Strict => Some(Coverage::Relaxed),
            Coverage::Relaxed => None,
        }
    }

    fn coverage_relation(self) -> Relation {
        if self.allows_multiple_dishes() {
            Relation::GreaterEq
        } else {
            Relation::Eq
        }
    }
}

/// Shape of the decision problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formulation {
    /// Binary choice per (day, meal type, recipe); no recipe repeats in the horizon.
    PerSlot,
    /// Servings per (day, recipe) up to `cap`; a fixed number of meals per day,
    /// maximizing calories consumed.
    DailyFrequency { cap: u32 },
}

/// Translates catalog, targets and slot structure into a [`ConstraintModel`].
pub struct ModelBuilder<'i, 'a> {
    index: &'i CatalogIndex<'a>,
    targets: NutritionTargets,
    days: usize,
    calorie_band: f64,
}

impl<'i, 'a> ModelBuilder<'i, 'a> {
    pub fn new(index: &'i CatalogIndex<'a>, targets: NutritionTargets, days: usize) -> Self {
        Self {
            index,
            targets,
            days,
            calorie_band: CALORIE_BAND,
        }
    }

    pub fn with_calorie_band(mut self, band: f64) -> Self {
        self.calorie_band = band;
        self
    }

    pub fn build(&self, coverage: Coverage, formulation: Formulation) -> ConstraintModel {
        let model = match formulation {
            Formulation::PerSlot => self.build_per_slot(coverage),
            Formulation::DailyFrequency { cap } => self.build_daily_frequency(coverage, cap),
        };

        debug!(
            ?coverage,
            ?formulation,
            variables = model.variables().len(),
            constraints = model.constraints().len(),
            "built constraint model"
        );
        model
    }

    fn build_per_slot(&self, coverage: Coverage) -> ConstraintModel {
        let mut model = ConstraintModel::new();
        let mut per_recipe: Vec<Vec<VarId>> = vec![Vec::new(); self.index.len()];

        for day in 0..self.days {
            let mut day_vars: Vec<(VarId, usize)> = Vec::new();

            for &meal_type in self.index.meal_types() {
                let mut slot_terms = Vec::new();
                for &slot in self.index.eligible(meal_type) {
                    let key = VarKey {
                        day,
                        meal_type: Some(meal_type),
                        slot,
                    };
                    let var = model.add_variable(key, 1);
                    slot_terms.push((var, 1.0));
                    day_vars.push((var, slot));
                    per_recipe[slot].push(var);
                }

                model.add_constraint(
                    ConstraintKind::SlotCoverage,
                    Some(day),
                    slot_terms,
                    coverage.coverage_relation(),
                    1.0,
                );
            }

            self.add_daily_nutrition(&mut model, day, &day_vars);
        }

        for vars in per_recipe.into_iter().filter(|v| v.len() > 1) {
            let terms = vars.into_iter().map(|v| (v, 1.0)).collect();
            model.add_constraint(
                ConstraintKind::Uniqueness,
                None,
                terms,
                Relation::LessEq,
                1.0,
            );
        }

        model
    }

    fn build_daily_frequency(&self, coverage: Coverage, cap: u32) -> ConstraintModel {
        let mut model = ConstraintModel::new();
        let meals_per_day = self.index.meal_types().len() as f64;
        let mut objective = Vec::new();

        for day in 0..self.days {
            let mut day_vars: Vec<(VarId, usize)> = Vec::with_capacity(self.index.len());
            for slot in 0..self.index.len() {
                let key = VarKey {
                    day,
                    meal_type: None,
                    slot,
                };
                let var = model.add_variable(key, cap);
                day_vars.push((var, slot));
                objective.push((var, self.index.nutrition(slot).calories));
            }

            let meal_terms = day_vars.iter().map(|&(v, _)| (v, 1.0)).collect();
            model.add_constraint(
                ConstraintKind::DailyMeals,
                Some(day),
                meal_terms,
                coverage.coverage_relation(),
                meals_per_day,
            );

            self.add_daily_nutrition(&mut model, day, &day_vars);
        }

        model.set_objective(objective);
        model
    }

    /// Calorie band plus one-sided macro ceilings for a day.
    fn add_daily_nutrition(
        &self,
        model: &mut ConstraintModel,
        day: usize,
        day_vars: &[(VarId, usize)],
    ) {
        let terms = |f: fn(&Nutrition) -> f64| -> Vec<(VarId, f64)> {
            day_vars
                .iter()
                .map(|&(var, slot)| (var, f(self.index.nutrition(slot))))
                .collect()
        };

        let (lower, upper) = self.targets.calorie_band(self.calorie_band);
        let calories = terms(|n| n.calories);
        model.add_constraint(
            ConstraintKind::CalorieFloor,
            Some(day),
            calories.clone(),
            Relation::GreaterEq,
            lower,
        );
        model.add_constraint(
            ConstraintKind::CalorieCeiling,
            Some(day),
            calories,
            Relation::LessEq,
            upper,
        );

        model.add_constraint(
            ConstraintKind::CarbsCeiling,
            Some(day),
            terms(|n| n.carbs),
            Relation::LessEq,
            self.targets.carbs_g as f64,
        );
        model.add_constraint(
            ConstraintKind::FatCeiling,
            Some(day),
            terms(|n| n.fats),
            Relation::LessEq,
            self.targets.fat_g as f64,
        );
        model.add_constraint(
            ConstraintKind::ProteinCeiling,
            Some(day),
            terms(|n| n.protein),
            Relation::LessEq,
            self.targets.protein_g as f64,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::models::Recipe;
    use crate::planner::targets::calculate_targets;
    use crate::state::RecipeCatalog;

    fn recipe(id: u32, calories: f64, meal_types: &[MealType]) -> Recipe {
        Recipe {
            id,
            name: format!("Recipe {}", id),
            calories,
            carbs: 20.0,
            fats: 8.0,
            protein: 12.0,
            meal_types: meal_types.iter().copied().collect::<BTreeSet<_>>(),
            servings: 1,
        }
    }

    fn catalog() -> RecipeCatalog {
        RecipeCatalog::new(vec![
            recipe(1, 400.0, &[MealType::Breakfast, MealType::Lunch]),
            recipe(2, 600.0, &[MealType::Lunch]),
            recipe(3, 700.0, &[MealType::Dinner]),
        ])
    }

    #[test]
    fn test_per_slot_variable_count() {
        let catalog = catalog();
        let meal_types = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];
        let index = CatalogIndex::build(&catalog, &meal_types);
        let targets = calculate_targets(1700.0, 0.5, 0.3, 0.2);
        let model = ModelBuilder::new(&index, targets, 2).build(Coverage::Strict, Formulation::PerSlot);

        // Per day: breakfast {1}, lunch {1, 2}, dinner {3} = 4 variables.
        assert_eq!(model.variables().len(), 8);
        assert!(model.variables().iter().all(|v| v.upper == 1));
        assert_eq!(model.constraints_of(ConstraintKind::SlotCoverage).count(), 6);
        assert!(
            model
                .constraints_of(ConstraintKind::SlotCoverage)
                .all(|c| c.relation == Relation::Eq)
        );
        // Recipe 1 appears in 4 variables; recipes 2 and 3 in 2 each.
        let uniqueness: Vec<usize> = model
            .constraints_of(ConstraintKind::Uniqueness)
            .map(|c| c.terms.len())
            .collect();
        assert_eq!(uniqueness, vec![4, 2, 2]);
        assert!(model.objective().is_none());
    }

    #[test]
    fn test_relaxed_coverage_is_at_least_one() {
        let catalog = catalog();
        let index = CatalogIndex::build(&catalog, &[MealType::Lunch]);
        let targets = calculate_targets(2000.0, 0.5, 0.3, 0.2);
        let model = ModelBuilder::new(&index, targets, 1).build(Coverage::Relaxed, Formulation::PerSlot);

        let coverage: Vec<&LinearConstraint> =
            model.constraints_of(ConstraintKind::SlotCoverage).collect();
        assert_eq!(coverage.len(), 1);
        assert_eq!(coverage[0].relation, Relation::GreaterEq);
    }

    #[test]
    fn test_calorie_band_and_ceilings() {
        let catalog = catalog();
        let index = CatalogIndex::build(&catalog, &[MealType::Lunch]);
        let targets = calculate_targets(2000.0, 0.5, 0.3, 0.2);
        let model = ModelBuilder::new(&index, targets, 1).build(Coverage::Strict, Formulation::PerSlot);

        let floor = model.constraints_of(ConstraintKind::CalorieFloor).next().unwrap();
        let ceiling = model.constraints_of(ConstraintKind::CalorieCeiling).next().unwrap();
        assert_eq!(floor.bound, 1900.0);
        assert_eq!(ceiling.bound, 2100.0);

        let carbs = model.constraints_of(ConstraintKind::CarbsCeiling).next().unwrap();
        assert_eq!(carbs.relation, Relation::LessEq);
        assert_eq!(carbs.bound, 250.0);
        let fat = model.constraints_of(ConstraintKind::FatCeiling).next().unwrap();
        assert_eq!(fat.bound, 66.0);
    }

    #[test]
    fn test_empty_slot_is_contradiction() {
        let catalog = catalog();
        let index = CatalogIndex::build(&catalog, &[MealType::Lunch, MealType::AfternoonSnack]);
        let targets = calculate_targets(2000.0, 0.5, 0.3, 0.2);
        let builder = ModelBuilder::new(&index, targets, 1);

        assert!(builder.build(Coverage::Strict, Formulation::PerSlot).has_contradiction());
        assert!(builder.build(Coverage::Relaxed, Formulation::PerSlot).has_contradiction());
    }

    #[test]
    fn test_daily_frequency_shape() {
        let catalog = catalog();
        let meal_types = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];
        let index = CatalogIndex::build(&catalog, &meal_types);
        let targets = calculate_targets(1700.0, 0.5, 0.3, 0.2);
        let model = ModelBuilder::new(&index, targets, 2)
            .build(Coverage::Strict, Formulation::DailyFrequency { cap: 2 });

        assert_eq!(model.variables().len(), 6);
        assert!(model.variables().iter().all(|v| v.upper == 2 && v.key.meal_type.is_none()));
        assert_eq!(model.constraints_of(ConstraintKind::Uniqueness).count(), 0);

        let meals: Vec<&LinearConstraint> = model.constraints_of(ConstraintKind::DailyMeals).collect();
        assert_eq!(meals.len(), 2);
        assert!(meals.iter().all(|c| c.relation == Relation::Eq && c.bound == 3.0));

        // 1 x recipe 1, 1 x recipe 2, 1 x recipe 3 on each day.
        let values = vec![1, 1, 1, 1, 1, 1];
        assert!(model.is_satisfied_by(&values));
        assert_eq!(model.objective_value(&values), 3400.0);
    }

    #[test]
    fn test_is_satisfied_by_checks_domains() {
        let catalog = catalog();
        let index = CatalogIndex::build(&catalog, &[MealType::Dinner]);
        let targets = calculate_targets(700.0, 1.0, 1.0, 1.0);
        let model = ModelBuilder::new(&index, targets, 1).build(Coverage::Strict, Formulation::PerSlot);

        assert!(model.is_satisfied_by(&[1]));
        assert!(!model.is_satisfied_by(&[0]));
        assert!(!model.is_satisfied_by(&[2]));
    }
}
