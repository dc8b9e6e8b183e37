use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{MealType, Nutrition};

/// Weekday labels; plan days map onto them cyclically starting from Monday.
pub const DAY_LABELS: [&str; 7] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

/// Weekday label for a 1-based plan day (day 8 is MONDAY again).
pub fn day_label(day: usize) -> &'static str {
    DAY_LABELS[day.saturating_sub(1) % DAY_LABELS.len()]
}

/// One recipe placed in a meal slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLine {
    pub recipe_id: u32,
    pub name: String,
    pub servings: u32,
    pub nutrition: Nutrition,
}

/// Per-day totals plus the signed gap to the calorie target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    #[serde(flatten)]
    pub nutrition: Nutrition,
    pub calorie_deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: String,
    /// Only non-empty slots appear, in canonical meal type order.
    pub meal_types: BTreeMap<MealType, Vec<PlanLine>>,
    pub daily_totals: DailyTotals,
}

impl DayPlan {
    pub fn lines(&self) -> impl Iterator<Item = (MealType, &PlanLine)> {
        self.meal_types
            .iter()
            .flat_map(|(mt, lines)| lines.iter().map(move |line| (*mt, line)))
    }

    pub fn recipe_count(&self) -> usize {
        self.meal_types.values().map(Vec::len).sum()
    }
}

/// Targets echoed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTargets {
    pub calories_per_day: f64,
    pub carbs: u32,
    pub protein: u32,
    pub fats: u32,
}

/// The complete response produced for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanResponse {
    pub success: bool,
    pub meal_plan: Vec<DayPlan>,
    pub targets: PlanTargets,
}

impl MealPlanResponse {
    /// Every (recipe id, day index, meal type) placement in the plan.
    pub fn placements(&self) -> Vec<(u32, usize, MealType)> {
        self.meal_plan
            .iter()
            .enumerate()
            .flat_map(|(day, plan)| {
                plan.lines()
                    .map(move |(mt, line)| (line.recipe_id, day + 1, mt))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
