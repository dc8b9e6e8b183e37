use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// A meal slot within a day.
///
/// Variant order is the canonical 0-based numbering used by request payloads,
/// the catalog `categories` column and the plan output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum MealType {
    Breakfast,
    MidMorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
}

impl MealType {
    /// All meal types in canonical order.
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::MidMorningSnack,
        MealType::Lunch,
        MealType::AfternoonSnack,
        MealType::Dinner,
    ];

    pub fn index(self) -> u8 {
        match self {
            MealType::Breakfast => 0,
            MealType::MidMorningSnack => 1,
            MealType::Lunch => 2,
            MealType::AfternoonSnack => 3,
            MealType::Dinner => 4,
        }
    }

    pub fn from_index(index: u8) -> Option<MealType> {
        MealType::ALL.get(index as usize).copied()
    }

    /// Upper-case display name, e.g. `MID_MORNING_SNACK`.
    pub fn display_name(self) -> &'static str {
        match self {
            MealType::Breakfast => "BREAKFAST",
            MealType::MidMorningSnack => "MID_MORNING_SNACK",
            MealType::Lunch => "LUNCH",
            MealType::AfternoonSnack => "AFTERNOON_SNACK",
            MealType::Dinner => "DINNER",
        }
    }

    /// Key used in the `mealTypes` object of a plan response.
    pub fn response_key(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::MidMorningSnack => "midMorningSnack",
            MealType::Lunch => "lunch",
            MealType::AfternoonSnack => "afternoonSnack",
            MealType::Dinner => "dinner",
        }
    }

    /// Share of the daily calories the greedy strategy aims for in this slot.
    pub fn calorie_share(self) -> f64 {
        match self {
            MealType::Breakfast => 0.20,
            MealType::MidMorningSnack => 0.10,
            MealType::Lunch => 0.35,
            MealType::AfternoonSnack => 0.10,
            MealType::Dinner => 0.25,
        }
    }

    /// Human-friendly lowercase name accepted on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::MidMorningSnack => "mid_morning_snack",
            MealType::Lunch => "lunch",
            MealType::AfternoonSnack => "afternoon_snack",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for MealType {
    type Err = PlanError;

    /// Accepts a canonical index (`"2"`), a slug (`"lunch"`), a display name
    /// (`"MID_MORNING_SNACK"`) or a response key (`"afternoonSnack"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<u8>() {
            return MealType::from_index(index)
                .ok_or_else(|| PlanError::InvalidInput(format!("Unknown meal type index {}", index)));
        }

        let normalized = s.to_lowercase().replace(['-', ' '], "_");
        MealType::ALL
            .into_iter()
            .find(|mt| {
                mt.slug() == normalized || mt.response_key().to_lowercase() == normalized
            })
            .ok_or_else(|| PlanError::InvalidInput(format!("Unknown meal type '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shares_sum_to_one() {
        let total: f64 = MealType::ALL.iter().map(|mt| mt.calorie_share()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_index_round_trip() {
        for mt in MealType::ALL {
            assert_eq!(MealType::from_index(mt.index()), Some(mt));
        }
        assert_eq!(MealType::from_index(5), None);
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("2".parse::<MealType>().unwrap(), MealType::Lunch);
        assert_eq!("lunch".parse::<MealType>().unwrap(), MealType::Lunch);
        assert_eq!(
            "MID_MORNING_SNACK".parse::<MealType>().unwrap(),
            MealType::MidMorningSnack
        );
        assert_eq!(
            "afternoonSnack".parse::<MealType>().unwrap(),
            MealType::AfternoonSnack
        );
        assert!("brunch".parse::<MealType>().is_err());
        assert!("7".parse::<MealType>().is_err());
    }

    #[test]
    fn test_serializes_as_response_key() {
        let json = serde_json::to_string(&MealType::MidMorningSnack).unwrap();
        assert_eq!(json, "\"midMorningSnack\"");
    }
}
