use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Calories and macronutrient grams.
///
/// Used both per serving (on a recipe) and as an accumulated total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fats: f64,
}

impl Nutrition {
    pub fn new(calories: f64, carbs: f64, protein: f64, fats: f64) -> Self {
        Self {
            calories,
            carbs,
            protein,
            fats,
        }
    }

    /// Nutrition of `servings` units.
    #[inline]
    pub fn scaled(&self, servings: u32) -> Nutrition {
        let factor = servings as f64;
        Nutrition {
            calories: self.calories * factor,
            carbs: self.carbs * factor,
            protein: self.protein * factor,
            fats: self.fats * factor,
        }
    }
}

impl Add for Nutrition {
    type Output = Nutrition;

    fn add(self, rhs: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories + rhs.calories,
            carbs: self.carbs + rhs.carbs,
            protein: self.protein + rhs.protein,
            fats: self.fats + rhs.fats,
        }
    }
}

impl AddAssign for Nutrition {
    fn add_assign(&mut self, rhs: Nutrition) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled() {
        let n = Nutrition::new(250.0, 30.0, 12.5, 8.0).scaled(3);
        assert_eq!(n, Nutrition::new(750.0, 90.0, 37.5, 24.0));
    }

    #[test]
    fn test_add_assign() {
        let mut total = Nutrition::default();
        total += Nutrition::new(100.0, 10.0, 5.0, 2.0);
        total += Nutrition::new(50.0, 5.0, 1.0, 1.0);
        assert_eq!(total, Nutrition::new(150.0, 15.0, 6.0, 3.0));
    }
}
