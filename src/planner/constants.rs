/// Kilocalories per gram of carbohydrate.
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;

/// Kilocalories per gram of protein.
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;

/// Kilocalories per gram of fat.
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Half-width of the daily calorie band in the exact strategy (kcal).
pub const CALORIE_BAND: f64 = 100.0;

// ─────────────────────────────────────────────────────────────────────────────
// Exact strategy defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default solve-time ceiling per attempt, in seconds.
pub const DEFAULT_SOLVE_TIME_LIMIT_SECS: u64 = 30;

/// Default per-day servings cap in the daily-frequency formulation.
pub const DEFAULT_MEAL_FREQUENCY_CAP: u32 = 2;

// ─────────────────────────────────────────────────────────────────────────────
// Greedy strategy defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Relative tolerance around each slot's calorie share (±15%).
pub const DEFAULT_SLOT_TOLERANCE: f64 = 0.15;
