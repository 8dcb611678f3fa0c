/// Food-table column holding calories per 100 g.
pub const CALORIES_NAME: &str = "energy (kcal)";

/// Food-table column holding total fat per 100 g.
pub const FAT_NAME: &str = "total fat (g)";

/// Calories per gram of fat.
pub const FAT_CALORIES_PER_GRAM: f64 = 9.0;

/// Default cap on 100 g servings of a single food.
pub const DEFAULT_MAX_SERVINGS: f64 = 10.0;

/// Solver values at or below this are numerical noise, not a selection.
pub const SOLUTION_EPSILON: f64 = 1e-10;

/// Grams in one serving.
pub const GRAMS_PER_SERVING: f64 = 100.0;

// ─────────────────────────────────────────────────────────────────────────────
// Display thresholds
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum percent contribution of a food to a nutrient worth reporting.
pub const CONTRIBUTION_THRESHOLD_PCT: f64 = 0.5;

/// Rendered rows longer than this are abbreviated in the model summary.
pub const SUMMARY_MAX_WIDTH: usize = 40;

/// Characters kept from each end of an abbreviated row.
pub const SUMMARY_EDGE_WIDTH: usize = 20;

/// Suggest a column for an unknown nutrient only above this similarity.
pub const SUGGESTION_MIN_SIMILARITY: f64 = 0.8;
