use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The evaluated outcome of one optimization run.
///
/// `servings` holds only foods with a materially non-zero value, in units of
/// 100 g servings. `nutrients` holds the realized total of every bound-table
/// nutrient, re-summed from the database rather than read from the solver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub servings: BTreeMap<String, f64>,

    pub nutrients: BTreeMap<String, f64>,
}

impl Solution {
    /// Servings chosen for a food, 0.0 when it was not selected.
    #[inline]
    pub fn servings_of(&self, food: &str) -> f64 {
        self.servings.get(food).copied().unwrap_or(0.0)
    }

    /// Realized total of a nutrient, if it was evaluated.
    #[inline]
    pub fn total_of(&self, nutrient: &str) -> Option<f64> {
        self.nutrients.get(nutrient).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.servings.is_empty()
    }
}
