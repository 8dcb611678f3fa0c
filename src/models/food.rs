use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A food with its nutrient amounts per 100 g serving.
///
/// Nutrients absent from the source row read as 0.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntry {
    pub description: String,

    pub nutrients: HashMap<String, f64>,
}

impl FoodEntry {
    pub fn new(description: impl Into<String>, nutrients: HashMap<String, f64>) -> Self {
        Self {
            description: description.into(),
            nutrients,
        }
    }

    /// Amount of a nutrient per 100 g, defaulting to 0.0 when absent.
    #[inline]
    pub fn amount_of(&self, nutrient: &str) -> f64 {
        self.nutrients.get(nutrient).copied().unwrap_or(0.0)
    }

    /// Whether this food carries a strictly positive amount of the nutrient.
    #[inline]
    pub fn contributes(&self, nutrient: &str) -> bool {
        self.amount_of(nutrient) > 0.0
    }

    /// Basic validation: every amount is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.nutrients.values().all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl PartialEq for FoodEntry {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
    }
}

impl Eq for FoodEntry {}
