use std::collections::{BTreeSet, HashMap};

use strsim::jaro_winkler;
use tracing::warn;

use crate::error::{DietError, Result};
use crate::models::FoodEntry;
use crate::planner::constants::SUGGESTION_MIN_SIMILARITY;

/// In-memory food table, immutable after construction.
///
/// Foods keep their load order so that models built from the same table are
/// identical run to run.
#[derive(Debug, Clone, Default)]
pub struct NutrientDatabase {
    foods: Vec<FoodEntry>,

    /// Position in `foods` keyed by description.
    index: HashMap<String, usize>,

    /// Nutrient columns in source order.
    nutrient_names: Vec<String>,
}

impl NutrientDatabase {
    /// Build a database from foods, deriving the column list from their keys.
    ///
    /// Duplicate descriptions: last occurrence wins, at the first position.
    pub fn new(foods: Vec<FoodEntry>) -> Self {
        let names: BTreeSet<String> = foods
            .iter()
            .flat_map(|f| f.nutrients.keys().cloned())
            .collect();
        Self::with_columns(names.into_iter().collect(), foods)
    }

    /// Build a database with an explicit column list.
    ///
    /// Every food gets every column, missing values defaulting to 0.0.
    pub fn with_columns(nutrient_names: Vec<String>, foods: Vec<FoodEntry>) -> Self {
        let mut entries: Vec<FoodEntry> = Vec::with_capacity(foods.len());
        let mut index: HashMap<String, usize> = HashMap::new();

        for mut food in foods {
            for name in &nutrient_names {
                food.nutrients.entry(name.clone()).or_insert(0.0);
            }

            match index.get(&food.description) {
                Some(&pos) => {
                    warn!(food = %food.description, "duplicate food description, keeping last row");
                    entries[pos] = food;
                }
                None => {
                    index.insert(food.description.clone(), entries.len());
                    entries.push(food);
                }
            }
        }

        Self {
            foods: entries,
            index,
            nutrient_names,
        }
    }

    /// Get a food by its description.
    pub fn get(&self, description: &str) -> Option<&FoodEntry> {
        self.index.get(description).map(|&i| &self.foods[i])
    }

    /// Amount of a nutrient per 100 g of a food.
    pub fn amount_of(&self, food: &str, nutrient: &str) -> Result<f64> {
        self.get(food)
            .map(|f| f.amount_of(nutrient))
            .ok_or_else(|| DietError::FoodNotFound(food.to_string()))
    }

    /// All foods in load order.
    pub fn foods(&self) -> &[FoodEntry] {
        &self.foods
    }

    /// Nutrient columns in source order.
    pub fn nutrient_names(&self) -> &[String] {
        &self.nutrient_names
    }

    /// Whether the table has a column for this nutrient.
    pub fn has_nutrient(&self, nutrient: &str) -> bool {
        self.nutrient_names.iter().any(|n| n == nutrient)
    }

    /// Foods carrying a strictly positive amount of the nutrient, with their
    /// position in load order.
    pub fn contributors<'a>(
        &'a self,
        nutrient: &'a str,
    ) -> impl Iterator<Item = (usize, &'a FoodEntry)> {
        self.foods
            .iter()
            .enumerate()
            .filter(move |(_, f)| f.contributes(nutrient))
    }

    /// Closest known column name, for reporting misspelled nutrients.
    pub fn suggest_nutrient(&self, nutrient: &str) -> Option<&str> {
        let target = nutrient.to_lowercase();
        self.nutrient_names
            .iter()
            .map(|n| (n, jaro_winkler(&target, &n.to_lowercase())))
            .filter(|(_, score)| *score >= SUGGESTION_MIN_SIMILARITY)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(n, _)| n.as_str())
    }

    /// Count of foods in the database.
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    /// Check if the database has no foods.
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}
