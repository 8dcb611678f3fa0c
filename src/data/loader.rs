use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::OptimizerConfig;
use crate::data::NutrientDatabase;
use crate::error::{DietError, Result};
use crate::models::{BoundKind, FoodEntry, NutrientBound};

/// Food-table column holding the food's unique key.
pub const DESCRIPTION_COLUMN: &str = "description";

/// One row of the bound table as it appears in the file.
#[derive(Debug, Deserialize)]
struct BoundRecord {
    nutrient: String,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| DietError::load(path.display().to_string(), e.to_string()))
}

/// Parse a nutrient cell: blank reads as 0.0.
pub(crate) fn parse_amount(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0.0);
    }
    cell.parse::<f64>().ok()
}

/// Load the food table from a CSV file.
pub fn load_foods<P: AsRef<Path>>(path: P) -> Result<NutrientDatabase> {
    let path = path.as_ref();
    read_foods(open(path)?, &path.display().to_string())
}

/// Read a food table: a `description` column plus one numeric column per
/// nutrient.
///
/// Rejects tables without a header or `description` column, rows whose
/// column count differs from the header, non-numeric and negative cells.
pub fn read_foods<R: Read>(reader: R, source_name: &str) -> Result<NutrientDatabase> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| DietError::load(source_name, e.to_string()))?
        .clone();

    if headers.is_empty() {
        return Err(DietError::load(source_name, "table is empty"));
    }

    let desc_col = headers
        .iter()
        .position(|h| h == DESCRIPTION_COLUMN)
        .ok_or_else(|| {
            DietError::load(
                source_name,
                format!("missing '{}' column", DESCRIPTION_COLUMN),
            )
        })?;

    let nutrient_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != desc_col && !h.is_empty())
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut foods = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| DietError::load(source_name, e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let description = record.get(desc_col).unwrap_or_default();
        if description.is_empty() {
            return Err(DietError::load(
                source_name,
                format!("line {}: empty description", line),
            ));
        }

        let mut nutrients = HashMap::with_capacity(nutrient_cols.len());
        for (col, name) in &nutrient_cols {
            let cell = record.get(*col).unwrap_or_default();
            let amount = parse_amount(cell).ok_or_else(|| {
                DietError::load(
                    source_name,
                    format!("line {}, column '{}': '{}' is not a number", line, name, cell),
                )
            })?;
            nutrients.insert(name.clone(), amount);
        }

        let food = FoodEntry::new(description, nutrients);
        if !food.is_valid() {
            return Err(DietError::load(
                source_name,
                format!("line {}: negative or non-finite amount for '{}'", line, description),
            ));
        }
        foods.push(food);
    }

    let names = nutrient_cols.into_iter().map(|(_, n)| n).collect();
    let db = NutrientDatabase::with_columns(names, foods);
    info!(
        source = source_name,
        foods = db.len(),
        nutrients = db.nutrient_names().len(),
        "loaded food table"
    );
    Ok(db)
}

/// Load the bound table from a CSV file.
pub fn load_bounds<P: AsRef<Path>>(path: P, config: &OptimizerConfig) -> Result<Vec<NutrientBound>> {
    let path = path.as_ref();
    read_bounds(open(path)?, &path.display().to_string(), config)
}

/// Read a bound table with `nutrient`, `lower_bound` and `upper_bound`
/// columns. Blank bounds read as absent.
///
/// Each bound's kind comes from the configured percent rules.
pub fn read_bounds<R: Read>(
    reader: R,
    source_name: &str,
    config: &OptimizerConfig,
) -> Result<Vec<NutrientBound>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut seen = HashSet::new();
    let mut bounds = Vec::new();

    for record in rdr.deserialize::<BoundRecord>() {
        let record = record.map_err(|e| DietError::load(source_name, e.to_string()))?;

        if record.nutrient.is_empty() {
            return Err(DietError::load(source_name, "bound row with empty nutrient"));
        }
        if !seen.insert(record.nutrient.clone()) {
            return Err(DietError::load(
                source_name,
                format!("duplicate bound for '{}'", record.nutrient),
            ));
        }

        for (column, value) in [
            ("lower_bound", record.lower_bound),
            ("upper_bound", record.upper_bound),
        ] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(DietError::load(
                    source_name,
                    format!("{} for '{}' is not a finite number", column, record.nutrient),
                ));
            }
        }

        let kind = match config.percent_rule(&record.nutrient) {
            Some(calories_per_gram) => BoundKind::PercentOfCalories { calories_per_gram },
            None => BoundKind::Absolute,
        };
        debug!(nutrient = %record.nutrient, ?kind, "bound row");

        bounds.push(NutrientBound {
            nutrient: record.nutrient,
            lower: record.lower_bound,
            upper: record.upper_bound,
            kind,
        });
    }

    info!(source = source_name, bounds = bounds.len(), "loaded bound table");
    Ok(bounds)
}
