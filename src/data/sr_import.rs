//! Reader for the USDA Standard Reference abbreviated food table.
//!
//! The file is ISO-8859-1 text, one food per line, fields separated by `^`
//! and text fields wrapped in `~`.

use std::collections::HashMap;
use std::io::{Read, Write};

use tracing::info;

use crate::data::loader::{DESCRIPTION_COLUMN, parse_amount};
use crate::data::NutrientDatabase;
use crate::error::{DietError, Result};
use crate::models::FoodEntry;

/// Column names of the abbreviated table, in file order.
pub const SR_ABBREV_COLUMNS: [&str; 53] = [
    "id",
    "description",
    "water (g)",
    "energy (kcal)",
    "protein (g)",
    "total fat (g)",
    "ash (g)",
    "carbohydrate (g)",
    "dietary fiber (g)",
    "sugar (g)",
    "calcium (mg)",
    "iron (mg)",
    "magnesium (mg)",
    "phosphorus (mg)",
    "potassium (mg)",
    "sodium (mg)",
    "zinc (mg)",
    "copper (mg)",
    "manganese (mg)",
    "selenium (μg)",
    "vitamin c (mg)",
    "thiamin (mg)",
    "riboflavin (mg)",
    "niacin (mg)",
    "pantothenic acid (mg)",
    "vitamin b6 (mg)",
    "total folate (μg)",
    "folic acid (μg)",
    "food folate (μg)",
    "dietary folate equivalents (μg)",
    "choline (mg)",
    "vitamin b12 (μg)",
    "vitamin a (iu)",
    "vitamin a retinol activity equivalents (μg)",
    "retinol (μg)",
    "alpha-carotene (μg)",
    "beta-carotene (μg)",
    "beta-cryptoxanthin (μg)",
    "lycopene (μg)",
    "lutein + zeazanthin (μg)",
    "vitamin e (alpha-tocopherol) (mg)",
    "vitamin d (μg)",
    "vitamin d (iu)",
    "vitamin k (phylloquinone) (μg)",
    "saturated fatty acid (g)",
    "monounsaturated fatty acids (g)",
    "polyunsaturated fatty acids (g)",
    "cholesterol (mg)",
    "first household weight",
    "first household weight description",
    "second household weight",
    "second household weight description",
    "percent refuse",
];

/// Nutrient columns span `water (g)` through `cholesterol (mg)`.
const FIRST_NUTRIENT_COL: usize = 2;
const LAST_NUTRIENT_COL: usize = 47;

const DESCRIPTION_COL: usize = 1;

/// Decode ISO-8859-1 bytes; every byte maps to the code point of equal value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Names of the nutrient columns kept from the abbreviated table.
pub fn sr_nutrient_columns() -> Vec<String> {
    SR_ABBREV_COLUMNS[FIRST_NUTRIENT_COL..=LAST_NUTRIENT_COL]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Read the abbreviated table into a database of its nutrient columns.
pub fn read_sr_abbrev<R: Read>(reader: R, source_name: &str) -> Result<NutrientDatabase> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'^')
        .quote(b'~')
        .has_headers(false)
        .from_reader(reader);

    let nutrient_names = sr_nutrient_columns();
    let mut foods = Vec::new();

    for record in rdr.byte_records() {
        let record = record.map_err(|e| DietError::load(source_name, e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != SR_ABBREV_COLUMNS.len() {
            return Err(DietError::load(
                source_name,
                format!(
                    "line {}: expected {} fields, found {}",
                    line,
                    SR_ABBREV_COLUMNS.len(),
                    record.len()
                ),
            ));
        }

        let description = decode_latin1(&record[DESCRIPTION_COL]).trim().to_string();

        let mut nutrients = HashMap::with_capacity(nutrient_names.len());
        for (offset, name) in nutrient_names.iter().enumerate() {
            let cell = decode_latin1(&record[FIRST_NUTRIENT_COL + offset]);
            let amount = parse_amount(&cell).ok_or_else(|| {
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
                format!("line {}: negative or non-finite amount for '{}'", line, food.description),
            ));
        }
        foods.push(food);
    }

    let db = NutrientDatabase::with_columns(nutrient_names, foods);
    info!(source = source_name, foods = db.len(), "read SR abbreviated table");
    Ok(db)
}

/// Write a database as a food-table CSV readable by
/// [`read_foods`](crate::data::read_foods).
pub fn write_food_table<W: Write>(db: &NutrientDatabase, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![DESCRIPTION_COLUMN.to_string()];
    header.extend(db.nutrient_names().iter().cloned());
    wtr.write_record(&header)?;

    for food in db.foods() {
        let mut row = vec![food.description.clone()];
        row.extend(
            db.nutrient_names()
                .iter()
                .map(|n| food.amount_of(n).to_string()),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
