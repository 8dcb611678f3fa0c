mod database;
mod loader;
mod sr_import;

pub use database::NutrientDatabase;
pub use loader::{DESCRIPTION_COLUMN, load_bounds, load_foods, read_bounds, read_foods};
pub use sr_import::{SR_ABBREV_COLUMNS, read_sr_abbrev, sr_nutrient_columns, write_food_table};
