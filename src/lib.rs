pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;

pub use config::OptimizerConfig;
pub use data::NutrientDatabase;
pub use error::{DietError, Result};
pub use models::{BoundKind, FoodEntry, NutrientBound, Solution};
