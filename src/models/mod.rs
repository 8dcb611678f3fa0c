mod bound;
mod food;
mod solution;

pub use bound::{BoundKind, NutrientBound};
pub use food::FoodEntry;
pub use solution::Solution;
