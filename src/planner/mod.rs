pub mod builder;
pub mod constants;
pub mod engine;
pub mod evaluation;
pub mod linear;
pub mod optimize;
pub mod report;

pub use builder::{DietModel, ModelBuilder, ModelWarning, summarize_model};
pub use constants::*;
pub use engine::{EngineResult, EngineStatus, LpEngine, MicroLpEngine};
pub use evaluation::{
    evaluate, extract_solution, percent_contribution, percent_of_calories, realized_nutrient_total,
};
pub use linear::{ConstraintRow, DecisionVariable, LinearExpr, RowRole, VariableId};
pub use optimize::{OptimizationOutcome, optimize_diet};
pub use report::{Contribution, DietReport, FoodLine, NutrientLine, build_report, split_unit};
