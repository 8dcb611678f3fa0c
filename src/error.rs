use thiserror::Error;

use crate::planner::EngineStatus;

#[derive(Debug, Error)]
pub enum DietError {
    #[error("Failed to load {source_name}: {reason}")]
    Load { source_name: String, reason: String },

    #[error("Food not found: {0}")]
    FoodNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unable to find feasible solution (solver status: {0})")]
    Solve(EngineStatus),

    #[error("No foods in database")]
    NoFoods,
}

impl DietError {
    pub fn load(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        DietError::Load {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DietError>;
