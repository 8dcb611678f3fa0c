use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::OptimizerConfig;
use crate::data::NutrientDatabase;
use crate::error::{DietError, Result};
use crate::models::{BoundKind, NutrientBound};
use crate::planner::constants::{SUMMARY_EDGE_WIDTH, SUMMARY_MAX_WIDTH};
use crate::planner::linear::{ConstraintRow, DecisionVariable, LinearExpr, RowRole, VariableId};

/// Non-fatal problem found while building a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ModelWarning {
    /// No food has a positive amount of the nutrient, so its sum is empty
    /// and the row is vacuous or infeasible.
    NoContributingFoods { nutrient: String },

    /// The bound names a nutrient that is not a food-table column.
    UnknownNutrient {
        nutrient: String,
        suggestion: Option<String>,
    },
}

impl fmt::Display for ModelWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelWarning::NoContributingFoods { nutrient } => {
                write!(f, "Nutrient {} has no relevant foods", nutrient)
            }
            ModelWarning::UnknownNutrient {
                nutrient,
                suggestion: Some(s),
            } => write!(f, "Nutrient {} is not in the food table (did you mean {}?)", nutrient, s),
            ModelWarning::UnknownNutrient {
                nutrient,
                suggestion: None,
            } => write!(f, "Nutrient {} is not in the food table", nutrient),
        }
    }
}

/// A linear program: minimize `objective` subject to every row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DietModel {
    /// One variable per food, in database order.
    pub variables: Vec<DecisionVariable>,

    /// Total calories; minimized.
    pub objective: LinearExpr,

    pub rows: Vec<ConstraintRow>,

    /// The bound table the rows were built from.
    pub bounds: Vec<NutrientBound>,

    pub warnings: Vec<ModelWarning>,
}

impl DietModel {
    /// Variable for a food, if the food is in the model.
    pub fn variable(&self, food: &str) -> Option<VariableId> {
        self.variables
            .iter()
            .position(|v| v.food == food)
            .map(VariableId)
    }

    /// Rows built for a nutrient.
    pub fn rows_for<'a>(&'a self, nutrient: &'a str) -> impl Iterator<Item = &'a ConstraintRow> {
        self.rows.iter().filter(move |r| r.nutrient == nutrient)
    }

    /// Row by its summary key, e.g. `"protein (g) (lower bound)"`.
    pub fn row(&self, key: &str) -> Option<&ConstraintRow> {
        self.rows.iter().find(|r| r.key() == key)
    }
}

/// One `(key, rendered row)` pair per row of the model, long rows
/// abbreviated to their two ends.
pub fn summarize_model(model: &DietModel) -> Vec<(String, String)> {
    model
        .rows
        .iter()
        .map(|row| (row.key(), abbreviate(&row.render(&model.variables))))
        .collect()
}

fn abbreviate(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= SUMMARY_MAX_WIDTH {
        return s.to_string();
    }
    let head: String = chars[..SUMMARY_EDGE_WIDTH].iter().collect();
    let tail: String = chars[chars.len() - SUMMARY_EDGE_WIDTH..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Builds a [`DietModel`] from a database and a bound table.
///
/// Stateless: the same inputs always produce the same model.
pub struct ModelBuilder<'a> {
    db: &'a NutrientDatabase,
    config: &'a OptimizerConfig,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(db: &'a NutrientDatabase, config: &'a OptimizerConfig) -> Result<Self> {
        if db.is_empty() {
            return Err(DietError::NoFoods);
        }
        config.validate()?;
        if !db.has_nutrient(&config.calories_nutrient) {
            return Err(DietError::InvalidInput(format!(
                "food table has no '{}' column",
                config.calories_nutrient
            )));
        }
        Ok(Self { db, config })
    }

    /// One variable per food with domain `[0, max_servings]`.
    pub fn build_variables(&self) -> Vec<DecisionVariable> {
        self.db
            .foods()
            .iter()
            .map(|food| DecisionVariable {
                food: food.description.clone(),
                lower: 0.0,
                upper: self.config.max_servings,
            })
            .collect()
    }

    /// Total calories over every food.
    pub fn build_objective(&self) -> LinearExpr {
        let mut objective = LinearExpr::default();
        for (i, food) in self.db.foods().iter().enumerate() {
            objective.push(VariableId(i), food.amount_of(&self.config.calories_nutrient));
        }
        objective
    }

    /// `Σ scale * amount * servings` over foods with a positive amount.
    ///
    /// Records a warning when no food contributes.
    pub fn nutrient_sum(
        &self,
        nutrient: &str,
        scale: f64,
        warnings: &mut Vec<ModelWarning>,
    ) -> LinearExpr {
        let mut sum = LinearExpr::default();
        for (i, food) in self.db.contributors(nutrient) {
            sum.push(VariableId(i), scale * food.amount_of(nutrient));
        }

        if sum.is_empty() {
            let warning = ModelWarning::NoContributingFoods {
                nutrient: nutrient.to_string(),
            };
            if !warnings.contains(&warning) {
                warn!("{}", warning);
                warnings.push(warning);
            }
        }

        sum
    }

    /// Rows for every bound with a non-zero lower bound.
    pub fn build_constraints(
        &self,
        bounds: &[NutrientBound],
    ) -> (Vec<ConstraintRow>, Vec<ModelWarning>) {
        let mut rows = Vec::new();
        let mut warnings = Vec::new();

        for bound in bounds {
            let Some(lower) = bound.lower.filter(|_| bound.is_active()) else {
                debug!(nutrient = %bound.nutrient, "no lower bound, skipping");
                continue;
            };

            if !self.db.has_nutrient(&bound.nutrient) {
                let warning = ModelWarning::UnknownNutrient {
                    nutrient: bound.nutrient.clone(),
                    suggestion: self.db.suggest_nutrient(&bound.nutrient).map(String::from),
                };
                warn!("{}", warning);
                warnings.push(warning);
            }

            match bound.kind {
                BoundKind::PercentOfCalories { calories_per_gram } => self.percent_rows(
                    bound,
                    lower,
                    calories_per_gram,
                    &mut rows,
                    &mut warnings,
                ),
                BoundKind::Absolute => self.absolute_rows(bound, lower, &mut rows, &mut warnings),
            }
        }

        (rows, warnings)
    }

    /// `lower <= sum` and, with an upper bound, `sum <= upper`.
    fn absolute_rows(
        &self,
        bound: &NutrientBound,
        lower: f64,
        rows: &mut Vec<ConstraintRow>,
        warnings: &mut Vec<ModelWarning>,
    ) {
        let sum = self.nutrient_sum(&bound.nutrient, 1.0, warnings);

        rows.push(ConstraintRow {
            nutrient: bound.nutrient.clone(),
            role: RowRole::Lower,
            lhs: LinearExpr::constant(lower),
            rhs: sum.clone(),
        });
        debug!(nutrient = %bound.nutrient, lower, "absolute lower bound");

        if let Some(upper) = bound.upper {
            rows.push(ConstraintRow {
                nutrient: bound.nutrient.clone(),
                role: RowRole::Upper,
                lhs: sum,
                rhs: LinearExpr::constant(upper),
            });
            debug!(nutrient = %bound.nutrient, upper, "absolute upper bound");
        }
    }

    /// `lower% * calories <= factor * sum <= upper% * calories`.
    ///
    /// The percentage scales the calorie side so that no variable is divided
    /// by total calories.
    fn percent_rows(
        &self,
        bound: &NutrientBound,
        lower: f64,
        calories_per_gram: f64,
        rows: &mut Vec<ConstraintRow>,
        warnings: &mut Vec<ModelWarning>,
    ) {
        let calories = &self.config.calories_nutrient;
        let nutrient_calories = self.nutrient_sum(&bound.nutrient, calories_per_gram, warnings);

        rows.push(ConstraintRow {
            nutrient: bound.nutrient.clone(),
            role: RowRole::Lower,
            lhs: self.nutrient_sum(calories, lower / 100.0, warnings),
            rhs: nutrient_calories.clone(),
        });
        debug!(nutrient = %bound.nutrient, lower, "percent-of-calories lower bound");

        if let Some(upper) = bound.upper {
            rows.push(ConstraintRow {
                nutrient: bound.nutrient.clone(),
                role: RowRole::Upper,
                lhs: nutrient_calories,
                rhs: self.nutrient_sum(calories, upper / 100.0, warnings),
            });
            debug!(nutrient = %bound.nutrient, upper, "percent-of-calories upper bound");
        }
    }

    /// Build the complete model.
    pub fn build(&self, bounds: &[NutrientBound]) -> DietModel {
        let variables = self.build_variables();
        let objective = self.build_objective();
        let (rows, warnings) = self.build_constraints(bounds);

        info!(
            variables = variables.len(),
            rows = rows.len(),
            warnings = warnings.len(),
            "built diet model"
        );

        DietModel {
            variables,
            objective,
            rows,
            bounds: bounds.to_vec(),
            warnings,
        }
    }
}
