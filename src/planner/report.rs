use serde::Serialize;

use crate::config::OptimizerConfig;
use crate::data::NutrientDatabase;
use crate::models::Solution;
use crate::planner::builder::DietModel;
use crate::planner::constants::GRAMS_PER_SERVING;
use crate::planner::evaluation::{percent_contribution, percent_of_calories};

/// A food's share of one nutrient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub nutrient: String,
    pub percent: f64,
}

/// One selected food.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodLine {
    pub food: String,
    pub servings: f64,
    pub grams: f64,
    /// Empty unless details were requested.
    pub contributions: Vec<Contribution>,
}

/// One bound-table nutrient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientLine {
    pub nutrient: String,
    pub name: String,
    pub unit: String,
    pub total: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    /// Achieved percent of calories, for percent-of-calories bounds.
    pub percent_of_calories: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DietReport {
    /// Sorted by food name.
    pub foods: Vec<FoodLine>,
    /// In bound-table order.
    pub nutrients: Vec<NutrientLine>,
    pub total_calories: f64,
    /// Objective evaluated at the chosen servings.
    pub objective_value: f64,
    pub warnings: Vec<String>,
}

/// Split `"total fat (g)"` into `("total fat", "g")`.
///
/// Names without a parenthesized suffix have an empty unit.
pub fn split_unit(nutrient: &str) -> (&str, &str) {
    match nutrient.rsplit_once('(') {
        Some((name, unit)) => (name.trim_end(), unit.trim_end_matches(')')),
        None => (nutrient, ""),
    }
}

/// Assemble the report data for a solution.
pub fn build_report(
    db: &NutrientDatabase,
    model: &DietModel,
    solution: &Solution,
    config: &OptimizerConfig,
    details: bool,
) -> DietReport {
    let total_calories = solution.total_of(&config.calories_nutrient).unwrap_or(0.0);
    let values: Vec<f64> = model
        .variables
        .iter()
        .map(|v| solution.servings_of(&v.food))
        .collect();
    let objective_value = model.objective.evaluate(&values);

    // BTreeMap keys iterate in name order
    let foods = solution
        .servings
        .iter()
        .map(|(food, servings)| {
            let contributions = if details {
                model
                    .bounds
                    .iter()
                    .filter(|b| db.get(food).is_some_and(|f| f.contributes(&b.nutrient)))
                    .filter_map(|b| {
                        percent_contribution(db, food, &b.nutrient, solution).map(|percent| {
                            Contribution {
                                nutrient: b.nutrient.clone(),
                                percent,
                            }
                        })
                    })
                    .filter(|c| c.percent > config.contribution_threshold)
                    .collect()
            } else {
                Vec::new()
            };

            FoodLine {
                food: food.clone(),
                servings: *servings,
                grams: servings * GRAMS_PER_SERVING,
                contributions,
            }
        })
        .collect();

    let nutrients = model
        .bounds
        .iter()
        .map(|bound| {
            let total = solution.total_of(&bound.nutrient).unwrap_or(0.0);
            let (name, unit) = split_unit(&bound.nutrient);
            NutrientLine {
                nutrient: bound.nutrient.clone(),
                name: name.to_string(),
                unit: unit.to_string(),
                total,
                lower: bound.lower,
                upper: bound.upper,
                percent_of_calories: bound
                    .calories_per_gram()
                    .and_then(|factor| percent_of_calories(total, factor, total_calories)),
            }
        })
        .collect();

    DietReport {
        foods,
        nutrients,
        total_calories,
        objective_value,
        warnings: model.warnings.iter().map(|w| w.to_string()).collect(),
    }
}
