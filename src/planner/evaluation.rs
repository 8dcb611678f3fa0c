use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::data::NutrientDatabase;
use crate::error::{DietError, Result};
use crate::models::Solution;
use crate::planner::builder::DietModel;
use crate::planner::constants::SOLUTION_EPSILON;
use crate::planner::engine::{EngineResult, EngineStatus};
use crate::planner::linear::DecisionVariable;

/// Servings per food from an engine result, dropping values at or below
/// [`SOLUTION_EPSILON`].
///
/// Fails with a solve error when the engine found no solution or returned a
/// value count that does not match the variables.
pub fn extract_solution(
    result: &EngineResult,
    variables: &[DecisionVariable],
) -> Result<BTreeMap<String, f64>> {
    let values = result.values()?;
    if values.len() != variables.len() {
        warn!(
            values = values.len(),
            variables = variables.len(),
            "engine returned a solution of the wrong length"
        );
        return Err(DietError::Solve(EngineStatus::Error));
    }

    Ok(variables
        .iter()
        .zip(values)
        .filter(|(_, value)| **value > SOLUTION_EPSILON)
        .map(|(var, value)| (var.food.clone(), *value))
        .collect())
}

/// Total of a nutrient in the diet, re-summed from the database.
pub fn realized_nutrient_total(
    db: &NutrientDatabase,
    servings: &BTreeMap<String, f64>,
    nutrient: &str,
) -> f64 {
    servings
        .iter()
        .filter_map(|(food, qty)| db.get(food).map(|f| f.amount_of(nutrient) * qty))
        .sum()
}

/// Share of a nutrient's realized total supplied by one food, in percent.
///
/// `None` when the realized total is zero.
pub fn percent_contribution(
    db: &NutrientDatabase,
    food: &str,
    nutrient: &str,
    solution: &Solution,
) -> Option<f64> {
    let total = solution.total_of(nutrient)?;
    if total == 0.0 {
        return None;
    }
    let amount = db.get(food)?.amount_of(nutrient);
    Some(100.0 * amount * solution.servings_of(food) / total)
}

/// Percent of total calories supplied by a nutrient.
///
/// `None` when total calories are zero.
pub fn percent_of_calories(nutrient_total: f64, calories_per_gram: f64, calories: f64) -> Option<f64> {
    if calories == 0.0 {
        return None;
    }
    Some(100.0 * nutrient_total * calories_per_gram / calories)
}

/// Turn an engine result into a [`Solution`] covering every bound-table
/// nutrient and the calorie column.
pub fn evaluate(
    db: &NutrientDatabase,
    model: &DietModel,
    result: &EngineResult,
    calories_nutrient: &str,
) -> Result<Solution> {
    let servings = extract_solution(result, &model.variables)?;

    let nutrients: BTreeMap<String, f64> = model
        .bounds
        .iter()
        .map(|b| b.nutrient.as_str())
        .chain(std::iter::once(calories_nutrient))
        .map(|n| (n.to_string(), realized_nutrient_total(db, &servings, n)))
        .collect();

    debug!(foods = servings.len(), "evaluated solution");
    Ok(Solution {
        servings,
        nutrients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodEntry;

    fn db() -> NutrientDatabase {
        NutrientDatabase::new(vec![
            FoodEntry::new(
                "A",
                [("energy (kcal)".to_string(), 100.0), ("total fat (g)".to_string(), 10.0)]
                    .into_iter()
                    .collect(),
            ),
            FoodEntry::new(
                "B",
                [("energy (kcal)".to_string(), 200.0)].into_iter().collect(),
            ),
        ])
    }

    fn vars() -> Vec<DecisionVariable> {
        ["A", "B"]
            .iter()
            .map(|f| DecisionVariable {
                food: f.to_string(),
                lower: 0.0,
                upper: Some(10.0),
            })
            .collect()
    }

    #[test]
    fn test_extract_filters_noise() {
        let result = EngineResult {
            status: EngineStatus::Optimal,
            values: vec![1.5, 1e-11],
        };
        let servings = extract_solution(&result, &vars()).unwrap();
        assert_eq!(servings.len(), 1);
        assert_eq!(servings.get("A"), Some(&1.5));
    }

    #[test]
    fn test_extract_fails_without_solution() {
        let result = EngineResult::without_solution(EngineStatus::Unbounded);
        assert!(matches!(
            extract_solution(&result, &vars()),
            Err(DietError::Solve(EngineStatus::Unbounded))
        ));
    }

    #[test]
    fn test_extract_rejects_short_result() {
        let result = EngineResult {
            status: EngineStatus::Optimal,
            values: vec![1.0],
        };
        assert!(matches!(
            extract_solution(&result, &vars()),
            Err(DietError::Solve(EngineStatus::Error))
        ));

        let long = EngineResult {
            status: EngineStatus::Optimal,
            values: vec![1.0, 2.0, 3.0],
        };
        assert!(extract_solution(&long, &vars()).is_err());
    }

    #[test]
    fn test_realized_total() {
        let db = db();
        let servings = BTreeMap::from([("A".to_string(), 2.0), ("B".to_string(), 0.5)]);
        assert!((realized_nutrient_total(&db, &servings, "energy (kcal)") - 300.0).abs() < 1e-9);
        assert!((realized_nutrient_total(&db, &servings, "total fat (g)") - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_contribution_guards_zero_total() {
        let db = db();
        let solution = Solution {
            servings: BTreeMap::from([("B".to_string(), 1.0)]),
            nutrients: BTreeMap::from([
                ("energy (kcal)".to_string(), 200.0),
                ("total fat (g)".to_string(), 0.0),
            ]),
        };
        assert_eq!(percent_contribution(&db, "B", "total fat (g)", &solution), None);
        assert_eq!(
            percent_contribution(&db, "B", "energy (kcal)", &solution),
            Some(100.0)
        );
    }

    #[test]
    fn test_percent_of_calories() {
        assert_eq!(percent_of_calories(10.0, 9.0, 300.0), Some(30.0));
        assert_eq!(percent_of_calories(10.0, 9.0, 0.0), None);
    }
}
