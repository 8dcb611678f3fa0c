use std::collections::{HashMap, HashSet};

use diet_optimizer_rs::models::{FoodEntry, NutrientBound};
use diet_optimizer_rs::planner::{
    LinearExpr, ModelBuilder, ModelWarning, RowRole, VariableId,
};
use diet_optimizer_rs::{NutrientDatabase, OptimizerConfig};

fn make_food(name: &str, nutrients: &[(&str, f64)]) -> FoodEntry {
    FoodEntry::new(
        name,
        nutrients
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect::<HashMap<_, _>>(),
    )
}

fn two_food_db() -> NutrientDatabase {
    NutrientDatabase::with_columns(
        vec!["energy (kcal)".to_string(), "total fat (g)".to_string()],
        vec![
            make_food("A", &[("energy (kcal)", 100.0), ("total fat (g)", 10.0)]),
            make_food("B", &[("energy (kcal)", 200.0), ("total fat (g)", 0.0)]),
        ],
    )
}

fn terms(expr: &LinearExpr) -> Vec<(usize, f64)> {
    expr.terms.iter().map(|(v, c)| (v.0, *c)).collect()
}

fn assert_terms_close(actual: &LinearExpr, expected: &[(usize, f64)]) {
    let actual = terms(actual);
    assert_eq!(actual.len(), expected.len(), "terms: {:?}", actual);
    for ((av, ac), (ev, ec)) in actual.iter().zip(expected) {
        assert_eq!(av, ev);
        assert!((ac - ec).abs() < 1e-9, "coefficient {} != {}", ac, ec);
    }
}

#[test]
fn test_fat_percent_of_calories_rows() {
    let db = two_food_db();
    let config = OptimizerConfig::default();
    let builder = ModelBuilder::new(&db, &config).unwrap();

    let bound = NutrientBound::percent_of_calories("total fat (g)", Some(20.0), Some(30.0), 9.0);
    let (rows, warnings) = builder.build_constraints(&[bound]);

    assert!(warnings.is_empty());
    assert_eq!(rows.len(), 2);

    // 0.20 * (100 vA + 200 vB) <= 9 * 10 vA
    let lower = &rows[0];
    assert_eq!(lower.role, RowRole::Lower);
    assert_terms_close(&lower.lhs, &[(0, 20.0), (1, 40.0)]);
    assert_terms_close(&lower.rhs, &[(0, 90.0)]);

    // 9 * 10 vA <= 0.30 * (100 vA + 200 vB)
    let upper = &rows[1];
    assert_eq!(upper.role, RowRole::Upper);
    assert_terms_close(&upper.lhs, &[(0, 90.0)]);
    assert_terms_close(&upper.rhs, &[(0, 30.0), (1, 60.0)]);

    // rearranged for the engine: 0 <= rhs - lhs
    assert_terms_close(&lower.normalized(), &[(0, 70.0), (1, -40.0)]);
    assert_terms_close(&upper.normalized(), &[(0, -60.0), (1, 60.0)]);
}

#[test]
fn test_percent_rows_are_linear_in_servings() {
    let db = two_food_db();
    let config = OptimizerConfig::default();
    let builder = ModelBuilder::new(&db, &config).unwrap();
    let bound = NutrientBound::percent_of_calories("total fat (g)", Some(20.0), Some(30.0), 9.0);
    let (rows, _) = builder.build_constraints(&[bound]);

    // Each row's slack is a fixed coefficient vector: evaluating it at a
    // scaled assignment scales the value by the same factor.
    for row in &rows {
        let slack = row.normalized();
        assert_eq!(slack.constant, 0.0);
        let at_one = slack.evaluate(&[1.0, 1.0]);
        let at_three = slack.evaluate(&[3.0, 3.0]);
        assert!((at_three - 3.0 * at_one).abs() < 1e-9);
        assert!(slack.terms.iter().all(|(v, _)| v.0 < 2));
    }
}

#[test]
fn test_zero_or_missing_lower_bound_builds_no_rows() {
    let db = two_food_db();
    let config = OptimizerConfig::default();
    let builder = ModelBuilder::new(&db, &config).unwrap();

    let bounds = [
        NutrientBound::absolute("energy (kcal)", None, Some(2500.0)),
        NutrientBound::absolute("total fat (g)", Some(0.0), Some(70.0)),
    ];
    let model = builder.build(&bounds);

    assert_eq!(model.rows_for("energy (kcal)").count(), 0);
    assert_eq!(model.rows_for("total fat (g)").count(), 0);
    assert!(model.rows.is_empty());
    assert_eq!(model.bounds.len(), 2);
}

#[test]
fn test_nutrient_absent_from_every_food_warns_and_keeps_row() {
    let db = two_food_db();
    let config = OptimizerConfig::default();
    let model = ModelBuilder::new(&db, &config)
        .unwrap()
        .build(&[NutrientBound::absolute("vitamin c (mg)", Some(90.0), Some(2000.0))]);

    assert!(model.warnings.contains(&ModelWarning::NoContributingFoods {
        nutrient: "vitamin c (mg)".to_string()
    }));

    let lower = model.row("vitamin c (mg) (lower bound)").unwrap();
    assert!(lower.rhs.is_empty());
    // 90 <= 0 cannot hold for any servings
    assert!(!lower.is_satisfied(&[10.0, 10.0], 1e-9));

    let upper = model.row("vitamin c (mg) (upper bound)").unwrap();
    assert!(upper.is_satisfied(&[10.0, 10.0], 1e-9));
}

#[test]
fn test_model_is_idempotent() {
    let db = two_food_db();
    let config = OptimizerConfig::default();
    let bounds = [
        NutrientBound::absolute("energy (kcal)", Some(1800.0), Some(2200.0)),
        NutrientBound::percent_of_calories("total fat (g)", Some(20.0), Some(35.0), 9.0),
    ];

    let first = ModelBuilder::new(&db, &config).unwrap().build(&bounds);
    let second = ModelBuilder::new(&db, &config).unwrap().build(&bounds);

    assert_eq!(first.variables, second.variables);
    assert_eq!(first.objective, second.objective);

    let keys = |m: &diet_optimizer_rs::planner::DietModel| -> HashSet<String> {
        m.rows.iter().map(|r| format!("{:?}", r)).collect()
    };
    assert_eq!(keys(&first), keys(&second));
    assert_eq!(first.rows.len(), 4);
}

#[test]
fn test_objective_and_variable_domains() {
    let db = two_food_db();
    let config = OptimizerConfig::default();
    let model = ModelBuilder::new(&db, &config).unwrap().build(&[]);

    assert_eq!(model.variables.len(), 2);
    assert_eq!(model.variable("B"), Some(VariableId(1)));
    assert!(
        model
            .variables
            .iter()
            .all(|v| v.lower == 0.0 && v.upper == Some(10.0))
    );
    assert_eq!(terms(&model.objective), vec![(0, 100.0), (1, 200.0)]);
}
