use tracing::{info, warn};

use crate::config::OptimizerConfig;
use crate::data::NutrientDatabase;
use crate::error::Result;
use crate::models::{NutrientBound, Solution};
use crate::planner::builder::{DietModel, ModelBuilder};
use crate::planner::engine::LpEngine;
use crate::planner::evaluation::evaluate;
use crate::planner::report::{DietReport, build_report};

/// Everything produced by one optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub model: DietModel,
    pub solution: Solution,
    pub report: DietReport,
}

/// Build the model, solve it once and evaluate the result.
///
/// A solver status other than optimal or feasible is returned as a
/// [`DietError::Solve`](crate::error::DietError::Solve); no relaxation is
/// attempted.
pub fn optimize_diet<E: LpEngine + ?Sized>(
    db: &NutrientDatabase,
    bounds: &[NutrientBound],
    config: &OptimizerConfig,
    engine: &E,
    details: bool,
) -> Result<OptimizationOutcome> {
    let model = ModelBuilder::new(db, config)?.build(bounds);

    let result = engine.solve(&model);
    if !result.status.has_solution() {
        warn!(status = %result.status, "no feasible diet");
    }

    let solution = evaluate(db, &model, &result, &config.calories_nutrient)?;
    let report = build_report(db, &model, &solution, config, details);

    info!(
        foods = solution.servings.len(),
        calories = report.total_calories,
        "optimized diet"
    );

    Ok(OptimizationOutcome {
        model,
        solution,
        report,
    })
}
