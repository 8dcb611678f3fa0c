use std::fmt;

use good_lp::solvers::microlp::microlp;
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, constraint,
    variable,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{DietError, Result};
use crate::planner::builder::DietModel;
use crate::planner::linear::LinearExpr;

/// Outcome reported by an LP engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngineStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    Error,
}

impl EngineStatus {
    /// Whether the engine produced usable variable values.
    pub fn has_solution(self) -> bool {
        matches!(self, EngineStatus::Optimal | EngineStatus::Feasible)
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineStatus::Optimal => "OPTIMAL",
            EngineStatus::Feasible => "FEASIBLE",
            EngineStatus::Infeasible => "INFEASIBLE",
            EngineStatus::Unbounded => "UNBOUNDED",
            EngineStatus::Error => "ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Status plus one value per model variable (empty without a solution).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineResult {
    pub status: EngineStatus,
    pub values: Vec<f64>,
}

impl EngineResult {
    pub fn without_solution(status: EngineStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
        }
    }

    /// Variable values, or a solve error when the status carries none.
    pub fn values(&self) -> Result<&[f64]> {
        if self.status.has_solution() {
            Ok(&self.values)
        } else {
            Err(DietError::Solve(self.status))
        }
    }
}

/// A black-box LP solver: minimizes the model objective subject to its rows
/// and variable domains.
pub trait LpEngine {
    fn solve(&self, model: &DietModel) -> EngineResult;
}

/// Pure-Rust simplex engine from `good_lp`'s microlp backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpEngine;

fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Expression {
    let mut e = Expression::from_other_affine(expr.constant);
    for (id, coef) in &expr.terms {
        e += *coef * vars[id.0];
    }
    e
}

impl LpEngine for MicroLpEngine {
    fn solve(&self, model: &DietModel) -> EngineResult {
        let mut problem_vars = ProblemVariables::new();
        let vars: Vec<Variable> = model
            .variables
            .iter()
            .map(|v| {
                let mut def = variable().min(v.lower).name(v.food.clone());
                if let Some(upper) = v.upper {
                    def = def.max(upper);
                }
                problem_vars.add(def)
            })
            .collect();

        let objective = to_expression(&model.objective, &vars);
        let mut problem = problem_vars.minimise(objective).using(microlp);

        for row in &model.rows {
            // rhs - lhs >= 0
            let slack = to_expression(&row.normalized(), &vars);
            problem.add_constraint(constraint!(slack >= 0.0));
            debug!(row = %row.key(), "submitted row");
        }

        let result = match problem.solve() {
            Ok(solution) => EngineResult {
                status: EngineStatus::Optimal,
                values: vars.iter().map(|v| solution.value(*v)).collect(),
            },
            Err(ResolutionError::Infeasible) => {
                EngineResult::without_solution(EngineStatus::Infeasible)
            }
            Err(ResolutionError::Unbounded) => {
                EngineResult::without_solution(EngineStatus::Unbounded)
            }
            Err(e) => {
                debug!(error = %e, "solver failed");
                EngineResult::without_solution(EngineStatus::Error)
            }
        };

        info!(status = %result.status, "solved diet model");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_require_solution() {
        let ok = EngineResult {
            status: EngineStatus::Feasible,
            values: vec![1.0],
        };
        assert_eq!(ok.values().unwrap(), &[1.0]);

        let infeasible = EngineResult::without_solution(EngineStatus::Infeasible);
        assert!(matches!(
            infeasible.values(),
            Err(DietError::Solve(EngineStatus::Infeasible))
        ));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(EngineStatus::Unbounded.to_string(), "UNBOUNDED");
        assert!(!EngineStatus::Error.has_solution());
    }
}
