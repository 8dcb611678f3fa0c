use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Index of a decision variable within a [`DietModel`](super::DietModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VariableId(pub usize);

/// Servings of one food, with domain `[lower, upper]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionVariable {
    pub food: String,
    pub lower: f64,
    /// `None` means unbounded above.
    pub upper: Option<f64>,
}

/// `constant + Σ coefficient * variable`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinearExpr {
    pub terms: Vec<(VariableId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    pub fn push(&mut self, var: VariableId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    /// True when the expression has no variable terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Coefficients merged per variable, zeros dropped.
    pub fn coefficients(&self) -> BTreeMap<VariableId, f64> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var, coef) in &self.terms {
            *merged.entry(*var).or_insert(0.0) += coef;
        }
        merged.retain(|_, c| *c != 0.0);
        merged
    }

    /// `self - other`, merged per variable.
    pub fn minus(&self, other: &LinearExpr) -> LinearExpr {
        let mut merged = self.coefficients();
        for (var, coef) in other.coefficients() {
            *merged.entry(var).or_insert(0.0) -= coef;
        }
        merged.retain(|_, c| *c != 0.0);
        LinearExpr {
            terms: merged.into_iter().collect(),
            constant: self.constant - other.constant,
        }
    }

    /// Value of the expression for a full assignment indexed by variable.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|(var, coef)| coef * values.get(var.0).copied().unwrap_or(0.0))
                .sum::<f64>()
    }

    /// Render with food names in place of variable ids.
    pub fn render(&self, variables: &[DecisionVariable]) -> String {
        let mut parts: Vec<String> = self
            .terms
            .iter()
            .map(|(var, coef)| {
                let name = variables
                    .get(var.0)
                    .map(|v| v.food.as_str())
                    .unwrap_or("?");
                format!("{}*[{}]", fmt_number(*coef), name)
            })
            .collect();

        if self.constant != 0.0 || parts.is_empty() {
            parts.push(fmt_number(self.constant));
        }

        parts.join(" + ")
    }
}

fn fmt_number(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    format!("{}", rounded)
}

/// Which side of a bound a row enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RowRole {
    Lower,
    Upper,
}

impl fmt::Display for RowRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRole::Lower => write!(f, "lower bound"),
            RowRole::Upper => write!(f, "upper bound"),
        }
    }
}

/// The inequality `lhs <= rhs`, tagged with its nutrient and role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintRow {
    pub nutrient: String,
    pub role: RowRole,
    pub lhs: LinearExpr,
    pub rhs: LinearExpr,
}

impl ConstraintRow {
    /// Key used in the model summary, e.g. `"protein (g) (lower bound)"`.
    pub fn key(&self) -> String {
        format!("{} ({})", self.nutrient, self.role)
    }

    /// `rhs - lhs`; the row holds when this is non-negative.
    pub fn normalized(&self) -> LinearExpr {
        self.rhs.minus(&self.lhs)
    }

    /// Whether the row holds for an assignment, within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.normalized().evaluate(values) >= -tolerance
    }

    pub fn render(&self, variables: &[DecisionVariable]) -> String {
        format!(
            "{} <= {}",
            self.lhs.render(variables),
            self.rhs.render(variables)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(terms: &[(usize, f64)], constant: f64) -> LinearExpr {
        LinearExpr {
            terms: terms.iter().map(|(v, c)| (VariableId(*v), *c)).collect(),
            constant,
        }
    }

    #[test]
    fn test_minus_merges_terms() {
        let a = expr(&[(0, 90.0)], 0.0);
        let b = expr(&[(0, 20.0), (1, 40.0)], 0.0);
        let diff = a.minus(&b);
        assert_eq!(diff.terms, vec![(VariableId(0), 70.0), (VariableId(1), -40.0)]);
    }

    #[test]
    fn test_minus_drops_cancelled_terms() {
        let a = expr(&[(0, 5.0)], 1.0);
        let diff = a.minus(&a);
        assert!(diff.is_empty());
        assert_eq!(diff.constant, 0.0);
    }

    #[test]
    fn test_row_satisfaction() {
        let row = ConstraintRow {
            nutrient: "protein (g)".to_string(),
            role: RowRole::Lower,
            lhs: LinearExpr::constant(50.0),
            rhs: expr(&[(0, 25.0)], 0.0),
        };
        assert!(row.is_satisfied(&[2.0], 1e-9));
        assert!(!row.is_satisfied(&[1.9], 1e-9));
        assert_eq!(row.key(), "protein (g) (lower bound)");
    }

    #[test]
    fn test_render_uses_food_names() {
        let vars = vec![DecisionVariable {
            food: "Oats".to_string(),
            lower: 0.0,
            upper: Some(10.0),
        }];
        let row = ConstraintRow {
            nutrient: "fiber".to_string(),
            role: RowRole::Lower,
            lhs: LinearExpr::constant(25.0),
            rhs: expr(&[(0, 10.1)], 0.0),
        };
        assert_eq!(row.render(&vars), "25 <= 10.1*[Oats]");
    }
}
