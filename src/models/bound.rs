use serde::{Deserialize, Serialize};

/// How a bound row is turned into constraints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundKind {
    /// Lower and upper bounds are absolute amounts of the nutrient.
    Absolute,

    /// Bounds are percentages of total calories; `calories_per_gram`
    /// converts the nutrient amount into calories.
    PercentOfCalories { calories_per_gram: f64 },
}

/// One row of the bound table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientBound {
    pub nutrient: String,

    pub lower: Option<f64>,

    pub upper: Option<f64>,

    pub kind: BoundKind,
}

impl NutrientBound {
    pub fn absolute(nutrient: impl Into<String>, lower: Option<f64>, upper: Option<f64>) -> Self {
        Self {
            nutrient: nutrient.into(),
            lower,
            upper,
            kind: BoundKind::Absolute,
        }
    }

    pub fn percent_of_calories(
        nutrient: impl Into<String>,
        lower: Option<f64>,
        upper: Option<f64>,
        calories_per_gram: f64,
    ) -> Self {
        Self {
            nutrient: nutrient.into(),
            lower,
            upper,
            kind: BoundKind::PercentOfCalories { calories_per_gram },
        }
    }

    /// A missing or zero lower bound disables the row entirely.
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.lower, Some(l) if l != 0.0)
    }

    /// Conversion factor when the bound is percent-of-calories.
    pub fn calories_per_gram(&self) -> Option<f64> {
        match self.kind {
            BoundKind::PercentOfCalories { calories_per_gram } => Some(calories_per_gram),
            BoundKind::Absolute => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_or_missing_lower_is_inactive() {
        assert!(!NutrientBound::absolute("sugar (g)", None, Some(25.0)).is_active());
        assert!(!NutrientBound::absolute("sugar (g)", Some(0.0), Some(25.0)).is_active());
        assert!(NutrientBound::absolute("protein (g)", Some(56.0), None).is_active());
    }

    #[test]
    fn test_calories_per_gram() {
        let fat = NutrientBound::percent_of_calories("total fat (g)", Some(20.0), Some(35.0), 9.0);
        assert_eq!(fat.calories_per_gram(), Some(9.0));
        assert_eq!(
            NutrientBound::absolute("iron (mg)", Some(8.0), Some(45.0)).calories_per_gram(),
            None
        );
    }
}
