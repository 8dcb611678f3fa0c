use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DietError, Result};
use crate::planner::constants::{
    CALORIES_NAME, CONTRIBUTION_THRESHOLD_PCT, DEFAULT_MAX_SERVINGS, FAT_CALORIES_PER_GRAM,
    FAT_NAME,
};

/// Settings for one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Food-table column holding calories per 100 g.
    pub calories_nutrient: String,

    /// Upper bound on servings per food; `None` leaves foods unbounded.
    pub max_servings: Option<f64>,

    /// Nutrients bounded as a percent of total calories, mapped to their
    /// calories per gram.
    pub percent_rules: BTreeMap<String, f64>,

    /// Minimum percent contribution shown in the per-food breakdown.
    pub contribution_threshold: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            calories_nutrient: CALORIES_NAME.to_string(),
            max_servings: Some(DEFAULT_MAX_SERVINGS),
            percent_rules: BTreeMap::from([(FAT_NAME.to_string(), FAT_CALORIES_PER_GRAM)]),
            contribution_threshold: CONTRIBUTION_THRESHOLD_PCT,
        }
    }
}

impl OptimizerConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: OptimizerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.calories_nutrient.trim().is_empty() {
            return Err(DietError::InvalidInput(
                "calories_nutrient must not be empty".to_string(),
            ));
        }

        if let Some(max) = self.max_servings {
            if !max.is_finite() || max < 0.0 {
                return Err(DietError::InvalidInput(format!(
                    "max_servings must be a non-negative number, got {}",
                    max
                )));
            }
        }

        for (nutrient, factor) in &self.percent_rules {
            if !factor.is_finite() || *factor <= 0.0 {
                return Err(DietError::InvalidInput(format!(
                    "calories per gram for {} must be positive, got {}",
                    nutrient, factor
                )));
            }
        }

        Ok(())
    }

    /// Conversion factor for a percent-of-calories nutrient.
    pub fn percent_rule(&self, nutrient: &str) -> Option<f64> {
        self.percent_rules.get(nutrient).copied()
    }
}

/// Parse a `NUTRIENT=FACTOR` command-line override.
pub fn parse_percent_rule(s: &str) -> Result<(String, f64)> {
    let (name, factor) = s.rsplit_once('=').ok_or_else(|| {
        DietError::InvalidInput(format!("expected NUTRIENT=FACTOR, got '{}'", s))
    })?;

    let factor: f64 = factor
        .trim()
        .parse()
        .map_err(|_| DietError::InvalidInput(format!("invalid factor in '{}'", s)))?;

    Ok((name.trim().to_string(), factor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_has_fat_rule() {
        let config = OptimizerConfig::default();
        assert_eq!(config.percent_rule("total fat (g)"), Some(9.0));
        assert_eq!(config.percent_rule("carbohydrate (g)"), None);
        assert_eq!(config.max_servings, Some(10.0));
    }

    #[test]
    fn test_load_partial_json() {
        let json = r#"{"max_servings": null, "percent_rules": {"carbohydrate (g)": 4}}"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = OptimizerConfig::load(file.path()).unwrap();
        assert_eq!(config.max_servings, None);
        assert_eq!(config.percent_rule("carbohydrate (g)"), Some(4.0));
        assert_eq!(config.percent_rule(FAT_NAME), None);
        assert_eq!(config.calories_nutrient, "energy (kcal)");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = OptimizerConfig {
            max_servings: Some(-1.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.max_servings = None;
        config.percent_rules.insert("protein (g)".to_string(), 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_percent_rule() {
        let (name, factor) = parse_percent_rule("carbohydrate (g)=4").unwrap();
        assert_eq!(name, "carbohydrate (g)");
        assert_eq!(factor, 4.0);
        assert!(parse_percent_rule("carbohydrate (g)").is_err());
        assert!(parse_percent_rule("fat=nine").is_err());
    }
}
