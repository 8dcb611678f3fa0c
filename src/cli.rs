use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{OptimizerConfig, parse_percent_rule};
use crate::error::Result;

/// DietOptimizer — choose food servings that minimize calories within nutrient bounds.
#[derive(Parser, Debug)]
#[command(name = "diet_optimizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the food nutrient CSV table.
    #[arg(short, long, default_value = "nutrients.csv")]
    pub nutrients: PathBuf,

    /// Path to the nutrient bound CSV table.
    #[arg(short, long, default_value = "constraints.csv")]
    pub constraints: PathBuf,

    /// Optional JSON configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum 100 g servings of any single food.
    #[arg(long, conflicts_with = "unbounded")]
    pub max_servings: Option<f64>,

    /// Remove the per-food serving cap.
    #[arg(long)]
    pub unbounded: bool,

    /// Bound a nutrient as a percent of calories (NUTRIENT=CALORIES_PER_GRAM, repeatable).
    #[arg(long = "percent", value_name = "NUTRIENT=FACTOR")]
    pub percent_rules: Vec<String>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve for the lowest-calorie diet and print it.
    Optimize {
        /// Show each food's contribution to every nutrient.
        #[arg(long)]
        details: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the constraint rows without solving.
    Summarize,
}

impl Default for Command {
    fn default() -> Self {
        Command::Optimize {
            details: false,
            json: false,
        }
    }
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<OptimizerConfig> {
        let mut config = match &self.config {
            Some(path) => OptimizerConfig::load(path)?,
            None => OptimizerConfig::default(),
        };

        if self.unbounded {
            config.max_servings = None;
        } else if let Some(max) = self.max_servings {
            config.max_servings = Some(max);
        }

        for rule in &self.percent_rules {
            let (nutrient, factor) = parse_percent_rule(rule)?;
            config.percent_rules.insert(nutrient, factor);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::parse_from([
            "diet_optimizer",
            "--unbounded",
            "--percent",
            "carbohydrate (g)=4",
            "optimize",
            "--details",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.max_servings, None);
        assert_eq!(config.percent_rule("carbohydrate (g)"), Some(4.0));
        assert_eq!(config.percent_rule("total fat (g)"), Some(9.0));
        assert!(matches!(
            cli.command,
            Some(Command::Optimize { details: true, json: false })
        ));
    }

    #[test]
    fn test_default_command_is_optimize() {
        let cli = Cli::parse_from(["diet_optimizer"]);
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Command::Optimize { .. }
        ));
    }
}
