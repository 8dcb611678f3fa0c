use crate::planner::{DietModel, DietReport, summarize_model};

fn fmt_bound(bound: Option<f64>) -> String {
    bound.map(|b| b.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Display the selected foods and nutrient totals.
pub fn display_report(report: &DietReport, details: bool) {
    for warning in &report.warnings {
        println!("Warning! {}", warning);
    }

    println!("Diet:");
    println!("{}", "-".repeat(50));
    println!();

    if report.foods.is_empty() {
        println!("(no foods selected)");
    }

    for line in &report.foods {
        println!("{:7.1}g: {}", line.grams, line.food);

        if details {
            for c in &line.contributions {
                println!("\t{:3.1}% of {}", c.percent, c.nutrient);
            }
            println!();
        }
    }

    println!();
    println!("Nutrient totals");
    println!("{}", "-".repeat(50));
    println!();

    for n in &report.nutrients {
        let percent = n
            .percent_of_calories
            .map(|p| format!(" ({:3.1}% of calories)", p))
            .unwrap_or_default();
        let bounds = format!(" [{}, {}]", fmt_bound(n.lower), fmt_bound(n.upper));

        println!(
            "{:10.1} {:5}{:25}{:20}{}",
            n.total, n.unit, n.name, bounds, percent
        );
    }

    println!();
    println!("Total calories: {:.1}", report.total_calories);
}

/// Display one line per constraint row, keyed by nutrient and role.
pub fn display_model_summary(model: &DietModel) {
    println!(
        "{} variables, {} constraint rows",
        model.variables.len(),
        model.rows.len()
    );
    println!();

    for warning in &model.warnings {
        println!("Warning! {}", warning);
    }

    for (key, row) in summarize_model(model) {
        println!("{} {}", key, row);
    }
}
