use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;

use diet_optimizer_rs::data::{read_sr_abbrev, write_food_table};
use diet_optimizer_rs::error::{DietError, Result};

#[derive(Parser, Debug)]
#[command(name = "sr_import")]
#[command(about = "Convert the USDA SR abbreviated table into a nutrient CSV")]
struct Args {
    /// Path to ABBREV.txt
    #[arg(long, default_value = "ABBREV.txt")]
    input: PathBuf,

    /// Output CSV file
    #[arg(long, default_value = "nutrients.csv")]
    output: PathBuf,
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let input = File::open(&args.input)
        .map_err(|e| DietError::load(args.input.display().to_string(), e.to_string()))?;
    let db = read_sr_abbrev(input, &args.input.display().to_string())?;

    let output = BufWriter::new(File::create(&args.output)?);
    write_food_table(&db, output)?;

    println!(
        "Wrote {} foods with {} nutrients to {}",
        db.len(),
        db.nutrient_names().len(),
        args.output.display()
    );
    Ok(())
}
