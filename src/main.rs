use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use sales_scenes::{aggregate, load_csv, TOP_N};

const DEFAULT_DATA_FILE: &str = "car_sales.csv";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let csv_path = PathBuf::from(
        args.get(1)
            .map(String::as_str)
            .unwrap_or(DEFAULT_DATA_FILE),
    );

    match args.get(2).map(String::as_str) {
        // Headless mode: dump all three derived datasets as JSON
        Some("export") => run_export(&csv_path, args.get(3).map(Path::new)),
        Some(other) => anyhow::bail!("Unknown mode: {} (expected \"export\")", other),
        None => run_ui_mode(&csv_path),
    }
}

fn run_export(csv_path: &Path, out_path: Option<&Path>) -> Result<()> {
    // Status goes to stderr so stdout stays valid JSON
    eprintln!("📊 Loading records from {}...", csv_path.display());
    let records = load_csv(csv_path)?;
    eprintln!("✓ Loaded {} records", records.len());

    let shares = aggregate::yearly_shares(&records);
    let export = serde_json::json!({
        "yearly_totals": aggregate::yearly_totals(&records),
        "market_share": aggregate::stack_shares(&shares),
        "top_brands": aggregate::top_brands(&records, TOP_N),
    });

    let body = serde_json::to_string_pretty(&export)?;

    match out_path {
        Some(path) => {
            std::fs::write(path, body)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Wrote derived datasets to {}", path.display());
        }
        None => println!("{}", body),
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(csv_path: &Path) -> Result<()> {
    use sales_scenes::ui;

    println!("📊 Loading records from {}...", csv_path.display());
    let records = load_csv(csv_path)?;
    println!("✓ Loaded {} records\n", records.len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(records);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_csv_path: &Path) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or run headless: sales-scenes <data.csv> export");
    std::process::exit(1);
}
