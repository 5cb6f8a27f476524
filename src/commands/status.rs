use crate::services::csv_loader;
use crate::utils::format_date;
use std::path::{Path, PathBuf};

pub fn run(data_dir: PathBuf) {
    println!("📊 Observation Catalog Status\n");

    match show_status(&data_dir) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn show_status(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = csv_loader::load_directory(data_dir)?;

    if catalog.is_empty() {
        println!("⚠️  No company files found in {}", data_dir.display());
        return Ok(());
    }

    println!("🏢 Total companies: {}\n", catalog.len());

    for (company, series) in &catalog {
        match (series.first(), series.last()) {
            (Some(first), Some(last)) => {
                println!(
                    "🔹 {:<12} {:>6} records  ({} → {})",
                    company,
                    series.len(),
                    format_date(&first.date),
                    format_date(&last.date)
                );
            }
            _ => println!("🔹 {:<12} no records", company),
        }
    }

    Ok(())
}
