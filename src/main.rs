mod categorize;
mod dataset;
mod export;
mod import;
mod insights;
mod models;
mod run;
mod store;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    let store = store::Store::open(&db_path)?;

    match args.len() {
        2.. => run::as_cli(&args, &store),
        _ => {
            run::print_usage();
            Ok(())
        }
    }
}

fn get_db_path() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendtrack", "SpendTrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("spendtrack.db"))
}
