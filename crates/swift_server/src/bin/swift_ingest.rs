//! swift_ingest: one-shot bulk loader for the SWIFT code catalog.
//!
//! Reads the whole CSV, then replaces the catalog's contents. Run it
//! offline; it is not part of the live request surface.
//!
//! # Usage
//!
//! ```bash
//! swift_ingest --input data/swift_codes.csv --database-url postgresql://localhost/swift_codes
//! swift_ingest --input data/swift_codes.csv --dry-run
//! ```

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use swift_core::ingest;
use swift_postgres::DatabaseConfig;

#[derive(Parser)]
#[command(name = "swift_ingest")]
#[command(about = "Replace the SWIFT code catalog with the contents of a CSV file")]
struct Cli {
    /// CSV file with SWIFT/BANK_NAME/ADDRESS/COUNTRY_ISO/COUNTRY_NAME columns
    #[arg(long, default_value = "data/swift_codes.csv")]
    input: PathBuf,

    /// Postgres connection string
    #[arg(long, env = "SWIFT_DATABASE_URL")]
    database_url: Option<String>,

    /// Parse and report without touching the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,swift_ingest=debug".into()),
        )
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let source = ingest::parse_file(&cli.input)?;
    tracing::info!(
        rows_read = source.rows_read,
        records = source.records.len(),
        skipped = source.skipped,
        "parsed {}",
        cli.input.display()
    );

    if cli.dry_run {
        println!(
            "Dry run: {} rows read, {} records parsed, {} skipped",
            source.rows_read,
            source.records.len(),
            source.skipped
        );
        return Ok(());
    }

    let Some(database_url) = cli.database_url.or_else(|| std::env::var("DATABASE_URL").ok())
    else {
        bail!("no database configured: pass --database-url or set SWIFT_DATABASE_URL");
    };

    let store = swift_postgres::open_store(&DatabaseConfig::new(database_url)).await?;
    let report = ingest::ingest(&store, source).await?;

    println!(
        "Successfully imported {} SWIFT code records ({} rows read, {} skipped)",
        report.inserted, report.rows_read, report.skipped
    );
    Ok(())
}
