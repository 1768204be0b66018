use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopdata_core::ProductCategory;
use tracing_subscriber::EnvFilter;

mod process;
mod upload;

#[derive(Debug, Parser)]
#[command(name = "shopdata")]
#[command(about = "Normalize scraped product JSON and upload it to the catalog API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Flatten a raw scrape file into one record per product
    Extract {
        /// Raw scraper output (keyed map or `data.products` list)
        input: PathBuf,
        /// Where to write the extracted records
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Extract and normalize a raw scrape file, writing JSON, CSV and a report
    Process {
        /// Raw scraper output (keyed map or `data.products` list)
        input: PathBuf,
        /// Normalized JSON output [default: <input>.processed.json]
        #[arg(long)]
        json_out: Option<PathBuf>,
        /// Flattened CSV output [default: <input>.processed.csv]
        #[arg(long)]
        csv_out: Option<PathBuf>,
        /// Summary report output [default: <input>.report.json]
        #[arg(long)]
        report_out: Option<PathBuf>,
    },
    /// Print summary statistics for a processed JSON file
    Report {
        /// Processed JSON array
        input: PathBuf,
        /// Also write the report as JSON
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Upload processed products to the catalog API
    Upload {
        /// Processed JSON array
        input: PathBuf,
        /// Use the configured category id for every product
        #[arg(long, conflicts_with = "category_id")]
        category: Option<ProductCategory>,
        /// Use this category id for every product
        #[arg(long)]
        category_id: Option<i64>,
        /// Upload only the first N products
        #[arg(long)]
        limit: Option<usize>,
        /// Write the per-product upload outcome as JSON
        #[arg(long)]
        report_out: Option<PathBuf>,
    },
    /// Remove fields from every record of a processed JSON file, in place
    StripFields {
        /// Processed JSON array
        input: PathBuf,
        /// Field to remove; repeat for several
        #[arg(long = "field", short = 'f', required = true)]
        fields: Vec<String>,
        /// Skip writing `<input>.backup` before modifying the file
        #[arg(long)]
        no_backup: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = shopdata_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Extract { input, output } => process::run_extract(&input, &output),
        Commands::Process {
            input,
            json_out,
            csv_out,
            report_out,
        } => {
            let outputs = process::ProcessOutputs::resolve(&input, json_out, csv_out, report_out);
            process::run_process(&input, &outputs)
        }
        Commands::Report { input, output } => process::run_report(&input, output.as_deref()),
        Commands::Upload {
            input,
            category,
            category_id,
            limit,
            report_out,
        } => {
            let category_ids = shopdata_core::load_category_ids_from_env()?;
            let category_id =
                category_id.or_else(|| category.map(|c| category_ids.for_category(c)));
            upload::run_upload(
                &config,
                category_ids,
                &input,
                category_id,
                limit,
                report_out.as_deref(),
            )
            .await
        }
        Commands::StripFields {
            input,
            fields,
            no_backup,
        } => process::run_strip_fields(&input, &fields, !no_backup),
    }
}

#[cfg(test)]
mod tests;
