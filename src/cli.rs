use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "biotools-harvest",
    version,
    about = "Harvest EDAM annotations from bio.tools listing pages and republish tool records",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Log level filter used when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract tool records from a saved listing page
    Extract {
        /// Path to the rendered listing document
        #[arg(short = 'l', long)]
        listing: PathBuf,
        /// Classification applied to every extracted record
        #[arg(short = 't', long, default_value = "Web application")]
        tool_type: String,
        /// Output file for the JSON record array
        #[arg(short = 'o', long)]
        output: PathBuf,
    },
    /// Submit a JSON array of tool records to the registry
    Submit {
        /// Input JSON file
        input: PathBuf,
    },
    /// Download the registry's paginated XML listing
    Pages {
        /// Directory the page<N>.xml files are written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}
