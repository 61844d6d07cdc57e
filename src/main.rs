use std::path::Path;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biotools_harvest::cli::{Cli, Commands};
use biotools_harvest::model::Config;
use biotools_harvest::retriever::BioPortalClient;
use biotools_harvest::service::{
    extraction, submission, ExtractionError, ExtractionService, PageDownloader, PagesError,
    RegistryClient, RegistryError, SubmissionError, SubmissionService,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Pages(#[from] PagesError),
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if let Err(error) = run(cli, config).await {
        tracing::error!(error = %error, "Run failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    match cli.command {
        Commands::Extract {
            listing,
            tool_type,
            output,
        } => {
            let service = ExtractionService::new(BioPortalClient::new(&config.ontology));
            let records = service.extract_file(&listing, &tool_type).await?;
            extraction::write_records(&output, &records)?;
            tracing::info!(
                tools = records.len(),
                output = %output.display(),
                "Extraction complete"
            );
        }
        Commands::Submit { input } => {
            let tools = submission::load_tools(&input)?;
            let client = RegistryClient::new(&config.registry)?;
            let service = SubmissionService::new(client);

            let summary = service.submit_all(tools).await;

            let (report_path, failed_path) = submission::write_artifacts(&summary, Path::new("."))?;
            tracing::info!(
                succeeded = summary.succeeded,
                failed = summary.failed.len(),
                report = %report_path.display(),
                failed_records = %failed_path.display(),
                "Submission complete"
            );
        }
        Commands::Pages { out_dir } => {
            let downloader = PageDownloader::new(&config.registry);
            let pages = downloader.download_all(&out_dir).await?;
            tracing::info!(pages, "Listing download complete");
        }
    }

    Ok(())
}
