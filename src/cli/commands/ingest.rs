use crate::cli::args::IngestArgs;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::ingest::{IngestOptions, Ingestor, SeedStore};
use crate::output;
use crate::progress::{self, messages, ProgressManager};

/// Execute ingest command. Per-document failures still exit 0.
pub async fn execute(args: IngestArgs, format: OutputFormat, quiet: bool) -> Result<u8> {
    let config = Config::load()?;
    let (client, endpoints) = super::upstream(&config, args.api_key)?;

    let seeds = SeedStore::new(
        args.seed_dir.unwrap_or(config.ingest.seed_dir.clone()),
        args.index_path.unwrap_or(config.ingest.index_path.clone()),
    );
    let options = IngestOptions {
        skip_discovery: args.skip_discovery,
        limit: args.limit,
        retry_stubs: args.retry_stubs,
        max_retries: config.ingest.max_retries,
    };

    let progress_manager = ProgressManager::new(quiet);
    let spinner = if options.skip_discovery {
        None
    } else {
        progress_manager.spinner(messages::DISCOVERING)
    };
    let bar = progress_manager.ingest_bar();

    let ingestor = Ingestor::new(&client, endpoints, seeds)
        .with_spinner(spinner)
        .with_progress(bar.clone());
    let result = ingestor.run(&options).await;
    progress::finish(bar);

    let report = result?;
    println!("{}", output::format_ingest_report(&report, format)?);
    Ok(0)
}
