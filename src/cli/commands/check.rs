use crate::cli::args::CheckArgs;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::drift::check_for_updates;
use crate::error::Result;
use crate::output;
use crate::progress::{self, messages, ProgressManager};

/// Execute check-updates command: 0 up to date, 1 new documents upstream
pub async fn execute(args: CheckArgs, format: OutputFormat, quiet: bool) -> Result<u8> {
    let config = Config::load()?;
    let db_path = args.db.unwrap_or(config.store.db_path.clone());
    let (client, endpoints) = super::upstream(&config, args.api_key)?;

    let spinner = ProgressManager::new(quiet).spinner(messages::CHECKING);
    let result = check_for_updates(&client, &endpoints, &db_path, config.ingest.max_retries).await;
    progress::finish(spinner);

    let report = result?;
    println!("{}", output::format_drift_report(&report, format)?);
    Ok(report.exit_code())
}
