use crate::cli::args::BuildArgs;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::output;
use crate::progress::{self, messages, ProgressManager};
use crate::store::IndexBuilder;

/// Execute build command
pub fn execute(args: BuildArgs, format: OutputFormat, quiet: bool) -> Result<u8> {
    let config = Config::load()?;
    let seed_dir = args.seed_dir.unwrap_or(config.ingest.seed_dir);
    let db_path = args.db.unwrap_or(config.store.db_path);

    let spinner = ProgressManager::new(quiet).spinner(messages::BUILDING);
    let result = IndexBuilder::new(seed_dir, db_path).build();
    progress::finish(spinner);

    let report = result?;
    println!("{}", output::format_build_report(&report, format)?);
    Ok(0)
}
