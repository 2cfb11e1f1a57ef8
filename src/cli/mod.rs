pub mod args;
pub mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::process::ExitCode;

use crate::drift::CHECK_FAILED_EXIT_CODE;
use crate::error::KolexError;

/// Korean legislation ingestion pipeline
#[derive(Parser, Debug)]
#[command(
    name = "kolex",
    about = "Ingest Korean legislation from law.go.kr into a searchable SQLite store",
    version,
    author,
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover laws and write one seed file per document
    #[command(alias = "i")]
    Ingest(args::IngestArgs),

    /// Rebuild the SQLite store from the seed files
    #[command(alias = "b")]
    Build(args::BuildArgs),

    /// Check upstream for documents missing from the store
    #[command(name = "check-updates", alias = "u")]
    CheckUpdates(args::CheckArgs),

    /// Manage configuration
    #[command(alias = "c")]
    Config(args::ConfigArgs),

    /// Show version information
    Version,

    /// Generate shell completion scripts
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    fn generate_completions(shell: Shell) {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
    }

    /// Run the CLI application and map the outcome to a process exit code
    pub async fn run() -> ExitCode {
        let cli = Self::parse();

        let default_filter = if cli.verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

        let is_check = matches!(cli.command, Commands::CheckUpdates(_));
        let result = match cli.command {
            Commands::Ingest(args) => commands::ingest::execute(args, cli.format, cli.quiet).await,
            Commands::Build(args) => commands::build::execute(args, cli.format, cli.quiet),
            Commands::CheckUpdates(args) => commands::check::execute(args, cli.format, cli.quiet).await,
            Commands::Config(args) => commands::config::execute(args).map(|()| 0),
            Commands::Version => {
                commands::version::execute();
                Ok(0)
            }
            Commands::Completions { shell } => {
                Self::generate_completions(shell);
                Ok(0)
            }
        };

        match result {
            Ok(code) => ExitCode::from(code),
            Err(e) => {
                report_error(&e, cli.verbose);
                if is_check {
                    ExitCode::from(CHECK_FAILED_EXIT_CODE)
                } else {
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn report_error(e: &KolexError, verbose: bool) {
    match e {
        KolexError::Network(err) => eprintln!("Network error: {}", err),
        KolexError::Parse(msg) => {
            eprintln!("Error parsing response: {}", msg);
            if !verbose {
                eprintln!("\nRun with --verbose for more details.");
            }
        }
        _ => eprintln!("Error: {}", e),
    }

    if let Some(hint) = e.hint() {
        eprintln!("\nHint: {}", hint);
    }
}
