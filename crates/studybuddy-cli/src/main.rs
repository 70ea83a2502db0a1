//! studybuddy CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::study::StudyArgs;

#[derive(Parser)]
#[command(
    name = "studybuddy",
    version,
    about = "Turn study material into an interactive quiz",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Flags for the default `study` command
    #[command(flatten)]
    study: StudyArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Quiz yourself on pasted text or a file (default)
    Study(StudyArgs),

    /// Print the text extracted from a file
    Extract {
        /// File to read (txt, code, docx, pptx, pdf, png/jpg)
        #[arg(long)]
        file: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List models of the configured providers
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter studybuddy.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("studybuddy=warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Study(cli.study)) {
        Commands::Study(args) => commands::study::execute(args).await,
        Commands::Extract { file, config } => commands::extract::execute(file, config).await,
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
