use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docsage_application::BootstrapOptions;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;
mod repl;

#[derive(Parser)]
#[command(name = "docsage")]
#[command(about = "Docsage - upload PDFs, get a combined summary, ask questions", long_about = None)]
struct Cli {
    /// Backend origin, overriding DOCSAGE_API_BASE_URL and config.toml
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Directory holding config.toml and the session store (default: $DOCSAGE_HOME)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Keep the session identity in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive workspace (default)
    Chat,
    /// Upload PDFs, summarize them and print the summary
    Upload {
        /// PDF files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Skip the summary step
        #[arg(long)]
        no_summarize: bool,
    },
    /// Inspect or end the current session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Show resolved configuration and session state
    Diagnose {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Print the session identifier and creation time
    Show,
    /// Forget the current session and start a new one
    Reset,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,docsage=debug"
    } else {
        "warn,docsage=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = BootstrapOptions {
        home: cli.home,
        backend_origin: cli.backend,
        ephemeral: cli.ephemeral,
    };

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => repl::run(options).await?,
        Commands::Upload {
            files,
            no_summarize,
        } => commands::upload::run(options, files, !no_summarize).await?,
        Commands::Session { action } => match action {
            SessionAction::Show => commands::session::show(options).await?,
            SessionAction::Reset => commands::session::reset(options).await?,
        },
        Commands::Diagnose { json } => commands::diagnose::run(options, json).await?,
    }

    Ok(())
}
