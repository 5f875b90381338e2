//! atmos CLI - render audio files through the environmental audio engine.

mod commands;
mod wav;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "atmos")]
#[command(author, version, about = "atmos environmental audio engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the engine
    Process(commands::process::ProcessArgs),

    /// List, show and export factory scenarios
    Scenarios(commands::scenarios::ScenariosArgs),

    /// Show engine information, or the metadata of a WAV file
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Scenarios(args) => commands::scenarios::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
