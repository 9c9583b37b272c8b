//! CLI application for guided loan application intake.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, extract, intake, parse, records};

/// Loan application OCR - Turn scanned application forms into validated records
#[derive(Parser)]
#[command(name = "loanocr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Guided intake: upload, review OCR text, edit fields, submit
    Intake(intake::IntakeArgs),

    /// Extract application fields from a single image
    Extract(extract::ExtractArgs),

    /// Extract application fields from already recognized text
    Parse(parse::ParseArgs),

    /// List submitted applications
    Records(records::RecordsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Intake(args) => intake::run(args, config_path).await,
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Parse(args) => parse::run(args, config_path).await,
        Commands::Records(args) => records::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
