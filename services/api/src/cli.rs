use crate::demo::{run_draft, run_intent, DraftArgs, IntentArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rti_core::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "RTI Intelligence Pipeline",
    about = "Turn citizen grievances into Right to Information applications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the detected department and keywords for a grievance as JSON
    Intent(IntentArgs),
    /// Generate a complete RTI application and print it with its analysis
    Draft(DraftArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Intent(args) => run_intent(args).await,
        Command::Draft(args) => run_draft(args).await,
    }
}
