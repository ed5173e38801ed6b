use crate::commands::{run_report, run_status, ReportArgs, StatusArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tenant_docs::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tenant Document Compliance",
    about = "Serve and inspect employee and equipment document compliance",
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
    /// Print the document status of one employee or vehicle from a snapshot
    Status(StatusArgs),
    /// Print the compliance report of a company from a snapshot
    Report(ReportArgs),
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
        Command::Status(args) => run_status(args),
        Command::Report(args) => run_report(args),
    }
}
