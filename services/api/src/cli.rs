use crate::demo::{run_demo, run_overview, DemoArgs, OverviewArgs};
use crate::server;
use advisory_compliance::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Advisory Compliance Desk",
    about = "Run the compliance tracking service or generate desk reports from the command line",
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
    /// Print the compliance overview for a client roster
    Overview(OverviewArgs),
    /// Run an end-to-end CLI demo covering the wizards and the dashboard
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory store with a client roster CSV export
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Overview(args) => run_overview(args),
        Command::Demo(args) => run_demo(args),
    }
}
