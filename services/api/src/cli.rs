use crate::demo::{print_sections, run_demo, DemoArgs, SectionsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use onboarding_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Onboarding Intake",
    about = "Serve and demonstrate buyer and seller onboarding intake",
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
    /// Print the section blueprint and prerequisite graph for a flow
    Sections(SectionsArgs),
    /// Walk a demo buyer and seller through intake in memory
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
    /// Register the demo tenants at startup regardless of configuration
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Sections(args) => {
            print_sections(args);
            Ok(())
        }
        Command::Demo(args) => run_demo(args),
    }
}
