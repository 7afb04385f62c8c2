use crate::commands::{
    run_bootstrap, run_lead_add, run_lead_delete, run_view, BootstrapArgs, LeadAddArgs,
    LeadDeleteArgs, ViewArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use crm_dashboard::config::AppConfig;
use crm_dashboard::error::AppError;
use crm_dashboard::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "CRM Dashboard",
    about = "Serve, inspect and maintain the CRM reporting dashboard",
    version
)]
struct Cli {
    /// SQLite database file (overrides CRM_DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Render one dashboard view to the terminal
    View(ViewArgs),
    /// Add or remove leads
    Lead {
        #[command(subcommand)]
        command: LeadCommand,
    },
    /// Create the CRM schema, optionally with demo rows
    Bootstrap(BootstrapArgs),
}

#[derive(Subcommand, Debug)]
enum LeadCommand {
    /// Record a new lead against a campaign and an agent
    Add(LeadAddArgs),
    /// Delete a lead by id or by its "id: name" selection
    Delete(LeadDeleteArgs),
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
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.database {
        config.database.path = path;
    }

    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::View(args) => run_view(&config, args),
        Command::Lead {
            command: LeadCommand::Add(args),
        } => run_lead_add(&config, args),
        Command::Lead {
            command: LeadCommand::Delete(args),
        } => run_lead_delete(&config, args),
        Command::Bootstrap(args) => run_bootstrap(&config, args),
    }
}
