use crate::infra::view_options;
use crate::render::{print_view, OutputFormat};
use clap::Args;
use crm_dashboard::config::{AppConfig, DatabaseConfig};
use crm_dashboard::error::AppError;
use crm_dashboard::leads::{delete_lead, insert_lead, parse_lead_choice, LeadForm, LeadFormOptions};
use crm_dashboard::store::{bootstrap_schema, seed_demo_data, SqliteStore};
use crm_dashboard::views::{render_view, View, ViewOptions};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ViewArgs {
    /// View to render, by slug or menu label (e.g. `analysis`, "Pipeline View")
    pub(crate) view: String,
    /// Deal listing order for the analysis view (highest_value, most_recent, stage)
    #[arg(long)]
    pub(crate) sort: Option<String>,
    /// Pipeline filter (all, leads, customers)
    #[arg(long)]
    pub(crate) filter: Option<String>,
    /// Run the neglected-lead audit in the automation center
    #[arg(long)]
    pub(crate) audit: bool,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct LeadAddArgs {
    #[arg(long)]
    pub(crate) first_name: String,
    #[arg(long)]
    pub(crate) last_name: String,
    /// Source campaign, by name or id
    #[arg(long)]
    pub(crate) campaign: String,
    /// Assigned agent, by last name or id
    #[arg(long)]
    pub(crate) agent: String,
}

#[derive(Args, Debug)]
pub(crate) struct LeadDeleteArgs {
    /// Lead id, or a directory selection such as "4: Carl Sagan"
    pub(crate) selection: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct BootstrapArgs {
    /// Also insert the demo regions, agents, campaigns, leads, customers and deals
    #[arg(long)]
    pub(crate) demo_data: bool,
}

pub(crate) fn run_view(config: &AppConfig, args: ViewArgs) -> Result<(), AppError> {
    let view = args.view.parse::<View>()?;
    let options = view_options(
        ViewOptions::with_report_config(&config.reports),
        args.sort.as_deref(),
        args.filter.as_deref(),
        args.audit,
    )?;

    let store = SqliteStore::open(&config.database)?;
    let rendered = render_view(&store, view, &options);
    print_view(&rendered, args.format)
}

pub(crate) fn run_lead_add(config: &AppConfig, args: LeadAddArgs) -> Result<(), AppError> {
    let store = SqliteStore::open(&config.database)?;
    let form = LeadForm {
        first_name: args.first_name,
        last_name: args.last_name,
        campaign: args.campaign,
        agent: args.agent,
    };

    let lead = LeadFormOptions::load(&store)?.resolve(&form)?;
    let lead_id = insert_lead(&store, &lead)?;
    println!("Lead {} added! (id {lead_id})", lead.full_name());
    Ok(())
}

pub(crate) fn run_lead_delete(config: &AppConfig, args: LeadDeleteArgs) -> Result<(), AppError> {
    let lead_id = parse_lead_choice(&args.selection)?;
    let store = SqliteStore::open(&config.database)?;
    delete_lead(&store, lead_id)?;
    println!("Lead ID {lead_id} removed.");
    Ok(())
}

pub(crate) fn run_bootstrap(config: &AppConfig, args: BootstrapArgs) -> Result<(), AppError> {
    let database = DatabaseConfig {
        create_if_missing: true,
        ..config.database.clone()
    };
    let store = SqliteStore::open(&database)?;
    bootstrap_schema(&store)?;
    info!(path = %database.path.display(), "schema created");

    if args.demo_data {
        seed_demo_data(&store)?;
        info!(path = %database.path.display(), "demo data inserted");
    }

    println!(
        "CRM schema ready at {}{}",
        database.path.display(),
        if args.demo_data { " (with demo data)" } else { "" }
    );
    Ok(())
}
