mod common;

use common::{empty_store, seeded_store};
use crm_dashboard::presentation::{CellStyle, NoticeLevel, PipelineFilter};
use crm_dashboard::reports::DealSort;
use crm_dashboard::store::{QueryExecutor, ResultSet, SqlValue, SqliteStore, StoreError, WriteAck};
use crm_dashboard::views::{render_view, Block, View, ViewOptions};

#[test]
fn dashboard_shows_revenue_metric_and_recent_deals() {
    let store = seeded_store();
    let rendered = render_view(&store, View::Dashboard, &ViewOptions::default());
    assert_eq!(rendered.header, "Overview");

    let revenue = rendered.section("Revenue").expect("revenue section");
    let metric = revenue.metrics().next().expect("metric present");
    assert_eq!(metric.label, "Total Revenue");
    assert_eq!(metric.value, "$30,700.50");

    let deals = rendered
        .section("Recent Closed Deals")
        .expect("deals section");
    assert_eq!(deals.tables().next().expect("table present").len(), 3);
}

#[test]
fn dashboard_on_empty_store_reports_zero_revenue() {
    let store = empty_store();
    let rendered = render_view(&store, View::Dashboard, &ViewOptions::default());
    let metric = rendered
        .section("Revenue")
        .and_then(|section| section.metrics().next())
        .expect("metric present");
    assert_eq!(metric.value, "$0.00");
}

#[test]
fn automation_center_runs_audit_only_on_request() {
    let store = seeded_store();

    let idle = render_view(&store, View::AutomationCenter, &ViewOptions::default());
    let audit = idle.section("Identify Neglected Leads").expect("audit section");
    assert_eq!(audit.tables().count(), 0);
    assert_eq!(
        audit.notices().next().map(|notice| notice.level),
        Some(NoticeLevel::Info)
    );

    let options = ViewOptions {
        run_audit: true,
        ..ViewOptions::default()
    };
    let rendered = render_view(&store, View::AutomationCenter, &options);
    let audit = rendered
        .section("Identify Neglected Leads")
        .expect("audit section");
    let warning = audit.notices().next().expect("warning present");
    assert_eq!(warning.level, NoticeLevel::Warning);
    assert_eq!(warning.message, "Found 3 neglected leads!");
    assert_eq!(audit.tables().next().expect("audit table").len(), 3);

    let removal = rendered.section("Remove a Lead").expect("removal section");
    match &removal.blocks[0] {
        Block::Choices { options, .. } => {
            assert_eq!(options.len(), 5);
            assert_eq!(options[0].label, "1: Marie Curie");
        }
        other => panic!("expected delete choices, got {other:?}"),
    }
}

#[test]
fn automation_center_on_empty_store_reports_clean_audit_and_no_leads() {
    let store = empty_store();
    let options = ViewOptions {
        run_audit: true,
        ..ViewOptions::default()
    };
    let rendered = render_view(&store, View::AutomationCenter, &options);

    let audit = rendered
        .section("Identify Neglected Leads")
        .expect("audit section");
    assert_eq!(
        audit.notices().next().map(|notice| notice.level),
        Some(NoticeLevel::Success)
    );

    let directory = rendered
        .section("Current Leads Directory")
        .expect("directory section");
    assert_eq!(
        directory.notices().next().map(|notice| notice.message.as_str()),
        Some("No leads found in the database.")
    );
    assert!(rendered.section("Remove a Lead").is_none());
}

#[test]
fn analysis_highlights_maximum_only_for_value_sort() {
    let store = seeded_store();

    let rendered = render_view(&store, View::Analysis, &ViewOptions::default());
    let deals = rendered.section("View Deals").expect("deal section");
    assert_eq!(deals.caption.as_deref(), Some("Sorted by Highest Value (Money)"));
    let table = deals.tables().next().expect("deal table");
    let amount = table.column_index("TotalAmount").expect("amount column");
    assert_eq!(table.rows[0][amount].style, Some(CellStyle::Highlight));
    assert!(table.rows[1..]
        .iter()
        .all(|row| row[amount].style.is_none()));

    let options = ViewOptions {
        sort: DealSort::MostRecent,
        ..ViewOptions::default()
    };
    let rendered = render_view(&store, View::Analysis, &options);
    let table = rendered
        .section("View Deals")
        .and_then(|section| section.tables().next())
        .expect("deal table");
    assert!(table.rows.iter().flatten().all(|cell| cell.style.is_none()));

    let ranking = rendered
        .section("Top Performing Agents")
        .and_then(|section| section.tables().next())
        .expect("ranking table");
    assert_eq!(ranking.len(), 2);
}

#[test]
fn analysis_respects_top_agent_limit() {
    let store = seeded_store();
    let options = ViewOptions {
        top_agent_limit: 1,
        ..ViewOptions::default()
    };
    let rendered = render_view(&store, View::Analysis, &options);
    let ranking = rendered
        .section("Top Performing Agents")
        .and_then(|section| section.tables().next())
        .expect("ranking table");
    assert_eq!(ranking.len(), 1);
}

#[test]
fn pipeline_filters_rows_and_counts_statuses() {
    let store = seeded_store();

    let rendered = render_view(&store, View::PipelineView, &ViewOptions::default());
    let section = rendered.section("List of All").expect("pipeline section");
    let metrics: Vec<_> = section
        .metrics()
        .map(|metric| (metric.label.as_str(), metric.value.as_str()))
        .collect();
    assert_eq!(
        metrics,
        [("Total Leads", "3"), ("Converted Customers", "2")]
    );

    let options = ViewOptions {
        pipeline_filter: PipelineFilter::OnlyCustomers,
        ..ViewOptions::default()
    };
    let rendered = render_view(&store, View::PipelineView, &options);
    let section = rendered
        .section("List of Only Customers")
        .expect("pipeline section");
    let table = section.tables().next().expect("pipeline table");
    assert_eq!(table.len(), 2);
    assert!(table
        .values("Status")
        .iter()
        .all(|value| **value == SqlValue::from("Customer")));
    let status = table.column_index("Status").expect("status column");
    assert_eq!(
        table.rows[0][status].style,
        Some(CellStyle::Background { color: "#d4edda" })
    );
}

#[test]
fn add_lead_offers_campaign_and_agent_choices() {
    let store = seeded_store();
    let rendered = render_view(&store, View::AddLead, &ViewOptions::default());
    let form = rendered.section("Lead Form").expect("form section");
    let labels: Vec<_> = form
        .blocks
        .iter()
        .filter_map(|block| match block {
            Block::Choices { label, options } => Some((label.as_str(), options.len())),
            _ => None,
        })
        .collect();
    assert_eq!(labels, [("Source Campaign", 3), ("Assign Agent", 3)]);
    assert_eq!(form.notices().count(), 0);
}

struct FailingStore;

impl QueryExecutor for FailingStore {
    fn fetch(&self, sql: &str, _params: &[SqlValue]) -> Result<ResultSet, StoreError> {
        if sql.contains("Deals") {
            Err(StoreError::Query("no such table: Deals".to_string()))
        } else {
            Ok(ResultSet::new(vec!["Total".to_string()], Vec::new()))
        }
    }

    fn execute(&self, _sql: &str, _params: &[SqlValue]) -> Result<WriteAck, StoreError> {
        Err(StoreError::Query("read only".to_string()))
    }
}

#[test]
fn query_failure_stays_inside_its_section() {
    let rendered = render_view(&FailingStore, View::Analysis, &ViewOptions::default());
    assert_eq!(rendered.sections.len(), 2);
    for section in &rendered.sections {
        let notice = section.notices().next().expect("error notice");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("no such table: Deals"));
    }

    let rendered = render_view(&FailingStore, View::SalesAgents, &ViewOptions::default());
    let section = &rendered.sections[0];
    assert_eq!(section.notices().count(), 0);
    assert!(section.tables().next().expect("table rendered").is_empty());
}

#[test]
fn rendered_view_serializes_with_tagged_blocks() {
    let store = seeded_store();
    let rendered = render_view(&store, View::Dashboard, &ViewOptions::default());
    let json = serde_json::to_value(&rendered).expect("serializes");
    assert_eq!(json["view"], "dashboard");
    assert_eq!(json["sections"][0]["blocks"][0]["type"], "metric");
    assert_eq!(json["sections"][0]["blocks"][0]["value"], "$30,700.50");
    assert_eq!(json["sections"][1]["blocks"][0]["type"], "table");
}

#[test]
fn sales_agents_section_is_titled_by_its_report() {
    let store = seeded_store();
    let rendered = render_view(&store, View::SalesAgents, &ViewOptions::default());
    assert_eq!(rendered.header, "Sales Performance");
    let section = rendered.section("Agent Workload").expect("workload section");
    assert_eq!(section.tables().next().expect("workload table").len(), 3);
}

#[test]
fn missing_schema_fails_directory_without_losing_the_audit() {
    let store = SqliteStore::in_memory().expect("in-memory store opens");
    let options = ViewOptions {
        run_audit: true,
        ..ViewOptions::default()
    };
    let rendered = render_view(&store, View::AutomationCenter, &options);
    assert_eq!(rendered.sections.len(), 2);

    let directory = rendered
        .section("Current Leads Directory")
        .expect("directory section");
    assert_eq!(directory.blocks.len(), 1);
    let notice = directory.notices().next().expect("error notice");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("no such table"), "{}", notice.message);

    let audit = rendered
        .section("Identify Neglected Leads")
        .expect("audit section");
    assert_eq!(
        audit.notices().next().map(|notice| notice.level),
        Some(NoticeLevel::Error)
    );
}
