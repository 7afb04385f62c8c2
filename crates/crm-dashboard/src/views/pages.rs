use super::{Block, Section, ViewOptions};
use crate::leads::{delete_choices, LeadFormOptions};
use crate::presentation::{classify_pipeline, count_status, Metric, Notice, PipelineStatus, Table};
use crate::reports::{total_revenue, DealSort, ReportKind};
use crate::store::QueryExecutor;

pub(super) fn dashboard(executor: &dyn QueryExecutor, _options: &ViewOptions) -> Vec<Section> {
    vec![
        Section::query("Revenue", || {
            let revenue = total_revenue(executor)?;
            Ok(vec![Block::Metric(Metric::currency("Total Revenue", revenue))])
        }),
        Section::query(ReportKind::RecentClosedDeals.title(), || {
            let deals = ReportKind::RecentClosedDeals.run(executor)?;
            Ok(vec![Block::Table(Table::from_result_set(deals))])
        }),
    ]
}

pub(super) fn sales_agents(executor: &dyn QueryExecutor, _options: &ViewOptions) -> Vec<Section> {
    vec![Section::query(ReportKind::AgentWorkload.title(), || {
        let workload = ReportKind::AgentWorkload.run(executor)?;
        Ok(vec![Block::Table(Table::from_result_set(workload))])
    })]
}

pub(super) fn automation_center(
    executor: &dyn QueryExecutor,
    options: &ViewOptions,
) -> Vec<Section> {
    let audit = Section::query("Identify Neglected Leads", || {
        if !options.run_audit {
            return Ok(vec![Block::Notice(Notice::info(
                "Find leads who haven't been converted to customers yet. Run the audit to list them.",
            ))]);
        }

        let neglected = ReportKind::NeglectedLeads.run(executor)?;
        if neglected.is_empty() {
            return Ok(vec![Block::Notice(Notice::success(
                "All leads are being processed correctly.",
            ))]);
        }

        Ok(vec![
            Block::Notice(Notice::warning(format!(
                "Found {} neglected leads!",
                neglected.len()
            ))),
            Block::Table(Table::from_result_set(neglected)),
        ])
    });

    let mut sections = vec![audit];
    let directory = match ReportKind::LeadDirectory.run(executor) {
        Ok(directory) => directory,
        Err(err) => {
            sections.push(Section::failed(ReportKind::LeadDirectory.title(), &err));
            return sections;
        }
    };

    if directory.is_empty() {
        sections.push(Section::new(
            ReportKind::LeadDirectory.title(),
            vec![Block::Notice(Notice::info("No leads found in the database."))],
        ));
        return sections;
    }

    let choices = delete_choices(&directory);
    sections.push(Section::new(
        ReportKind::LeadDirectory.title(),
        vec![Block::Table(Table::from_result_set(directory))],
    ));
    sections.push(Section::new(
        "Remove a Lead",
        vec![Block::Choices {
            label: "Select lead to remove:".to_string(),
            options: choices,
        }],
    ));
    sections
}

pub(super) fn analysis(executor: &dyn QueryExecutor, options: &ViewOptions) -> Vec<Section> {
    let sort = options.sort;
    let deals = Section::query(ReportKind::DealListing(sort).title(), || {
        let listing = ReportKind::DealListing(sort).run(executor)?;
        let table = Table::from_result_set(listing);
        let table = match sort {
            DealSort::HighestValue => table.highlight_max("TotalAmount"),
            DealSort::MostRecent | DealSort::Stage => table,
        };
        Ok(vec![Block::Table(table)])
    })
    .with_caption(format!("Sorted by {}", sort.label()));

    let report = ReportKind::TopAgents {
        limit: options.top_agent_limit,
    };
    let ranking = Section::query(report.title(), || {
        let ranking = report.run(executor)?;
        Ok(vec![Block::Table(Table::from_result_set(ranking))])
    });

    vec![deals, ranking]
}

pub(super) fn pipeline(executor: &dyn QueryExecutor, options: &ViewOptions) -> Vec<Section> {
    let filter = options.pipeline_filter;
    vec![Section::query(format!("List of {}", filter.label()), || {
        let pipeline = ReportKind::LeadPipeline.run(executor)?;
        let table = filter.apply(classify_pipeline(pipeline));
        let leads = count_status(&table, PipelineStatus::Lead);
        let customers = count_status(&table, PipelineStatus::Customer);
        Ok(vec![
            Block::Table(table),
            Block::Metric(Metric::count("Total Leads", leads)),
            Block::Metric(Metric::count("Converted Customers", customers)),
        ])
    })]
}

pub(super) fn add_lead(executor: &dyn QueryExecutor, _options: &ViewOptions) -> Vec<Section> {
    vec![Section::query("Lead Form", || {
        let LeadFormOptions { campaigns, agents } = LeadFormOptions::load(executor)?;
        let mut blocks = Vec::new();
        if campaigns.is_empty() || agents.is_empty() {
            blocks.push(Block::Notice(Notice::warning(
                "Add at least one marketing campaign and one sales agent before recording leads.",
            )));
        }
        blocks.push(Block::Choices {
            label: ReportKind::CampaignOptions.title().to_string(),
            options: campaigns,
        });
        blocks.push(Block::Choices {
            label: ReportKind::AgentOptions.title().to_string(),
            options: agents,
        });
        Ok(blocks)
    })]
}
