//! Navigation: one [`View`] per render pass, dispatched to its renderer.

mod pages;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ReportConfig;
use crate::presentation::{
    match_selection, Choice, Metric, Notice, PipelineFilter, SelectionError, Table,
};
use crate::reports::DealSort;
use crate::store::{QueryExecutor, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Dashboard,
    SalesAgents,
    AutomationCenter,
    Analysis,
    #[serde(rename = "pipeline")]
    PipelineView,
    AddLead,
}

type Renderer = fn(&dyn QueryExecutor, &ViewOptions) -> Vec<Section>;

impl View {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Dashboard,
            Self::SalesAgents,
            Self::AutomationCenter,
            Self::Analysis,
            Self::PipelineView,
            Self::AddLead,
        ]
    }

    /// Label shown in the navigation menu.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::SalesAgents => "Sales Agents",
            Self::AutomationCenter => "Automation Center",
            Self::Analysis => "Analysis",
            Self::PipelineView => "Pipeline View",
            Self::AddLead => "Add New Lead",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::SalesAgents => "sales-agents",
            Self::AutomationCenter => "automation-center",
            Self::Analysis => "analysis",
            Self::PipelineView => "pipeline",
            Self::AddLead => "add-lead",
        }
    }

    /// Page header rendered above the view's sections.
    pub const fn header(self) -> &'static str {
        match self {
            Self::Dashboard => "Overview",
            Self::SalesAgents => "Sales Performance",
            Self::AutomationCenter => "CRM Automation",
            Self::Analysis => "Sales Analysis & Sorting",
            Self::PipelineView => "Lead Conversion Pipeline",
            Self::AddLead => "Add New Lead",
        }
    }

    fn renderer(self) -> Renderer {
        match self {
            Self::Dashboard => pages::dashboard,
            Self::SalesAgents => pages::sales_agents,
            Self::AutomationCenter => pages::automation_center,
            Self::Analysis => pages::analysis,
            Self::PipelineView => pages::pipeline,
            Self::AddLead => pages::add_lead,
        }
    }

    pub fn menu() -> Vec<MenuEntry> {
        Self::ordered()
            .into_iter()
            .map(|view| MenuEntry {
                view,
                title: view.title(),
            })
            .collect()
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for View {
    type Err = SelectionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match_selection("view", raw, &Self::ordered(), |view| {
            [view.slug(), view.title()]
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuEntry {
    pub view: View,
    pub title: &'static str,
}

/// Selections that parameterize a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub sort: DealSort,
    pub pipeline_filter: PipelineFilter,
    pub run_audit: bool,
    pub top_agent_limit: u32,
}

impl ViewOptions {
    pub fn with_report_config(config: &ReportConfig) -> Self {
        Self {
            top_agent_limit: config.top_agent_limit,
            ..Self::default()
        }
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            sort: DealSort::default(),
            pipeline_filter: PipelineFilter::default(),
            run_audit: false,
            top_agent_limit: ReportConfig::default().top_agent_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Metric(Metric),
    Table(Table),
    Notice(Notice),
    Choices { label: String, options: Vec<Choice> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(heading: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            heading: heading.into(),
            caption: None,
            blocks,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Builds a section whose query failure becomes an inline error notice
    /// instead of aborting the whole view.
    pub(crate) fn query<F>(heading: impl Into<String>, build: F) -> Self
    where
        F: FnOnce() -> Result<Vec<Block>, StoreError>,
    {
        let heading = heading.into();
        match build() {
            Ok(blocks) => Self::new(heading, blocks),
            Err(err) => Self::failed(heading, &err),
        }
    }

    /// Section holding only the error notice for a failed query.
    pub fn failed(heading: impl Into<String>, err: &StoreError) -> Self {
        let heading = heading.into();
        warn!(section = %heading, error = %err, "section query failed");
        Self::new(heading, vec![Block::Notice(Notice::error(err.to_string()))])
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Notice(notice) => Some(notice),
            _ => None,
        })
    }

    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Metric(metric) => Some(metric),
            _ => None,
        })
    }
}

/// Output of a single render pass.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedView {
    pub view: View,
    pub title: &'static str,
    pub header: &'static str,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

impl RenderedView {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.heading == heading)
    }
}

/// Renders `view` against the current store state.
pub fn render_view(
    executor: &dyn QueryExecutor,
    view: View,
    options: &ViewOptions,
) -> RenderedView {
    let sections = (view.renderer())(executor, options);
    RenderedView {
        view,
        title: view.title(),
        header: view.header(),
        generated_at: Utc::now(),
        sections,
    }
}
