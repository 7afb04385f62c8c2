//! Named report queries over the CRM schema.

mod catalog;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::presentation::{match_selection, SelectionError};
use crate::store::{QueryExecutor, ResultSet, SqlValue, StoreError};

/// Ordering applied to the deal listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealSort {
    #[default]
    HighestValue,
    MostRecent,
    Stage,
}

impl DealSort {
    pub const fn ordered() -> [Self; 3] {
        [Self::HighestValue, Self::MostRecent, Self::Stage]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HighestValue => "Highest Value (Money)",
            Self::MostRecent => "Most Recent (Date)",
            Self::Stage => "Deal Stage",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::HighestValue => "highest_value",
            Self::MostRecent => "most_recent",
            Self::Stage => "stage",
        }
    }

    const fn statement(self) -> &'static str {
        match self {
            Self::HighestValue => catalog::DEALS_BY_VALUE,
            Self::MostRecent => catalog::DEALS_BY_DATE,
            Self::Stage => catalog::DEALS_BY_STAGE,
        }
    }
}

impl fmt::Display for DealSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DealSort {
    type Err = SelectionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match_selection("sort", raw, &Self::ordered(), |sort| {
            [sort.slug(), sort.label()]
        })
    }
}

/// Catalog of every query the dashboard issues for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    TotalRevenue,
    RecentClosedDeals,
    AgentWorkload,
    NeglectedLeads,
    LeadDirectory,
    DealListing(DealSort),
    TopAgents { limit: u32 },
    LeadPipeline,
    CampaignOptions,
    AgentOptions,
}

impl ReportKind {
    pub const fn title(self) -> &'static str {
        match self {
            Self::TotalRevenue => "Total Revenue",
            Self::RecentClosedDeals => "Recent Closed Deals",
            Self::AgentWorkload => "Agent Workload",
            Self::NeglectedLeads => "Neglected Leads",
            Self::LeadDirectory => "Current Leads Directory",
            Self::DealListing(_) => "View Deals",
            Self::TopAgents { .. } => "Top Performing Agents",
            Self::LeadPipeline => "Lead Conversion Pipeline",
            Self::CampaignOptions => "Source Campaign",
            Self::AgentOptions => "Assign Agent",
        }
    }

    pub const fn sql(self) -> &'static str {
        match self {
            Self::TotalRevenue => catalog::TOTAL_REVENUE,
            Self::RecentClosedDeals => catalog::RECENT_CLOSED_DEALS,
            Self::AgentWorkload => catalog::AGENT_WORKLOAD,
            Self::NeglectedLeads => catalog::NEGLECTED_LEADS,
            Self::LeadDirectory => catalog::LEAD_DIRECTORY,
            Self::DealListing(sort) => sort.statement(),
            Self::TopAgents { .. } => catalog::TOP_AGENTS,
            Self::LeadPipeline => catalog::LEAD_PIPELINE,
            Self::CampaignOptions => catalog::CAMPAIGN_OPTIONS,
            Self::AgentOptions => catalog::AGENT_OPTIONS,
        }
    }

    pub fn params(self) -> Vec<SqlValue> {
        match self {
            Self::TopAgents { limit } => vec![SqlValue::from(limit)],
            _ => Vec::new(),
        }
    }

    pub fn run<E>(self, executor: &E) -> Result<ResultSet, StoreError>
    where
        E: QueryExecutor + ?Sized,
    {
        executor.fetch(self.sql(), &self.params())
    }
}

/// Sum of `Closed-Won` deal amounts; an empty sum reads as zero.
pub fn total_revenue<E>(executor: &E) -> Result<f64, StoreError>
where
    E: QueryExecutor + ?Sized,
{
    let result = ReportKind::TotalRevenue.run(executor)?;
    Ok(result
        .first_value("Total")
        .and_then(SqlValue::as_f64)
        .unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_accepts_slugs_and_labels() {
        assert_eq!("most_recent".parse::<DealSort>().ok(), Some(DealSort::MostRecent));
        assert_eq!(
            "Highest Value (Money)".parse::<DealSort>().ok(),
            Some(DealSort::HighestValue)
        );
        assert_eq!(" deal stage ".parse::<DealSort>().ok(), Some(DealSort::Stage));
        assert!("DealID; DROP TABLE Deals".parse::<DealSort>().is_err());
    }

    #[test]
    fn each_sort_maps_to_its_own_order_clause() {
        let expectations = [
            (DealSort::HighestValue, "ORDER BY D.TotalAmount DESC"),
            (DealSort::MostRecent, "ORDER BY D.DealDate DESC"),
            (DealSort::Stage, "ORDER BY D.Stage ASC"),
        ];
        for (sort, clause) in expectations {
            let sql = ReportKind::DealListing(sort).sql();
            assert!(sql.contains(clause), "{sort:?} should order with {clause}");
            assert!(sql.contains("FROM Deals D"));
        }
    }

    #[test]
    fn only_top_agents_binds_parameters() {
        assert_eq!(
            ReportKind::TopAgents { limit: 5 }.params(),
            vec![SqlValue::Integer(5)]
        );
        assert!(ReportKind::LeadDirectory.params().is_empty());
        assert!(ReportKind::DealListing(DealSort::Stage).params().is_empty());
    }
}
