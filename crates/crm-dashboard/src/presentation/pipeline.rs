use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{match_selection, Cell, CellStyle, SelectionError, Table};
use crate::store::{ResultSet, SqlValue};

/// Whether a lead has converted into a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Lead,
    Customer,
}

impl PipelineStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Customer => "Customer",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Customer => "#d4edda",
            Self::Lead => "#fff3cd",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Lead" => Some(Self::Lead),
            "Customer" => Some(Self::Customer),
            _ => None,
        }
    }
}

/// Row filter offered by the pipeline view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineFilter {
    #[default]
    All,
    OnlyLeads,
    OnlyCustomers,
}

impl PipelineFilter {
    pub const fn ordered() -> [Self; 3] {
        [Self::All, Self::OnlyLeads, Self::OnlyCustomers]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::OnlyLeads => "Only Leads",
            Self::OnlyCustomers => "Only Customers",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::OnlyLeads => "leads",
            Self::OnlyCustomers => "customers",
        }
    }

    pub fn accepts(self, status: PipelineStatus) -> bool {
        match self {
            Self::All => true,
            Self::OnlyLeads => status == PipelineStatus::Lead,
            Self::OnlyCustomers => status == PipelineStatus::Customer,
        }
    }

    /// Keeps the rows whose `Status` cell passes the filter.
    pub fn apply(self, table: Table) -> Table {
        let Some(index) = table.column_index("Status") else {
            return table;
        };
        table.retain_rows(|row| {
            status_of(&row[index].value).is_some_and(|status| self.accepts(status))
        })
    }
}

impl fmt::Display for PipelineFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PipelineFilter {
    type Err = SelectionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match_selection("filter", raw, &Self::ordered(), |filter| {
            [filter.slug(), filter.label()]
        })
    }
}

fn status_of(value: &SqlValue) -> Option<PipelineStatus> {
    value.as_str().and_then(PipelineStatus::from_label)
}

/// Replaces the pipeline's `CustomerID` column with a coloured `Status`
/// column derived from whether a linked customer exists.
pub fn classify_pipeline(set: ResultSet) -> Table {
    let Some(index) = set.column_index("CustomerID") else {
        return Table::from_result_set(set);
    };

    let mut table = Table::from_result_set(set);
    table.columns[index] = "Status".to_string();
    for row in &mut table.rows {
        let status = if row[index].value.is_null() {
            PipelineStatus::Lead
        } else {
            PipelineStatus::Customer
        };
        row[index] = Cell {
            value: SqlValue::from(status.label()),
            style: Some(CellStyle::Background {
                color: status.color(),
            }),
        };
    }
    table
}

/// Number of rows in a classified table carrying `status`.
pub fn count_status(table: &Table, status: PipelineStatus) -> usize {
    table
        .values("Status")
        .into_iter()
        .filter(|value| status_of(value) == Some(status))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> ResultSet {
        ResultSet::new(
            vec![
                "Name".to_string(),
                "Source".to_string(),
                "CustomerID".to_string(),
            ],
            vec![
                vec![
                    SqlValue::from("Marie Curie"),
                    SqlValue::from("Spring Webinar"),
                    SqlValue::Integer(1),
                ],
                vec![
                    SqlValue::from("Carl Sagan"),
                    SqlValue::from("Referral Program"),
                    SqlValue::Null,
                ],
            ],
        )
    }

    #[test]
    fn derives_status_column_with_colors() {
        let table = classify_pipeline(pipeline());
        assert_eq!(table.columns, ["Name", "Source", "Status"]);
        assert_eq!(table.rows[0][2].value, SqlValue::from("Customer"));
        assert_eq!(
            table.rows[0][2].style,
            Some(CellStyle::Background { color: "#d4edda" })
        );
        assert_eq!(table.rows[1][2].value, SqlValue::from("Lead"));
        assert_eq!(
            table.rows[1][2].style,
            Some(CellStyle::Background { color: "#fff3cd" })
        );
    }

    #[test]
    fn filters_keep_matching_statuses() {
        let table = classify_pipeline(pipeline());
        assert_eq!(PipelineFilter::All.apply(table.clone()).len(), 2);

        let leads = PipelineFilter::OnlyLeads.apply(table.clone());
        assert_eq!(count_status(&leads, PipelineStatus::Lead), 1);
        assert_eq!(count_status(&leads, PipelineStatus::Customer), 0);

        let customers = PipelineFilter::OnlyCustomers.apply(table);
        assert_eq!(customers.len(), 1);
        assert_eq!(customers.rows[0][0].value, SqlValue::from("Marie Curie"));
    }

    #[test]
    fn parses_filter_labels() {
        assert_eq!(
            "Only Customers".parse::<PipelineFilter>().ok(),
            Some(PipelineFilter::OnlyCustomers)
        );
        assert_eq!(
            "leads".parse::<PipelineFilter>().ok(),
            Some(PipelineFilter::OnlyLeads)
        );
        assert!("prospects".parse::<PipelineFilter>().is_err());
    }
}
