//! Display structures built from fetched result sets, plus the mapping of UI
//! selections back into typed parameters. Nothing in here touches the store.

mod format;
mod pipeline;

use std::io;

use serde::Serialize;

use crate::store::{ResultSet, SqlValue};

pub use format::format_currency;
pub use pipeline::{classify_pipeline, count_status, PipelineFilter, PipelineStatus};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellStyle {
    Highlight,
    Background { color: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub value: SqlValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

impl Cell {
    pub fn plain(value: SqlValue) -> Self {
        Self { value, style: None }
    }
}

/// Tabular display of a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn from_result_set(set: ResultSet) -> Self {
        let rows = set
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::plain).collect())
            .collect();
        Self {
            columns: set.columns,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// Cells of `column` in row order; empty when the column is absent.
    pub fn values<'a>(&'a self, column: &str) -> Vec<&'a SqlValue> {
        match self.column_index(column) {
            Some(index) => self.rows.iter().map(|row| &row[index].value).collect(),
            None => Vec::new(),
        }
    }

    /// Highlights every numeric cell of `column` equal to the column maximum.
    pub fn highlight_max(mut self, column: &str) -> Self {
        let Some(index) = self.column_index(column) else {
            return self;
        };

        let max = self
            .rows
            .iter()
            .filter_map(|row| row[index].value.as_f64())
            .fold(None, |acc: Option<f64>, value| match acc {
                Some(current) if current >= value => Some(current),
                _ => Some(value),
            });

        if let Some(max) = max {
            for row in &mut self.rows {
                if row[index].value.as_f64() == Some(max) {
                    row[index].style = Some(CellStyle::Highlight);
                }
            }
        }
        self
    }

    pub fn retain_rows<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| keep(row.as_slice()));
        self
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.value.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn currency(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            value: format_currency(amount),
        }
    }

    pub fn count(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            value: count.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Banner shown above or instead of a section's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Selectable option backed by a row id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: i64,
    pub label: String,
}

impl Choice {
    /// Builds choices from an id column and a label column. Rows with a
    /// non-integer id are skipped.
    pub fn from_result_set(set: &ResultSet, id_column: &str, label_column: &str) -> Vec<Self> {
        let (Some(id_index), Some(label_index)) =
            (set.column_index(id_column), set.column_index(label_column))
        else {
            return Vec::new();
        };

        set.rows
            .iter()
            .filter_map(|row| {
                let id = row[id_index].as_i64()?;
                Some(Self {
                    id,
                    label: row[label_index].to_string(),
                })
            })
            .collect()
    }

    /// Resolves a selection by exact label first, then by numeric id. A label
    /// shared by several choices is rejected so that only an id can pick one.
    pub fn resolve<'a>(
        kind: &'static str,
        choices: &'a [Self],
        selection: &str,
    ) -> Result<&'a Self, SelectionError> {
        let selection = selection.trim();
        let labelled: Vec<&Self> = choices
            .iter()
            .filter(|choice| choice.label == selection)
            .collect();
        match labelled.as_slice() {
            [choice] => return Ok(choice),
            [] => {}
            shared => {
                return Err(SelectionError::Ambiguous {
                    kind,
                    value: selection.to_string(),
                    ids: join_ids(shared),
                })
            }
        }

        selection
            .parse::<i64>()
            .ok()
            .and_then(|id| choices.iter().find(|choice| choice.id == id))
            .ok_or_else(|| SelectionError::Unknown {
                kind,
                value: selection.to_string(),
                expected: choices
                    .iter()
                    .map(|choice| choice.label.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

fn join_ids(choices: &[&Choice]) -> String {
    choices
        .iter()
        .map(|choice| choice.id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A UI selection that does not name any known option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("unknown {kind} '{value}'; expected one of: {expected}")]
    Unknown {
        kind: &'static str,
        value: String,
        expected: String,
    },
    #[error("{kind} '{value}' is ambiguous; select one of ids {ids}")]
    Ambiguous {
        kind: &'static str,
        value: String,
        ids: String,
    },
    #[error("malformed {kind} selection '{value}'")]
    Malformed { kind: &'static str, value: String },
}

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Matches `raw` against the keys of a closed option set, ignoring case,
/// whitespace and punctuation.
pub fn match_selection<T, F, const N: usize>(
    kind: &'static str,
    raw: &str,
    options: &[T],
    keys: F,
) -> Result<T, SelectionError>
where
    T: Copy,
    F: Fn(T) -> [&'static str; N],
{
    let wanted = normalize(raw);
    if !wanted.is_empty() {
        for option in options {
            if keys(*option).iter().any(|key| normalize(key) == wanted) {
                return Ok(*option);
            }
        }
    }

    let expected = options
        .iter()
        .filter_map(|option| keys(*option).first().copied())
        .collect::<Vec<_>>()
        .join(", ");
    Err(SelectionError::Unknown {
        kind,
        value: raw.to_string(),
        expected,
    })
}
