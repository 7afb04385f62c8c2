use clap::ValueEnum;
use crm_dashboard::error::AppError;
use crm_dashboard::presentation::{CellStyle, Table};
use crm_dashboard::views::{Block, RenderedView};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
    Csv,
}

pub(crate) fn print_view(rendered: &RenderedView, format: OutputFormat) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => write_text(rendered, &mut out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, rendered).map_err(io::Error::from)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(rendered, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

pub(crate) fn write_text<W: Write>(rendered: &RenderedView, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}: {}", rendered.title, rendered.header)?;
    writeln!(
        out,
        "Generated {}",
        rendered.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    for section in &rendered.sections {
        writeln!(out, "\n{}", section.heading)?;
        if let Some(caption) = &section.caption {
            writeln!(out, "{caption}")?;
        }
        for block in &section.blocks {
            match block {
                Block::Metric(metric) => writeln!(out, "- {}: {}", metric.label, metric.value)?,
                Block::Notice(notice) => writeln!(
                    out,
                    "[{}] {}",
                    notice.level.label().to_ascii_uppercase(),
                    notice.message
                )?,
                Block::Table(table) => write_table(table, out)?,
                Block::Choices { label, options } => {
                    writeln!(out, "{label}")?;
                    if options.is_empty() {
                        writeln!(out, "  (none)")?;
                    }
                    for choice in options {
                        writeln!(out, "  - {} [{}]", choice.label, choice.id)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Aligned plain-text table. Highlighted cells carry a trailing `*`.
fn write_table<W: Write>(table: &Table, out: &mut W) -> io::Result<()> {
    if table.is_empty() {
        return writeln!(out, "  (no rows)");
    }

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell.style {
                    Some(CellStyle::Highlight) => format!("{}*", cell.value),
                    _ => cell.value.to_string(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{column:<width$}"))
        .collect();
    writeln!(out, "  {}", header.join("  ").trim_end())?;

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    writeln!(out, "  {}", rule.join("  "))?;

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .collect();
        writeln!(out, "  {}", line.join("  ").trim_end())?;
    }
    Ok(())
}

/// Every table of the view in section order, separated by a blank line.
pub(crate) fn write_csv<W: Write>(rendered: &RenderedView, out: &mut W) -> io::Result<()> {
    let tables = rendered
        .sections
        .iter()
        .flat_map(|section| section.tables());
    for (index, table) in tables.enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        table.write_csv(&mut *out).map_err(io::Error::from)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_dashboard::store::{bootstrap_schema, seed_demo_data, SqliteStore};
    use crm_dashboard::views::{render_view, View, ViewOptions};

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::in_memory().expect("in-memory store opens");
        bootstrap_schema(&store).expect("schema applies");
        seed_demo_data(&store).expect("demo data loads");
        store
    }

    fn text_of(rendered: &RenderedView) -> String {
        let mut buffer = Vec::new();
        write_text(rendered, &mut buffer).expect("text renders");
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn dashboard_text_shows_metric_and_aligned_table() {
        let store = seeded_store();
        let rendered = render_view(&store, View::Dashboard, &ViewOptions::default());
        let text = text_of(&rendered);

        assert!(text.starts_with("Dashboard: Overview\n"));
        assert!(text.contains("- Total Revenue: $30,700.50"));
        assert!(text.contains("  DealDate    Customer         Agent   TotalAmount"));
        assert!(text.contains("  2024-08-30  Richard Feynman  Turing  9900.00"));
    }

    #[test]
    fn highlighted_maximum_is_marked() {
        let store = seeded_store();
        let rendered = render_view(&store, View::Analysis, &ViewOptions::default());
        let text = text_of(&rendered);
        assert!(text.contains("Sorted by Highest Value (Money)"));
        assert!(text.contains("15000.00*"));
        assert!(!text.contains("12500.00*"));
    }

    #[test]
    fn notices_are_labelled_by_level() {
        let store = seeded_store();
        let options = ViewOptions {
            run_audit: true,
            ..ViewOptions::default()
        };
        let rendered = render_view(&store, View::AutomationCenter, &options);
        let text = text_of(&rendered);
        assert!(text.contains("[WARNING] Found 3 neglected leads!"));
        assert!(text.contains("  - 4: Carl Sagan [4]"));
    }

    #[test]
    fn csv_lists_each_table_in_order() {
        let store = seeded_store();
        let rendered = render_view(&store, View::Analysis, &ViewOptions::default());
        let mut buffer = Vec::new();
        write_csv(&rendered, &mut buffer).expect("csv renders");
        let text = String::from_utf8(buffer).expect("utf8");

        let blocks: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("DealID,Customer,TotalAmount,DealDate,Stage\n3,Richard Feynman,15000.00"));
        assert!(blocks[1].starts_with("FirstName,LastName,RevenueGenerated\nAlan,Turing,18200.50"));
    }
}
