use std::fmt::Write;

use crate::config::{PageGeometry, Thresholds};
use crate::error::CoreResult;
use crate::layout::{self, Page, Table};
use crate::models::{FacilitySummary, Tier, UnitSummary};

/// Unit-level coverage rows ready for layout.
pub fn unit_summary_table(
    summaries: &[UnitSummary],
    thresholds: &Thresholds,
) -> CoreResult<Table> {
    let columns = ["District", "Facility", "Unit", "Target", "Completed", "Coverage %", "Status"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    let rows = summaries
        .iter()
        .map(|s| {
            vec![
                s.district.clone(),
                s.facility.clone(),
                s.unit.clone(),
                s.target.to_string(),
                s.completed.to_string(),
                format!("{:.2}", s.ratio),
                Tier::classify(s.ratio, thresholds).label().to_string(),
            ]
        })
        .collect();
    Table::new(columns, rows)
}

/// At-risk facility rows (already filtered and sorted by the caller).
pub fn at_risk_table(facilities: &[FacilitySummary]) -> CoreResult<Table> {
    let columns = ["District", "Facility", "Red Units", "Yellow Units", "Green Units", "Total Units"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    let rows = facilities
        .iter()
        .map(|f| {
            vec![
                f.district.clone(),
                f.facility.clone(),
                f.red.to_string(),
                f.yellow.to_string(),
                f.green.to_string(),
                f.total_units.to_string(),
            ]
        })
        .collect();
    Table::new(columns, rows)
}

/// Lays a table out and renders every page as a fixed-width text grid.
/// Stands in for the document renderer; real glyph drawing happens elsewhere.
pub fn render_document(title: &str, table: &Table, geometry: &PageGeometry) -> String {
    let widths = layout::compute_column_widths(table, geometry);
    let pages = layout::paginate(table, &widths, geometry);
    render_pages(title, &pages, geometry)
}

pub fn render_pages(title: &str, pages: &[Page], geometry: &PageGeometry) -> String {
    let mut output = String::new();
    let total = pages.len();

    for (number, page) in pages.iter().enumerate() {
        let _ = writeln!(output, "{title}");
        for row in &page.rows {
            let mut line = String::from("|");
            for cell in &row.cells {
                let chars = (cell.width / geometry.char_width_ratio()).floor() as usize;
                let _ = write!(line, "{:<width$}|", cell.text, width = chars.max(1));
            }
            let _ = writeln!(output, "{line}");
            if row.header {
                let _ = writeln!(output, "{}", "-".repeat(line.chars().count()));
            }
        }
        let _ = writeln!(output, "Page {}/{}", number + 1, total);
        if number + 1 < total {
            let _ = writeln!(output, "{}", "=".repeat(40));
        }
    }

    output
}
