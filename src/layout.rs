use crate::config::PageGeometry;
use crate::error::{CoreError, CoreResult};

/// Accented letters in the source data mapped to their closest ASCII forms.
/// A fixed table for one alphabet, not a general Unicode normalizer.
const TRANSLITERATIONS: [(char, char); 12] = [
    ('ğ', 'g'),
    ('Ğ', 'G'),
    ('ş', 's'),
    ('Ş', 'S'),
    ('ı', 'i'),
    ('İ', 'I'),
    ('ü', 'u'),
    ('Ü', 'U'),
    ('ö', 'o'),
    ('Ö', 'O'),
    ('ç', 'c'),
    ('Ç', 'C'),
];

/// Tier-marker glyphs the print surface cannot draw; dropped outright.
const STRIPPED_GLYPHS: [char; 6] = ['🔴', '🟡', '🟢', '⚠', '✅', '❌'];

/// An ordered, rectangular table of text cells.
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Rejects ragged rows instead of guessing column alignment.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> CoreResult<Table> {
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(CoreError::InputShape {
                    row: index,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Table { columns, rows })
    }
}

/// One positioned, sized, truncated cell ready for a renderer.
#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    pub width: f64,
}

#[derive(Debug, Clone)]
pub struct PageRow {
    pub cells: Vec<Cell>,
    pub header: bool,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub rows: Vec<PageRow>,
}

/// Allocates column widths proportionally to observed content length.
///
/// Only the first `sample_size` rows feed the estimate; columns whose long
/// values appear later under-allocate. That trade-off is accepted. Flooring
/// narrow columns at `min_column_width` can overshoot the page, in which case
/// a single normalization pass scales everything back down without
/// re-enforcing the floor.
pub fn compute_column_widths(table: &Table, geometry: &PageGeometry) -> Vec<f64> {
    if table.columns.is_empty() {
        return Vec::new();
    }

    let mut max_lens: Vec<usize> = table
        .columns
        .iter()
        .map(|c| c.chars().count())
        .collect();
    for row in table.rows.iter().take(geometry.sample_size()) {
        for (i, value) in row.iter().enumerate() {
            let len = value.chars().count();
            if len > max_lens[i] {
                max_lens[i] = len;
            }
        }
    }

    let total_len: usize = max_lens.iter().sum();
    if total_len == 0 {
        let even = geometry.available_width() / table.columns.len() as f64;
        return vec![even; table.columns.len()];
    }

    let mut widths: Vec<f64> = max_lens
        .iter()
        .map(|&len| {
            let proportional = len as f64 / total_len as f64 * geometry.available_width();
            proportional.max(geometry.min_column_width())
        })
        .collect();

    let total_width: f64 = widths.iter().sum();
    if total_width > geometry.available_width() {
        let factor = geometry.available_width() / total_width;
        for width in widths.iter_mut() {
            *width *= factor;
        }
    }

    widths
}

/// Splits the table into pages, re-emitting the header row at the top of
/// every page. Forward-only single pass: rows are never split or re-balanced.
pub fn paginate(table: &Table, widths: &[f64], geometry: &PageGeometry) -> Vec<Page> {
    let header_row = || PageRow {
        cells: table
            .columns
            .iter()
            .zip(widths.iter())
            .map(|(name, &width)| Cell {
                text: format_cell(name, width, geometry),
                width,
            })
            .collect(),
        header: true,
    };

    let mut pages = Vec::new();
    let mut current = Page {
        rows: vec![header_row()],
    };
    let mut cursor = geometry.header_height();

    for row in &table.rows {
        if cursor > geometry.page_break_threshold() {
            pages.push(current);
            current = Page {
                rows: vec![header_row()],
            };
            cursor = geometry.header_height();
        }
        current.rows.push(PageRow {
            cells: row
                .iter()
                .zip(widths.iter())
                .map(|(value, &width)| Cell {
                    text: format_cell(value, width, geometry),
                    width,
                })
                .collect(),
            header: false,
        });
        cursor += geometry.row_height();
    }

    pages.push(current);
    pages
}

/// Transliterates, strips undrawable glyphs, and truncates to the character
/// budget `floor(column_width / char_width_ratio)`. The ellipsis marker is
/// one `.` per reserved character, so truncated output always fills the
/// budget exactly. The budget is an approximate glyph-width heuristic, not a
/// font metric.
pub fn format_cell(value: &str, column_width: f64, geometry: &PageGeometry) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| !STRIPPED_GLYPHS.contains(c))
        .map(|c| {
            if let Some(&(_, ascii)) = TRANSLITERATIONS.iter().find(|&&(tr, _)| tr == c) {
                ascii
            } else if c as u32 > 0xFF {
                '?'
            } else {
                c
            }
        })
        .collect();

    let max_chars = (column_width / geometry.char_width_ratio()).floor() as usize;
    if cleaned.chars().count() > max_chars {
        let keep = max_chars.saturating_sub(geometry.ellipsis_reserve());
        let mut truncated: String = cleaned.chars().take(keep).collect();
        truncated.push_str(&".".repeat(geometry.ellipsis_reserve()));
        truncated
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> PageGeometry {
        PageGeometry::a4_landscape()
    }

    fn narrow_page(available_width: f64, min_column_width: f64) -> PageGeometry {
        PageGeometry::new(available_width, min_column_width, 50, 210.0, 180.0, 8.0, 10.0, 2.0, 2)
            .unwrap()
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1".to_string()]],
        );
        assert!(matches!(
            result,
            Err(CoreError::InputShape {
                row: 0,
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn widths_follow_header_length_proportions() {
        let geo = narrow_page(100.0, 15.0);
        let t = table(&["abc", "abcdefghij", "abc"], &[]);
        let widths = compute_column_widths(&t, &geo);
        assert!((widths[0] - 18.75).abs() < 1e-9);
        assert!((widths[1] - 62.5).abs() < 1e-9);
        assert!((widths[2] - 18.75).abs() < 1e-9);
        assert!((widths.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn flooring_then_normalizing_lands_exactly_on_available_width() {
        let geo = narrow_page(80.0, 20.0);
        let t = table(&["a", "abcdefghi"], &[]);
        let widths = compute_column_widths(&t, &geo);
        // Proportional share of the first column (8.0) gets floored to 20,
        // overshooting the page; normalization pulls it back below the floor.
        assert!(widths[0] < 20.0);
        assert!((widths.iter().sum::<f64>() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn width_sum_never_exceeds_available_width() {
        let t = table(
            &["d", "facility with a long name", "u", "x"],
            &[&["Merkez", "Toplum Sagligi Merkezi", "Birim-12", "ok"]],
        );
        let widths = compute_column_widths(&t, &geometry());
        assert!(widths.iter().sum::<f64>() <= geometry().available_width() + 1e-9);
    }

    #[test]
    fn rows_beyond_the_sample_do_not_affect_widths() {
        let geo = PageGeometry::new(275.0, 15.0, 2, 210.0, 180.0, 8.0, 10.0, 2.0, 2).unwrap();
        let short = table(&["h"], &[&["aa"], &["aa"]]);
        let with_late_outlier = table(
            &["h"],
            &[&["aa"], &["aa"], &["a very long outlier value past the sample"]],
        );
        assert_eq!(
            compute_column_widths(&short, &geo),
            compute_column_widths(&with_late_outlier, &geo)
        );
    }

    #[test]
    fn empty_table_gets_even_widths() {
        let t = table(&["", ""], &[]);
        let widths = compute_column_widths(&t, &geometry());
        assert_eq!(widths.len(), 2);
        assert!((widths[0] - geometry().available_width() / 2.0).abs() < 1e-9);
    }

    #[test]
    fn single_empty_column_takes_full_width() {
        let t = table(&[""], &[]);
        let widths = compute_column_widths(&t, &geometry());
        assert_eq!(widths, vec![geometry().available_width()]);
    }

    #[test]
    fn zero_columns_yield_no_widths_and_one_page() {
        let t = Table::new(Vec::new(), Vec::new()).unwrap();
        assert!(compute_column_widths(&t, &geometry()).is_empty());
        let pages = paginate(&t, &[], &geometry());
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn pagination_repeats_header_and_breaks_predictably() {
        let geo = PageGeometry::new(275.0, 15.0, 50, 210.0, 175.0, 8.0, 10.0, 2.0, 2).unwrap();

        let rows: Vec<Vec<String>> = (0..120).map(|i| vec![format!("row {i}")]).collect();
        let t = Table::new(vec!["col".to_string()], rows).unwrap();
        let widths = compute_column_widths(&t, &geo);
        let pages = paginate(&t, &widths, &geo);

        // 21 data rows fit before the cursor passes 175; 120 rows = 6 pages.
        assert_eq!(pages.len(), 6);
        for page in &pages[..5] {
            assert_eq!(page.rows.len(), 22);
        }
        assert_eq!(pages[5].rows.len(), 16);
        for page in &pages {
            assert!(page.rows[0].header);
            assert!(page.rows[1..].iter().all(|r| !r.header));
        }
    }

    #[test]
    fn pagination_is_lossless_and_order_preserving() {
        let rows: Vec<Vec<String>> = (0..57).map(|i| vec![i.to_string()]).collect();
        let t = Table::new(vec!["n".to_string()], rows.clone()).unwrap();
        let widths = compute_column_widths(&t, &geometry());
        let pages = paginate(&t, &widths, &geometry());

        let replayed: Vec<String> = pages
            .iter()
            .flat_map(|p| p.rows.iter())
            .filter(|r| !r.header)
            .map(|r| r.cells[0].text.clone())
            .collect();
        let original: Vec<String> = rows.into_iter().map(|mut r| r.remove(0)).collect();
        assert_eq!(replayed, original);
    }

    #[test]
    fn empty_row_set_still_emits_one_page_with_header() {
        let t = table(&["a", "b"], &[]);
        let widths = compute_column_widths(&t, &geometry());
        let pages = paginate(&t, &widths, &geometry());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].rows.len(), 1);
        assert!(pages[0].rows[0].header);
    }

    #[test]
    fn transliterates_accented_letters() {
        let geo = geometry();
        assert_eq!(
            format_cell("Çiğli Sağlık Ocağı", 275.0, &geo),
            "Cigli Saglik Ocagi"
        );
        assert_eq!(format_cell("ŞÜKRÜ ÖZ İÇ", 275.0, &geo), "SUKRU OZ IC");
    }

    #[test]
    fn strips_marker_glyphs_and_replaces_foreign_chars() {
        let geo = geometry();
        assert_eq!(format_cell("🔴 kritik", 275.0, &geo), " kritik");
        assert_eq!(format_cell("✅ tamam ❌", 275.0, &geo), " tamam ");
        assert_eq!(format_cell("€100 – ok", 275.0, &geo), "?100 ? ok");
    }

    #[test]
    fn truncates_with_ellipsis_at_the_character_budget() {
        let geo = geometry();
        // width 20 / ratio 2.0 = 10 chars max; 8 kept + "..".
        assert_eq!(format_cell("abcdefghijkl", 20.0, &geo), "abcdefgh..");
        assert_eq!(format_cell("abcdefghij", 20.0, &geo), "abcdefghij");
    }

    #[test]
    fn ellipsis_marker_length_follows_the_reserve() {
        let geo = PageGeometry::new(275.0, 15.0, 50, 210.0, 180.0, 8.0, 10.0, 2.0, 3).unwrap();
        // width 20 / ratio 2.0 = 10 chars max; 7 kept + "...".
        let out = format_cell("abcdefghijkl", 20.0, &geo);
        assert_eq!(out, "abcdefg...");
        assert_eq!(out.chars().count(), 10);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let geo = geometry();
        let text = "ığüşöç ığüşöç"; // 13 chars, many multi-byte
        let out = format_cell(text, 20.0, &geo);
        assert_eq!(out, "igusoc i..");
        assert_eq!(out.chars().count(), 10);
    }
}
