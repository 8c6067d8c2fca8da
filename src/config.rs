use crate::error::{CoreError, CoreResult};

/// Tier thresholds as percentages. `floor <= target`, both within [0, 100].
/// Construction is the only way in; invalid values are rejected, not clamped.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    floor: f64,
    target: f64,
}

impl Thresholds {
    pub fn new(floor: f64, target: f64) -> CoreResult<Thresholds> {
        if !(0.0..=100.0).contains(&floor) || !(0.0..=100.0).contains(&target) {
            return Err(CoreError::Configuration(format!(
                "thresholds must lie in [0, 100], got floor={floor} target={target}"
            )));
        }
        if floor > target {
            return Err(CoreError::Configuration(format!(
                "floor threshold {floor} exceeds target threshold {target}"
            )));
        }
        Ok(Thresholds { floor, target })
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

/// Page geometry and text-fitting constants for the layout engine.
///
/// One explicit configuration object; call sites must not carry their own
/// width or ratio constants. Fields are private so every instance has passed
/// the construction checks.
#[derive(Debug, Clone)]
pub struct PageGeometry {
    available_width: f64,
    min_column_width: f64,
    sample_size: usize,
    page_height: f64,
    page_break_threshold: f64,
    row_height: f64,
    header_height: f64,
    char_width_ratio: f64,
    ellipsis_reserve: usize,
}

impl PageGeometry {
    /// Rejects non-positive geometry and a break threshold at or past the
    /// page height; never clamps.
    pub fn new(
        available_width: f64,
        min_column_width: f64,
        sample_size: usize,
        page_height: f64,
        page_break_threshold: f64,
        row_height: f64,
        header_height: f64,
        char_width_ratio: f64,
        ellipsis_reserve: usize,
    ) -> CoreResult<PageGeometry> {
        for (name, value) in [
            ("available_width", available_width),
            ("min_column_width", min_column_width),
            ("page_height", page_height),
            ("page_break_threshold", page_break_threshold),
            ("row_height", row_height),
            ("header_height", header_height),
            ("char_width_ratio", char_width_ratio),
        ] {
            if !(value > 0.0) {
                return Err(CoreError::Configuration(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if page_break_threshold >= page_height {
            return Err(CoreError::Configuration(format!(
                "page_break_threshold {page_break_threshold} must be below page_height {page_height}"
            )));
        }
        Ok(PageGeometry {
            available_width,
            min_column_width,
            sample_size,
            page_height,
            page_break_threshold,
            row_height,
            header_height,
            char_width_ratio,
            ellipsis_reserve,
        })
    }

    /// A4 landscape with the margins and font sizes the reports were tuned for.
    pub fn a4_landscape() -> PageGeometry {
        PageGeometry {
            available_width: 275.0,
            min_column_width: 15.0,
            sample_size: 50,
            page_height: 210.0,
            page_break_threshold: 180.0,
            row_height: 8.0,
            header_height: 10.0,
            char_width_ratio: 2.0,
            ellipsis_reserve: 2,
        }
    }

    /// Usable content width of a page, in layout units (e.g. mm).
    pub fn available_width(&self) -> f64 {
        self.available_width
    }

    /// Floor applied to proportional column widths before normalization.
    pub fn min_column_width(&self) -> f64 {
        self.min_column_width
    }

    /// How many leading rows per column feed the width estimate.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Cursor position past which the current page is closed. Strictly less
    /// than `page_height`, leaving bottom margin for a footer.
    pub fn page_break_threshold(&self) -> f64 {
        self.page_break_threshold
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn header_height(&self) -> f64 {
        self.header_height
    }

    /// Approximate glyph width heuristic: layout units per character. Not
    /// derived from font metrics.
    pub fn char_width_ratio(&self) -> f64 {
        self.char_width_ratio
    }

    /// Characters reserved for the ellipsis marker when truncating.
    pub fn ellipsis_reserve(&self) -> usize {
        self.ellipsis_reserve
    }
}
