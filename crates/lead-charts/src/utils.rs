//! Shared helpers for reading lead exports.

use crate::error::{Result, ResultExt};
use polars::prelude::*;

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Currency markers stripped before parsing an amount.
pub const CURRENCY_MARKERS: [&str; 2] = ["R$", "$"];

/// Markers some CRM exports write instead of leaving a numeric cell empty.
pub const MISSING_MARKERS: [&str; 5] = ["nan", "null", "none", "n/a", "-"];

/// Check if a cell is empty or holds a missing-value marker.
pub fn is_missing_marker(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// Parse a monetary cell into a finite `f64`.
///
/// Leading currency markers and surrounding whitespace are ignored. Anything
/// that still fails to parse, or parses to NaN or infinity, is `None`.
///
/// ```rust,ignore
/// use lead_charts::utils::parse_amount;
///
/// assert_eq!(parse_amount(" R$ 1500.50 "), Some(1500.5));
/// assert_eq!(parse_amount("abc"), None);
/// ```
pub fn parse_amount(s: &str) -> Option<f64> {
    if is_missing_marker(s) {
        return None;
    }

    let mut cleaned = s.trim();
    for marker in CURRENCY_MARKERS {
        if let Some(rest) = cleaned.strip_prefix(marker) {
            cleaned = rest.trim_start();
            break;
        }
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// DataFrame Utilities
// =============================================================================

/// Read a column by position as optional strings, casting non-string dtypes.
pub fn column_as_strings(df: &DataFrame, index: usize) -> Result<Vec<Option<String>>> {
    let column = &df.get_columns()[index];
    let series = column.as_materialized_series();
    let casted = series
        .cast(&DataType::String)
        .context(format!("Casting column '{}' to text", series.name()))?;
    let values = casted
        .str()
        .context(format!("Reading column '{}' as text", series.name()))?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}
