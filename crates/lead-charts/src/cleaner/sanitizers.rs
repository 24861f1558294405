//! Value-level sanitizers for lead text fields.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sources excluded from the working dataset.
pub const BLOCKED_SOURCES: [&str; 3] = ["HYPERFLOW", "META - Whatsapp", "TALLOS"];

/// Pipeline names the CRM appends to stage labels.
static STAGE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" \(Pipeline de (?:Vendas|Disparos?)\)").expect("stage suffix pattern is valid")
});

const TAX_ID_ARTIFACT: &str = ".0";

/// Remove pipeline suffixes and upper-case a stage label.
///
/// Removal repeats until no suffix is left, so a suffix that only appears
/// after an inner one is removed cannot survive.
pub(crate) fn clean_stage(stage: &str) -> String {
    let mut cleaned = stage.to_string();
    while STAGE_SUFFIX.is_match(&cleaned) {
        cleaned = STAGE_SUFFIX.replace_all(&cleaned, "").into_owned();
    }
    cleaned.to_uppercase()
}

/// Strip the trailing ".0" left behind when a tax id went through a float.
pub(crate) fn clean_tax_id(tax_id: &str) -> String {
    let mut cleaned = tax_id;
    while let Some(stripped) = cleaned.strip_suffix(TAX_ID_ARTIFACT) {
        cleaned = stripped;
    }
    cleaned.to_string()
}

/// Exact, case-sensitive blocklist match.
pub(crate) fn is_blocked_source(source: &str) -> bool {
    BLOCKED_SOURCES.contains(&source)
}
