//! Positional schema mapping for CRM lead exports.
//!
//! The export's header names are not trusted: the twelve columns are bound to
//! [`LEAD_COLUMNS`] purely by position. A record or table with any other
//! column count is rejected with [`LeadChartsError::SchemaMismatch`] and no
//! partial table is produced.
//!
//! Cell text is kept exactly as exported. Only the two amount columns are
//! trimmed, as part of number parsing.

use crate::error::{LeadChartsError, Result, ResultExt};
use crate::types::{LEAD_COLUMN_COUNT, LEAD_COLUMNS, LeadRecord};
use crate::utils::{column_as_strings, parse_amount};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Binds raw positional values to [`LeadRecord`] fields.
pub struct SchemaMapper;

impl SchemaMapper {
    /// Map one raw record.
    ///
    /// `row` is only used for error reporting.
    pub fn map_record<S: AsRef<str>>(row: usize, fields: &[S]) -> Result<LeadRecord> {
        if fields.len() != LEAD_COLUMN_COUNT {
            return Err(LeadChartsError::SchemaMismatch {
                row: Some(row),
                expected: LEAD_COLUMN_COUNT,
                found: fields.len(),
            });
        }

        let text = |i: usize| fields[i].as_ref().to_string();

        Ok(LeadRecord {
            id: text(0),
            customer: text(1),
            stage: text(2),
            source: text(3),
            plan: text(4),
            commission_total: parse_amount(fields[5].as_ref()),
            paid_value: parse_amount(fields[6].as_ref()),
            campaign_type: text(7),
            campaign_tag: text(8),
            phone: text(9),
            tax_id: text(10),
            owner: text(11),
            commission_band: None,
        })
    }

    /// Map a sequence of raw records, enforcing id uniqueness.
    ///
    /// Ingestion is all-or-nothing: the first malformed record aborts it.
    /// An empty id is an ordinary key, so a second row with an empty id is a
    /// [`LeadChartsError::DuplicateLeadId`].
    pub fn map_records<R, S>(records: impl IntoIterator<Item = R>) -> Result<Vec<LeadRecord>>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut leads = Vec::new();
        let mut seen_ids = HashSet::new();

        for (row, record) in records.into_iter().enumerate() {
            let lead = Self::map_record(row, record.as_ref())?;
            if !seen_ids.insert(lead.id.clone()) {
                return Err(LeadChartsError::DuplicateLeadId { id: lead.id, row });
            }
            leads.push(lead);
        }

        debug!("Mapped {} raw records", leads.len());
        Ok(leads)
    }

    /// Map every row of a DataFrame, binding columns by position.
    pub fn from_dataframe(df: &DataFrame) -> Result<Vec<LeadRecord>> {
        if df.width() != LEAD_COLUMN_COUNT {
            return Err(LeadChartsError::SchemaMismatch {
                row: None,
                expected: LEAD_COLUMN_COUNT,
                found: df.width(),
            });
        }

        let columns = (0..LEAD_COLUMN_COUNT)
            .map(|i| column_as_strings(df, i))
            .collect::<Result<Vec<_>>>()?;

        for (name, field) in df.get_column_names().iter().zip(LEAD_COLUMNS) {
            debug!("Binding column '{}' to '{}'", name, field);
        }

        let records = (0..df.height()).map(|row| {
            columns
                .iter()
                .map(|col| col[row].clone().unwrap_or_default())
                .collect::<Vec<String>>()
        });

        Self::map_records(records)
    }

    /// Read a lead export from disk.
    ///
    /// Every column is read as text so ids, phones and tax ids keep the exact
    /// characters of the export. Each record's field count is checked before
    /// the reader runs, since the reader pads short rows with nulls.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        info!("Loading lead export from: {}", path.display());

        let content = fs::read_to_string(path).context(format!("Opening {}", path.display()))?;
        check_record_widths(&content)?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .context(format!("Opening {}", path.display()))?
            .finish()
            .context(format!("Reading {}", path.display()))?;

        info!("Lead export loaded: {:?}", df.shape());
        Ok(df)
    }

    /// Read and map a lead export in one step.
    pub fn load_leads(path: impl AsRef<Path>) -> Result<Vec<LeadRecord>> {
        let df = Self::read_csv(path)?;
        Self::from_dataframe(&df).context("Mapping lead export columns")
    }
}

/// Check that the header and every data record of a CSV export carry exactly
/// [`LEAD_COLUMN_COUNT`] fields.
///
/// Commas and line breaks inside double quotes belong to the field. Blank lines
/// are skipped, as the CSV reader does. A bad header reports `row: None`, a bad
/// data record its zero-based data row index.
pub fn check_record_widths(content: &str) -> Result<()> {
    let mut header_seen = false;
    let mut data_row = 0;

    for record in split_records(content) {
        if record.trim().is_empty() {
            continue;
        }
        let found = count_fields(record);
        let row = if header_seen { Some(data_row) } else { None };
        if found != LEAD_COLUMN_COUNT {
            return Err(LeadChartsError::SchemaMismatch {
                row,
                expected: LEAD_COLUMN_COUNT,
                found,
            });
        }
        if header_seen {
            data_row += 1;
        }
        header_seen = true;
    }

    debug!("Checked width of {} data records", data_row);
    Ok(())
}

/// Split on line breaks that are outside quoted fields.
fn split_records(content: &str) -> impl Iterator<Item = &str> {
    let mut in_quotes = false;
    content
        .split(move |c: char| {
            if c == '"' {
                in_quotes = !in_quotes;
            }
            c == '\n' && !in_quotes
        })
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

fn count_fields(record: &str) -> usize {
    let mut in_quotes = false;
    let mut fields = 1;
    for c in record.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields += 1,
            _ => {}
        }
    }
    fields
}
