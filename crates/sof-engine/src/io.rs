// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Samples & Limits Tables
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! CSV loaders for the samples and limits tables.
//!
//! Headers are matched case-insensitively against a synonym list per
//! column; the first synonym present wins.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use sof_types::error::{SofError, SofResult};
use sof_types::models::{LimitRow, SampleRow};
use tracing::info;

type Synonyms = (&'static str, &'static [&'static str]);

const SAMPLE_COLUMNS: [Synonyms; 6] = [
    ("nuclide", &["nuclide", "isotope", "radionuclide", "id"]),
    ("value", &["value", "concentration", "activity_conc", "result"]),
    ("unit", &["unit", "units"]),
    ("sigma", &["sigma", "std", "u", "uncertainty"]),
    ("note", &["note", "comments"]),
    ("batch_id", &["batch_id", "sample", "sample_id"]),
];
const SAMPLE_REQUIRED: [&str; 3] = ["nuclide", "value", "unit"];

const LIMIT_COLUMNS: [Synonyms; 8] = [
    ("nuclide", &["nuclide", "isotope", "radionuclide", "id"]),
    ("limit_value", &["limit_value", "limit", "value"]),
    ("limit_unit", &["limit_unit", "unit", "units"]),
    ("category", &["category", "class"]),
    ("rule_name", &["rule_name", "rule", "regulation"]),
    ("note", &["note", "comments"]),
    ("rule_rev", &["rule_rev", "rev", "revision", "date"]),
    ("provenance", &["provenance", "source"]),
];
const LIMIT_REQUIRED: [&str; 3] = ["nuclide", "limit_value", "limit_unit"];

/// Standard column name → position in the file.
struct ColumnMap {
    table: &'static str,
    positions: HashMap<&'static str, usize>,
}

impl ColumnMap {
    fn resolve(
        table: &'static str,
        headers: &csv::StringRecord,
        columns: &[Synonyms],
        required: &[&str],
    ) -> SofResult<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();

        let mut positions = HashMap::new();
        for (standard, synonyms) in columns {
            let found = synonyms
                .iter()
                .find_map(|syn| names.iter().position(|n| n == syn));
            if let Some(pos) = found {
                positions.insert(*standard, pos);
            }
        }
        for column in required {
            if !positions.contains_key(column) {
                return Err(SofError::Schema {
                    table: table.to_string(),
                    column: column.to_string(),
                });
            }
        }
        Ok(ColumnMap { table, positions })
    }

    fn text<'r>(&self, record: &'r csv::StringRecord, column: &str) -> Option<&'r str> {
        let pos = *self.positions.get(column)?;
        record.get(pos).map(str::trim).filter(|s| !s.is_empty())
    }

    fn owned(&self, record: &csv::StringRecord, column: &str) -> Option<String> {
        self.text(record, column).map(str::to_string)
    }

    fn number(&self, record: &csv::StringRecord, column: &str, row: usize) -> SofResult<Option<f64>> {
        let Some(text) = self.text(record, column) else {
            return Ok(None);
        };
        text.parse::<f64>().map(Some).map_err(|_| SofError::InvalidValue {
            what: format!("{} row {row} column '{column}'", self.table),
            value: text.to_string(),
        })
    }

    fn required_number(&self, record: &csv::StringRecord, column: &str, row: usize) -> SofResult<f64> {
        self.number(record, column, row)?
            .ok_or_else(|| SofError::InvalidValue {
                what: format!("{} row {row} column '{column}'", self.table),
                value: "(blank)".to_string(),
            })
    }
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source)
}

/// Read sample rows. Rows are numbered from 1, excluding the header.
pub fn read_samples<R: Read>(source: R) -> SofResult<Vec<SampleRow>> {
    let mut rdr = reader(source);
    let columns = ColumnMap::resolve("samples", rdr.headers()?, &SAMPLE_COLUMNS, &SAMPLE_REQUIRED)?;

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row = i + 1;
        rows.push(SampleRow {
            nuclide: columns.owned(&record, "nuclide").unwrap_or_default(),
            value: columns.required_number(&record, "value", row)?,
            unit: columns.owned(&record, "unit").unwrap_or_default(),
            sigma: columns.number(&record, "sigma", row)?,
            note: columns.owned(&record, "note"),
            batch_id: columns.owned(&record, "batch_id"),
        });
    }
    Ok(rows)
}

/// Read limit rows. Rows are numbered from 1, excluding the header.
pub fn read_limits<R: Read>(source: R) -> SofResult<Vec<LimitRow>> {
    let mut rdr = reader(source);
    let columns = ColumnMap::resolve("limits", rdr.headers()?, &LIMIT_COLUMNS, &LIMIT_REQUIRED)?;

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row = i + 1;
        rows.push(LimitRow {
            nuclide: columns.owned(&record, "nuclide").unwrap_or_default(),
            limit_value: columns.required_number(&record, "limit_value", row)?,
            limit_unit: columns.owned(&record, "limit_unit").unwrap_or_default(),
            category: columns.owned(&record, "category"),
            rule_name: columns.owned(&record, "rule_name"),
            note: columns.owned(&record, "note"),
            rule_rev: columns.owned(&record, "rule_rev"),
            provenance: columns.owned(&record, "provenance"),
        });
    }
    Ok(rows)
}

pub fn load_samples(path: impl AsRef<Path>) -> SofResult<Vec<SampleRow>> {
    let path = path.as_ref();
    let rows = read_samples(std::fs::File::open(path)?)?;
    info!(path = %path.display(), rows = rows.len(), "loaded samples");
    Ok(rows)
}

pub fn load_limits(path: impl AsRef<Path>) -> SofResult<Vec<LimitRow>> {
    let path = path.as_ref();
    let rows = read_limits(std::fs::File::open(path)?)?;
    info!(path = %path.display(), rows = rows.len(), "loaded limits");
    Ok(rows)
}
