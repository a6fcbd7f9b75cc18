use anyhow::{bail, Result};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::precinct::{try_derive_pctnum, CountyCodes, PctnumError, ERROR_SENTINEL};
use crate::table::{Table, COUNTY_COLUMN, PCTNUM_COLUMN, PRECINCT_COLUMN};

/// Per-run tally of how rows were resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub rows: usize,
    pub valid: usize,
    pub unparsable_precinct_code: usize,
    pub unknown_county: usize,
}

impl NormalizeStats {
    pub fn errors(&self) -> usize {
        self.unparsable_precinct_code + self.unknown_county
    }

    fn record_error(&mut self, err: &PctnumError) {
        match err {
            PctnumError::UnparsablePrecinctCode(_) => self.unparsable_precinct_code += 1,
            PctnumError::UnknownCounty(_) => self.unknown_county += 1,
        }
    }
}

/// Attach a `pctnum` value to every row, in order.
///
/// An existing `pctnum` column is overwritten in place; otherwise one is
/// appended. Rows shorter than the header are padded with empty fields first.
/// Rows that cannot be normalized get [`ERROR_SENTINEL`] and never abort the
/// batch. Only a missing `countyname`/`precinctcode` column, or a row longer
/// than the header, is an error.
#[instrument(level = "info", skip_all, fields(rows = table.rows.len()))]
pub fn normalize_table(
    mut table: Table,
    county_codes: &CountyCodes,
) -> Result<(Table, NormalizeStats)> {
    let county_idx = table.require_column(COUNTY_COLUMN)?;
    let precinct_idx = table.require_column(PRECINCT_COLUMN)?;

    let width = table.headers.len();
    let pctnum_idx = match table.column_index(PCTNUM_COLUMN) {
        Some(idx) => idx,
        None => {
            table.headers.push(PCTNUM_COLUMN.to_string());
            width
        }
    };

    let mut stats = NormalizeStats {
        rows: table.rows.len(),
        ..Default::default()
    };

    for (row_idx, row) in table.rows.iter_mut().enumerate() {
        if row.len() > width {
            bail!(
                "Failed to normalize row {}: {} fields but the header has {}",
                row_idx,
                row.len(),
                width
            );
        }
        row.resize(width, String::new());

        let value = match try_derive_pctnum(&row[county_idx], &row[precinct_idx], county_codes) {
            Ok(pctnum) => {
                stats.valid += 1;
                pctnum
            }
            Err(err) => {
                debug!(row = row_idx, error = %err, "marking row as {}", ERROR_SENTINEL);
                stats.record_error(&err);
                ERROR_SENTINEL.to_string()
            }
        };

        if pctnum_idx == width {
            row.push(value);
        } else {
            row[pctnum_idx] = value;
        }
    }

    info!(
        valid = stats.valid,
        unparsable_precinct_code = stats.unparsable_precinct_code,
        unknown_county = stats.unknown_county,
        "normalized table"
    );
    Ok((table, stats))
}
