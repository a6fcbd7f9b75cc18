use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};
use tracing::{debug, instrument};

pub mod normalize;

pub use normalize::{normalize_table, NormalizeStats};

/// Free-text county name column.
pub const COUNTY_COLUMN: &str = "countyname";
/// Numeric (as text) precinct code column.
pub const PRECINCT_COLUMN: &str = "precinctcode";
/// Derived column appended by [`normalize_table`].
pub const PCTNUM_COLUMN: &str = "pctnum";

/// A whole CSV file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column names, from the header row.
    pub headers: Vec<String>,
    /// Each record, one String per field, in file order.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Position of `name` in the header row, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .with_context(|| format!("Failed to find required column {:?} in input", name))
    }

    /// The first `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Parses a header row plus records. Records may be shorter than the
    /// header; longer records are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .context("Failed to read CSV header row")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result.with_context(|| format!("Failed to parse CSV record {}", idx))?;
            if record.len() > headers.len() {
                bail!(
                    "Failed to parse CSV record {}: {} fields but the header has {}",
                    idx,
                    record.len(),
                    headers.len()
                );
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        let table = Table { headers, rows };
        table.require_column(COUNTY_COLUMN)?;
        table.require_column(PRECINCT_COLUMN)?;
        Ok(table)
    }

    /// Writes the header and every row; no index column.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);
        wtr.write_record(&self.headers)
            .context("Failed to write CSV header row")?;
        for (idx, row) in self.rows.iter().enumerate() {
            wtr.write_record(row)
                .with_context(|| format!("Failed to write CSV record {}", idx))?;
        }
        wtr.flush().context("Failed to flush CSV output")?;
        Ok(())
    }
}

/// Load the CSV at `path` into memory.
#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open input CSV: {:?}", path.as_ref()))?;
    let table = Table::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse input CSV: {:?}", path.as_ref()))?;
    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "loaded table"
    );
    Ok(table)
}

/// Write `table` to `path`, creating parent directories as needed.
#[instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display()))]
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create output CSV: {:?}", path))?;
    table
        .to_writer(BufWriter::new(file))
        .with_context(|| format!("Failed to write output CSV: {:?}", path))?;
    debug!(rows = table.rows.len(), "wrote table");
    Ok(())
}
