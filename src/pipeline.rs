use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::precinct::COUNTY_CODES;
use crate::table::{load_csv, normalize_table, write_csv, NormalizeStats};

/// Number of rows echoed to the log after a run.
const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    #[serde(flatten)]
    pub stats: NormalizeStats,
    pub elapsed_seconds: f64,
}

/// Load the input CSV, attach `pctnum` to every row, write the output CSV.
///
/// Per-row failures end up as `ERROR` in the output; only I/O and
/// missing-column problems abort the run.
#[instrument(level = "info", skip(config), fields(input = %config.input_path.display()))]
pub fn run(config: &Config) -> Result<RunSummary> {
    let start = Instant::now();

    let table = load_csv(&config.input_path)?;
    let (table, stats) = normalize_table(table, &COUNTY_CODES)?;
    write_csv(&table, &config.output_path)?;

    info!(columns = ?table.headers, "preview");
    for row in table.head(PREVIEW_ROWS) {
        info!(row = ?row, "preview");
    }

    if stats.errors() > 0 {
        warn!(
            errors = stats.errors(),
            rows = stats.rows,
            "some rows could not be normalized and were marked ERROR"
        );
    }

    let summary = RunSummary {
        input_path: config.input_path.clone(),
        output_path: config.output_path.clone(),
        stats,
        elapsed_seconds: start.elapsed().as_secs_f64(),
    };
    info!(
        summary = %serde_json::to_string(&summary)?,
        "wrote {}",
        config.output_path.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::init_test_logging;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_run_end_to_end() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input_path = dir.path().join("door_attempts.csv");
        fs::write(
            &input_path,
            "countyname,precinctcode,attempts
MARICOPA,7.0,3
Wyoming,3,1
PINAL,,0
COCONINO,123,9
",
        )?;
        let config = Config {
            input_path,
            output_path: dir.path().join("out").join("modified_precincts.csv"),
        };

        let summary = run(&config)?;
        assert_eq!(summary.stats.rows, 4);
        assert_eq!(summary.stats.valid, 2);
        assert_eq!(summary.stats.unknown_county, 1);
        assert_eq!(summary.stats.unparsable_precinct_code, 1);

        let written = fs::read_to_string(&config.output_path)?;
        assert_eq!(
            written,
            "countyname,precinctcode,attempts,pctnum
MARICOPA,7.0,3,MC0007
Wyoming,3,1,ERROR
PINAL,,0,ERROR
COCONINO,123,9,CN0123
"
        );

        let json = serde_json::to_value(&summary)?;
        assert_eq!(json["valid"], 2);
        assert_eq!(json["unknown_county"], 1);
        Ok(())
    }

    #[test]
    fn test_rerun_on_own_output_is_stable() -> Result<()> {
        let dir = tempdir()?;
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        let input_path = dir.path().join("in.csv");
        fs::write(&input_path, "countyname,precinctcode\nAPACHE,1\nAPACHE,z\n")?;

        run(&Config {
            input_path,
            output_path: first.clone(),
        })?;
        run(&Config {
            input_path: first.clone(),
            output_path: second.clone(),
        })?;
        assert_eq!(fs::read_to_string(&first)?, fs::read_to_string(&second)?);
        Ok(())
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempdir().unwrap();
        let config = Config {
            input_path: dir.path().join("absent.csv"),
            output_path: dir.path().join("out.csv"),
        };
        assert!(run(&config).is_err());
        assert!(!config.output_path.exists());
    }
}
