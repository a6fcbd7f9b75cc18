use anyhow::{bail, Result};
use std::path::PathBuf;

pub const INPUT_ENV: &str = "PCTNUM_INPUT";
pub const OUTPUT_ENV: &str = "PCTNUM_OUTPUT";

const USAGE: &str = "usage: pctnum <input.csv> <output.csv> (or set PCTNUM_INPUT / PCTNUM_OUTPUT)";

/// Where to read the precinct table from and where to write the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Config {
    /// Positional arguments win over environment variables.
    pub fn from_sources<I, F>(args: I, env: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();
        let input = args.next();
        let output = args.next();
        if args.next().is_some() {
            bail!("Failed to read arguments: too many given; {}", USAGE);
        }

        let pick = |arg: Option<String>, var: &str| -> Result<PathBuf> {
            match arg.or_else(|| env(var)).filter(|s| !s.trim().is_empty()) {
                Some(p) => Ok(PathBuf::from(p)),
                None => bail!("Failed to find a path for {}; {}", var, USAGE),
            }
        };

        Ok(Config {
            input_path: pick(input, INPUT_ENV)?,
            output_path: pick(output, OUTPUT_ENV)?,
        })
    }

    /// Reads the process arguments (after the program name) and environment.
    pub fn from_env() -> Result<Self> {
        Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok())
    }
}
