use anyhow::{Context, Result};
use pctnum::{config::Config, pipeline};
use std::env;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(log_level.parse().unwrap_or(Level::INFO.into()))
    });
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure paths ──────────────────────────────────────────
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        "configured"
    );

    // ─── 3) normalize ────────────────────────────────────────────────
    let summary = pipeline::run(&config)?;
    info!(
        rows = summary.stats.rows,
        errors = summary.stats.errors(),
        "done"
    );
    Ok(())
}
