//! Region search backend: turns a drawn polygon and a free-text intent into one
//! spatial geodata query, executes it, and optionally enriches the results.
//!
//! The pipeline is [`geometry`] → [`query`] (parse, route, compile) → [`service`].
//! Outbound HTTP lives behind the traits in [`collab`].

pub mod cli;
pub mod collab;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod logger;
pub mod query;
pub mod sample;
pub mod service;
pub mod summary;
pub mod types;

pub use errors::AreaQueryError;
pub use service::{FilterSource, SearchOutcome, SearchService};

/// Loads configuration and sets up logging.
///
/// File logging starts only when a `log_dir` is configured (file or
/// `AREAQUERY_LOG_DIR`). A logging setup failure is reported on stderr and
/// the program carries on without file logs.
#[must_use]
pub fn init(cli_cfg: Option<&std::path::Path>) -> config::AppConfig {
    let cfg = config::load_config(cli_cfg);
    if let Err(e) = init_logging(&cfg) {
        eprintln!("areaquery: file logging disabled: {e}");
    }
    cfg
}

/// Returns whether file logging was configured.
fn init_logging(cfg: &config::AppConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let Some(dir) = cfg.log_dir.as_deref() else {
        return Ok(false);
    };
    logger::configure_logging(Some(dir), cfg.log_level.as_deref(), logger::retention_from_env())?;
    Ok(true)
}
