use log::LevelFilter;
use log4rs::Handle;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use crate::query::telemetry::{AUDIT_TARGET, METRICS_TARGET};

const ENCODER_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_RETENTION: u32 = 7;

static HANDLE: Mutex<Option<Handle>> = Mutex::new(None);

#[must_use]
pub fn parse_level(level: Option<&str>) -> LevelFilter {
    match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling(base: &Path, name: &str, keep: u32) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let pattern = format!("{}", base.join(format!("{name}.{{}}.log")).display());
    let roller = FixedWindowRoller::builder().build(&pattern, keep)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE_BYTES)), Box::new(roller));
    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENCODER_PATTERN)))
        .build(base.join(format!("{name}.log")), Box::new(policy))?;
    Ok(appender)
}

/// Configure logging globally for the process. Calling it again replaces the active config.
/// - dir: base directory for logs; if None, current directory.
/// - level: off|error|warn|info|debug|trace
/// - retention: number of rolled files to keep (default 7)
///
/// Writes `app.log`, plus `audit.log` and `metrics.log` for the audit and metrics targets.
///
/// # Errors
/// Returns an error if the directory cannot be created or an appender cannot be built.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let base = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&base)?;
    let keep = retention.map_or(DEFAULT_RETENTION, |r| u32::try_from(r.max(1)).unwrap_or(u32::MAX));
    let lvl = parse_level(level);

    let config = Config::builder()
        .appender(Appender::builder().build("app", Box::new(rolling(&base, "app", keep)?)))
        .appender(Appender::builder().build("audit", Box::new(rolling(&base, "audit", keep)?)))
        .appender(Appender::builder().build("metrics", Box::new(rolling(&base, "metrics", keep)?)))
        .logger(Logger::builder().appender("audit").additive(false).build(AUDIT_TARGET, lvl))
        .logger(Logger::builder().appender("metrics").additive(false).build(METRICS_TARGET, lvl))
        .build(Root::builder().appender("app").build(lvl))?;

    let mut handle = HANDLE.lock();
    match handle.as_ref() {
        Some(h) => h.set_config(config),
        None => *handle = Some(log4rs::init_config(config)?),
    }
    Ok(())
}

/// Rolled-file retention from `AREAQUERY_LOG_RETENTION`, if set and numeric.
#[must_use]
pub fn retention_from_env() -> Option<usize> {
    std::env::var("AREAQUERY_LOG_RETENTION").ok().and_then(|s| s.trim().parse::<usize>().ok())
}
