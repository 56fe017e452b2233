use crate::errors::AreaQueryError;
use crate::geometry::{extract_rings, first_ring};
use crate::query::{FilterTag, compile_query, parse_filter_list_detailed, poly_string, telemetry};
use crate::sample;
use crate::service::SearchService;
use serde::Serialize;
use serde_json::{Value, json};
use std::io::Write;

use super::command::Command;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputMode {
    Human,
    Plain,
    Json,
}

#[must_use]
pub fn parse_output_mode(s: Option<&str>) -> OutputMode {
    match s.map(str::to_ascii_lowercase).as_deref() {
        Some("json") => OutputMode::Json,
        Some("plain" | "text") => OutputMode::Plain,
        _ => OutputMode::Human,
    }
}

fn parse_json(label: &str, raw: &str) -> Result<Value, AreaQueryError> {
    serde_json::from_str(raw).map_err(|e| AreaQueryError::InvalidGeometry(format!("{label} is not JSON: {e}")))
}

fn emit_json<T: Serialize>(out: &mut dyn Write, mode: OutputMode, v: &T) -> Result<(), Box<dyn std::error::Error>> {
    let text = if mode == OutputMode::Json { serde_json::to_string(v)? } else { serde_json::to_string_pretty(v)? };
    writeln!(out, "{text}")?;
    Ok(())
}

/// Runs `cmd` against `svc`, writing the result to `out`.
///
/// # Errors
/// Client errors (bad JSON, bad geometry, bad filters) and write failures.
pub fn run_with_format(
    svc: &SearchService,
    cmd: Command,
    mode: OutputMode,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Command::Extract { payload_json } => {
            let rings = extract_rings(&parse_json("geometry", &payload_json)?);
            match mode {
                OutputMode::Plain => {
                    for ring in &rings {
                        writeln!(out, "{}", poly_string(ring))?;
                    }
                }
                _ => emit_json(out, mode, &rings)?,
            }
            Ok(())
        }
        Command::Compile { payload_json, filters, timeout_secs } => {
            let cfg = svc.config();
            let ring = first_ring(&parse_json("geometry", &payload_json)?)
                .ok_or_else(|| AreaQueryError::InvalidGeometry("no polygon with usable points in payload".into()))?;
            let tags = filters
                .iter()
                .map(|f| FilterTag::parse(f, &cfg.category_key))
                .collect::<Result<Vec<_>, _>>()?;
            let query = compile_query(&ring, &tags, timeout_secs.unwrap_or(cfg.timeout_secs))?;
            match mode {
                OutputMode::Json => emit_json(out, mode, &query)?,
                _ => writeln!(out, "{query}")?,
            }
            Ok(())
        }
        Command::ParseFilters { raw } => {
            let parsed = parse_filter_list_detailed(raw.as_str());
            match mode {
                OutputMode::Plain => {
                    for tag in &parsed.tags {
                        writeln!(out, "{tag}")?;
                    }
                }
                _ => emit_json(out, mode, &parsed)?,
            }
            Ok(())
        }
        Command::Search { payload_json, prompt, classifier_output, fallback, summarize_top, reviews } => {
            let classified = match (classifier_output, prompt) {
                (Some(text), _) => Some(text),
                (None, Some(p)) => svc.classify_intent(&p),
                (None, None) => None,
            };
            let outcome = match payload_json {
                Some(raw) => svc.search(&parse_json("geometry", &raw)?, classified.as_deref(), fallback.as_deref())?,
                None => svc.search_sample(classified.as_deref(), fallback.as_deref())?,
            };
            let summaries = match summarize_top {
                Some(n) if !outcome.elements.is_empty() => match svc.summarize_places(&outcome.elements, n, reviews) {
                    Ok(s) => Some(s),
                    Err(e) => {
                        log::warn!("skipping place summaries: {e}");
                        None
                    }
                },
                _ => None,
            };
            match mode {
                OutputMode::Plain => {
                    if let Some(reason) = &outcome.degraded {
                        writeln!(out, "degraded: {reason}")?;
                    }
                    writeln!(out, "elements={} kind={:?}", outcome.elements.len(), outcome.query.kind())?;
                    for el in &outcome.elements {
                        let name = el.tags.get("name").map_or("-", String::as_str);
                        writeln!(out, "{} {} {name}", el.kind.as_deref().unwrap_or("?"), el.id.unwrap_or_default())?;
                    }
                }
                _ => emit_json(out, mode, &json!({"outcome": outcome, "places": summaries}))?,
            }
            Ok(())
        }
        Command::SetSample { points_json } => {
            let v = parse_json("points", &points_json)?;
            let points = v
                .as_array()
                .ok_or_else(|| AreaQueryError::InvalidGeometry("points must be a JSON list".into()))?;
            let saved = sample::set_sample(points)?;
            match mode {
                OutputMode::Json => emit_json(out, mode, &json!({"status": "saved", "points": saved}))?,
                _ => writeln!(out, "saved {saved} point(s)")?,
            }
            Ok(())
        }
        Command::ShowSample => {
            let current = sample::current_sample();
            emit_json(out, mode, &current)
        }
        Command::Metrics => {
            write!(out, "{}", telemetry::metrics_text())?;
            Ok(())
        }
        Command::ConfigCheck { paths } => {
            let mut report = Vec::new();
            for p in paths.iter().filter(|p| p.exists()) {
                let text = std::fs::read_to_string(p)?;
                let table = toml::from_str::<toml::Table>(&text)
                    .map_err(|e| AreaQueryError::Config(format!("{}: {e}", p.display())))?;
                let secrets = crate::config::scan_toml_for_secret_keys(&toml::Value::Table(table));
                if !secrets.is_empty() {
                    log::warn!("plaintext credentials in {}: {}", p.display(), secrets.join(", "));
                }
                report.push(json!({"path": p.display().to_string(), "secret_keys": secrets}));
            }
            match mode {
                OutputMode::Plain => {
                    for r in &report {
                        writeln!(out, "{} secrets={}", r["path"].as_str().unwrap_or_default(), r["secret_keys"])?;
                    }
                }
                _ => emit_json(out, mode, &json!({"files": report, "resolved": svc.config()}))?,
            }
            Ok(())
        }
    }
}

/// [`run_with_format`] with human-readable output.
///
/// # Errors
/// Same as [`run_with_format`].
pub fn run(svc: &SearchService, cmd: Command, out: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    run_with_format(svc, cmd, OutputMode::Human, out)
}
