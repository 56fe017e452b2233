use crate::errors::AreaQueryError;
use crate::types::{DEFAULT_CATEGORY_KEY, DEFAULT_CATEGORY_VALUE, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_CLASSIFIER_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SYSTEM_PROMPT: &str = "Translate the user's request into OpenStreetMap filters. \
Reply with a JSON array of strings of the form \"amenity=<value>\" and nothing else.";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Values as read from a config file; everything optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    pub overpass_url: Option<String>,
    pub timeout_secs: Option<u32>,
    pub http_timeout_secs: Option<u64>,
    pub category_key: Option<String>,
    pub default_category: Option<String>,
    pub classifier_url: Option<String>,
    pub classifier_model: Option<String>,
    pub classifier_api_key: Option<String>,
    pub classifier_system_prompt: Option<String>,
    pub places_api_key: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl FileConfig {
    // Fields already set win.
    fn fill_from(&mut self, other: Self) {
        fn keep<T>(slot: &mut Option<T>, incoming: Option<T>) {
            if slot.is_none() {
                *slot = incoming;
            }
        }
        keep(&mut self.overpass_url, other.overpass_url);
        keep(&mut self.timeout_secs, other.timeout_secs);
        keep(&mut self.http_timeout_secs, other.http_timeout_secs);
        keep(&mut self.category_key, other.category_key);
        keep(&mut self.default_category, other.default_category);
        keep(&mut self.classifier_url, other.classifier_url);
        keep(&mut self.classifier_model, other.classifier_model);
        keep(&mut self.classifier_api_key, other.classifier_api_key);
        keep(&mut self.classifier_system_prompt, other.classifier_system_prompt);
        keep(&mut self.places_api_key, other.places_api_key);
        keep(&mut self.log_dir, other.log_dir);
        keep(&mut self.log_level, other.log_level);
    }

    fn fill_from_env(&mut self) {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|s| !s.trim().is_empty())
        }
        let env = Self {
            overpass_url: var("AREAQUERY_OVERPASS_URL"),
            timeout_secs: var("AREAQUERY_TIMEOUT_SECS").and_then(|s| s.parse().ok()),
            http_timeout_secs: var("AREAQUERY_HTTP_TIMEOUT_SECS").and_then(|s| s.parse().ok()),
            category_key: var("AREAQUERY_CATEGORY_KEY"),
            default_category: var("AREAQUERY_DEFAULT_CATEGORY"),
            classifier_url: var("AREAQUERY_CLASSIFIER_URL"),
            classifier_model: var("AREAQUERY_CLASSIFIER_MODEL"),
            classifier_api_key: var("GEMINI_API_KEY"),
            classifier_system_prompt: var("AREAQUERY_SYSTEM_PROMPT"),
            places_api_key: var("GMAPS_API_KEY"),
            log_dir: var("AREAQUERY_LOG_DIR").map(PathBuf::from),
            log_level: var("AREAQUERY_LOG_LEVEL"),
        };
        self.fill_from(env);
    }
}

/// Resolved configuration with defaults applied.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub overpass_url: String,
    pub timeout_secs: u32,
    pub http_timeout_secs: u64,
    pub category_key: String,
    pub default_category: String,
    pub classifier_url: String,
    pub classifier_model: String,
    #[serde(skip_serializing)]
    pub classifier_api_key: Option<String>,
    pub classifier_system_prompt: String,
    #[serde(skip_serializing)]
    pub places_api_key: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from(FileConfig::default())
    }
}

impl From<FileConfig> for AppConfig {
    fn from(f: FileConfig) -> Self {
        Self {
            overpass_url: f.overpass_url.unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_string()),
            timeout_secs: f.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            http_timeout_secs: f.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            category_key: f.category_key.unwrap_or_else(|| DEFAULT_CATEGORY_KEY.to_string()),
            default_category: f.default_category.unwrap_or_else(|| DEFAULT_CATEGORY_VALUE.to_string()),
            classifier_url: f.classifier_url.unwrap_or_else(|| DEFAULT_CLASSIFIER_URL.to_string()),
            classifier_model: f.classifier_model.unwrap_or_else(|| DEFAULT_CLASSIFIER_MODEL.to_string()),
            classifier_api_key: f.classifier_api_key,
            classifier_system_prompt: f
                .classifier_system_prompt
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            places_api_key: f.places_api_key,
            log_dir: f.log_dir,
            log_level: f.log_level,
        }
    }
}

/// Candidate config files, highest precedence first.
#[must_use]
pub fn find_config_paths(cli_cfg: Option<&Path>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = vec![];
    if let Some(p) = cli_cfg {
        paths.push(p.to_path_buf());
    }
    if let Ok(p) = std::env::var("AREAQUERY_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Ok(home) = std::env::var("USERPROFILE").or_else(|_| std::env::var("HOME")) {
        paths.push(PathBuf::from(home).join(".config").join("areaquery.toml"));
    }
    if let Ok(cur) = std::env::current_dir() {
        paths.push(cur.join("areaquery.toml"));
    }
    paths
}

/// Parses one config file.
///
/// # Errors
/// `Io` when the file cannot be read, `Config` when it is not valid TOML for [`FileConfig`].
pub fn read_config_file(path: &Path) -> Result<FileConfig, AreaQueryError> {
    let s = std::fs::read_to_string(path)?;
    toml::from_str::<FileConfig>(&s)
        .map_err(|e| AreaQueryError::Config(format!("{}: {e}", path.display())))
}

/// Precedence: CLI path > `AREAQUERY_CONFIG` > user config > working directory, then env, then defaults.
///
/// Unreadable or invalid files are skipped with a warning.
#[must_use]
pub fn load_config(cli_cfg: Option<&Path>) -> AppConfig {
    let mut cfg = FileConfig::default();
    for p in find_config_paths(cli_cfg) {
        if !p.exists() {
            continue;
        }
        match read_config_file(&p) {
            Ok(file_cfg) => cfg.fill_from(file_cfg),
            Err(e) => log::warn!("ignoring config file: {e}"),
        }
    }
    cfg.fill_from_env();
    AppConfig::from(cfg)
}

fn is_secret_key(key: &str) -> bool {
    let k = key.to_ascii_lowercase();
    k.contains("password")
        || k.contains("secret")
        || k.contains("token")
        || k.contains("apikey")
        || k.contains("api_key")
        || k.contains("private_key")
}

/// Dotted paths of keys in `val` that look like credentials.
#[must_use]
pub fn scan_toml_for_secret_keys(val: &toml::Value) -> Vec<String> {
    let mut secrets = Vec::new();
    let mut q = VecDeque::new();
    q.push_back((String::new(), val));
    while let Some((prefix, v)) = q.pop_front() {
        match v {
            toml::Value::Table(map) => {
                for (k, vv) in map {
                    let full = if prefix.is_empty() { k.clone() } else { format!("{prefix}.{k}") };
                    if is_secret_key(k) {
                        secrets.push(full.clone());
                    }
                    q.push_back((full, vv));
                }
            }
            toml::Value::Array(arr) => {
                for (i, vv) in arr.iter().enumerate() {
                    q.push_back((format!("{prefix}[{i}]"), vv));
                }
            }
            _ => {}
        }
    }
    secrets
}
