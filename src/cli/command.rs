use std::path::PathBuf;

/// Programmatic form of every CLI subcommand. JSON arguments are raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Geometry and query building
    Extract {
        payload_json: String,
    },
    Compile {
        payload_json: String,
        /// `key=value` entries or bare values for the category key.
        filters: Vec<String>,
        timeout_secs: Option<u32>,
    },
    ParseFilters {
        raw: String,
    },
    // Searching
    Search {
        /// `None` searches the current sample.
        payload_json: Option<String>,
        prompt: Option<String>,
        /// Pre-computed classifier output; takes precedence over `prompt`.
        classifier_output: Option<String>,
        fallback: Option<String>,
        summarize_top: Option<usize>,
        reviews: usize,
    },
    // Current sample
    SetSample {
        points_json: String,
    },
    ShowSample,
    // Diagnostics
    Metrics,
    ConfigCheck {
        paths: Vec<PathBuf>,
    },
}
