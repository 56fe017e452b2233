use areaquery::cli::{self as prog_cli, OutputMode, parse_output_mode};
use areaquery::config::find_config_paths;
use areaquery::service::SearchService;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "areaquery", version, about = "Search points of interest inside a drawn region", long_about = None)]
struct Cli {
    /// Path to a config file (TOML)
    #[arg(long, help = "Path to a config file (TOML). If omitted, the usual locations and env are used.")]
    config: Option<PathBuf>,
    #[arg(long, help = "Output format: human|json|plain")]
    format: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(name = "extract", about = "Print the polygons found in a geometry payload")]
    Extract {
        #[arg(help = "Geometry JSON file, or '-' for stdin")]
        geometry: PathBuf,
    },
    #[command(name = "compile", about = "Compile a geometry payload and filters into query text")]
    Compile {
        #[arg(help = "Geometry JSON file, or '-' for stdin")]
        geometry: PathBuf,
        #[arg(long = "filter", short = 'f', required = true, help = "key=value, or a bare value for the category key (repeatable)")]
        filters: Vec<String>,
        #[arg(long, help = "Server-side timeout in seconds")]
        timeout: Option<u32>,
    },
    #[command(name = "parse-filters", about = "Parse classifier output into a filter list")]
    ParseFilters {
        #[arg(help = "Raw classifier text; reads stdin when omitted")]
        raw: Option<String>,
    },
    #[command(name = "search", about = "Run a search over a geometry payload or the current sample")]
    Search {
        #[arg(long, help = "Geometry JSON file, or '-' for stdin. Uses the current sample when omitted.")]
        geometry: Option<PathBuf>,
        #[arg(long, help = "Free-text request sent to the intent classifier")]
        prompt: Option<String>,
        #[arg(long = "classifier-output", help = "Use this text instead of calling the classifier")]
        classifier_output: Option<String>,
        #[arg(long, help = "Category value used when no filters are usable")]
        fallback: Option<String>,
        #[arg(long, help = "Look up place details for the first N results")]
        summarize: Option<usize>,
        #[arg(long, default_value_t = 3, help = "Reviews kept per place")]
        reviews: usize,
    },
    #[command(name = "set-sample", about = "Replace the current sample with a list of points")]
    SetSample {
        #[arg(help = "Points JSON file, or '-' for stdin")]
        points: PathBuf,
    },
    #[command(name = "show-sample", about = "Print the current sample")]
    ShowSample,
    #[command(name = "metrics", about = "Print counters in OpenMetrics text format")]
    Metrics,
    #[command(name = "config-check", about = "Report plaintext credentials in config files")]
    ConfigCheck,
}

fn read_input(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s)?;
        Ok(s)
    } else {
        std::fs::read_to_string(path)
    }
}

fn to_command(cmd: Commands, cli_cfg: Option<&Path>) -> std::io::Result<prog_cli::Command> {
    Ok(match cmd {
        Commands::Extract { geometry } => prog_cli::Command::Extract { payload_json: read_input(&geometry)? },
        Commands::Compile { geometry, filters, timeout } => prog_cli::Command::Compile {
            payload_json: read_input(&geometry)?,
            filters,
            timeout_secs: timeout,
        },
        Commands::ParseFilters { raw } => prog_cli::Command::ParseFilters {
            raw: match raw {
                Some(r) => r,
                None => read_input(Path::new("-"))?,
            },
        },
        Commands::Search { geometry, prompt, classifier_output, fallback, summarize, reviews } => {
            prog_cli::Command::Search {
                payload_json: geometry.as_deref().map(read_input).transpose()?,
                prompt,
                classifier_output,
                fallback,
                summarize_top: summarize,
                reviews,
            }
        }
        Commands::SetSample { points } => prog_cli::Command::SetSample { points_json: read_input(&points)? },
        Commands::ShowSample => prog_cli::Command::ShowSample,
        Commands::Metrics => prog_cli::Command::Metrics,
        Commands::ConfigCheck => prog_cli::Command::ConfigCheck { paths: find_config_paths(cli_cfg) },
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = areaquery::init(cli.config.as_deref());
    let mode: OutputMode = parse_output_mode(cli.format.as_deref());
    let cmd = to_command(cli.command, cli.config.as_deref())?;
    let svc = SearchService::from_config(cfg);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = prog_cli::run_with_format(&svc, cmd, mode, &mut out) {
        log::error!("command failed: {e}");
        return Err(e);
    }
    Ok(())
}
