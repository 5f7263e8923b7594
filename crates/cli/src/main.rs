mod cmd;
mod logging;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use datefill_core::config::{ConfigLoader, LoggingConfig};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "datefill",
    version,
    about = "Fill {{date(...)}} markers in JSON and YAML documents"
)]
struct Cli {
    /// Path to config.toml (default: ~/.config/datefill/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interpolate every string in a JSON or YAML document
    Render(RenderArgs),

    /// Interpolate a single string
    Eval(EvalArgs),

    /// Validate configuration and print the resolved settings
    Doctor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocFormat {
    Json,
    Yaml,
}

impl DocFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "json" => Some(DocFormat::Json),
            "yaml" | "yml" => Some(DocFormat::Yaml),
            _ => None,
        }
    }
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Input document (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Input format (default: from the file extension, else json)
    #[arg(long, value_enum)]
    pub input: Option<DocFormat>,

    /// Output format (default: same as input)
    #[arg(long, value_enum)]
    pub output: Option<DocFormat>,

    /// Reference instant instead of the current time (YYYY-MM-DD[THH:MM[:SS]])
    #[arg(long, value_parser = parse_reference)]
    pub at: Option<NaiveDateTime>,
}

#[derive(Debug, Args)]
pub struct EvalArgs {
    /// Text containing {{date(...)}} markers
    pub text: String,

    /// Reference instant instead of the current time (YYYY-MM-DD[THH:MM[:SS]])
    #[arg(long, value_parser = parse_reference)]
    pub at: Option<NaiveDateTime>,
}

fn parse_reference(s: &str) -> Result<NaiveDateTime, String> {
    const DATETIME_FORMATS: [&str; 4] =
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .ok_or_else(|| format!("expected YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS], got '{s}'"))
}

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("Failed to install error reporting: {e}");
    }

    let cli = Cli::parse();

    let loaded = ConfigLoader::load(cli.config.as_deref());
    let default_logging = LoggingConfig::default();
    logging::init(match &loaded {
        Ok(rc) => &rc.logging,
        Err(_) => &default_logging,
    });

    let code = match cli.command {
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref(), loaded),
        Commands::Render(args) => cmd::with_config(loaded, |rc| cmd::render::run(rc, &args)),
        Commands::Eval(args) => cmd::with_config(loaded, |rc| cmd::eval::run(rc, &args)),
    };

    logging::flush();
    std::process::exit(code);
}
