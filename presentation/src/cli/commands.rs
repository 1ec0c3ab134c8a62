//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text, one block per file
    Text,
    /// One JSON document per file
    Json,
}

/// CLI arguments for captionkit
#[derive(Parser, Debug)]
#[command(name = "captionkit")]
#[command(author, version, about = "Generate alt text, captions and descriptions for images")]
#[command(long_about = r#"
captionkit sends images to a remote analysis service and prints the generated
alt text, captions or descriptions.

Each file is submitted once per requested role. Jobs the service cannot answer
immediately are polled together until they finish or the round budget runs out.
Processing stops early when the account runs out of credits.

Configuration files are loaded from (in priority order):
1. CAPTIONKIT_* environment variables (e.g. CAPTIONKIT_SERVICE__API_KEY)
2. --config <path>          Explicit config file
3. ./captionkit.toml        Project-level config
4. ~/.config/captionkit/config.toml   Global config

Example:
  captionkit photo.jpg
  captionkit -r alt_text -r caption --language de *.png
  captionkit --prompt "Describe the chart's trend" chart.png
  captionkit --credits
"#)]
pub struct Cli {
    /// Images to analyze
    #[arg(value_name = "FILES", required_unless_present_any = ["credits", "show_config"])]
    pub files: Vec<PathBuf>,

    /// Role to generate (alt_text, caption, description, title or a custom name; repeatable)
    #[arg(short, long, value_name = "ROLE")]
    pub role: Vec<String>,

    /// Custom prompt sent instead of a role (one request per file)
    #[arg(short, long, value_name = "TEXT")]
    pub prompt: Option<String>,

    /// Language of the generated text
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Backend model to request from the service
    #[arg(short, long, value_name = "MODEL")]
    pub backend: Option<String>,

    /// Analysis features to request (describe, tags, ocr; repeatable)
    #[arg(short, long, value_name = "FEATURE")]
    pub feature: Vec<String>,

    /// Maximum polling rounds per file
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<u32>,

    /// Truncate displayed text to this many characters (0 disables)
    #[arg(long, value_name = "CHARS")]
    pub max_length: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Print the remaining credit balance and exit
    #[arg(long)]
    pub credits: bool,

    /// Append job events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub results_log: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
