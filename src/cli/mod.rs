use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "transcript-batch",
    about = "Transcript Batch - Fetch YouTube transcripts for batches of video URLs",
    version,
    long_about = "Serves POST /get-transcript, which fetches captions for a list of YouTube URLs and returns one result per URL. Every other path is served from a static directory. Without a subcommand the server is started."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8888, global = true)]
    pub port: u16,

    /// Directory to serve static files from (overrides the config file)
    #[arg(long, value_name = "DIR", global = true)]
    pub static_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Fetch transcripts for one or more URLs and print the results
    Fetch {
        /// YouTube URLs to fetch
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the default configuration to the config path
        #[arg(long, conflicts_with = "show")]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// The same JSON body the HTTP API returns
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
