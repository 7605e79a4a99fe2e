//! CLI module: command parsing and dispatch
//!
//! All CLI logic lives here. `main.rs` calls `cli::run()`.

pub mod chunk;
pub mod config;
pub mod fetch;
pub mod serve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};

use pagefetch::config::Config;

#[derive(Parser)]
#[command(name = "pagefetch")]
#[command(version)]
#[command(about = "Fetch the readable text of a web page", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Page to fetch (http or https)
    url: Option<String>,

    /// Config file to use instead of ~/.pagefetch/config.json
    #[arg(long = "config", id = "config_path", global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(flatten)]
    fetch: FetchArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Per-fetch overrides on top of the configured defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct FetchArgs {
    /// Maximum characters of text to return
    #[arg(long)]
    pub max_chars: Option<usize>,
    /// Identity selection: url (hash into a pool) or fixed
    #[arg(long, value_name = "MODE")]
    pub ua_mode: Option<String>,
    /// Identity pool: desktop, mobile, or tablet
    #[arg(long, value_name = "FAMILY")]
    pub ua_family: Option<String>,
    /// Identity sent in fixed mode
    #[arg(long)]
    pub user_agent: Option<String>,
    /// Deadline for the whole fetch in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// Deadline for each single attempt in milliseconds
    #[arg(long)]
    pub attempt_timeout_ms: Option<u64>,
    /// Response body byte cap
    #[arg(long)]
    pub max_bytes: Option<usize>,
    /// Maximum redirects followed per request
    #[arg(long)]
    pub redirect_limit: Option<usize>,
    /// Never try mirror URLs
    #[arg(long)]
    pub no_fallbacks: bool,
    /// Skip main-content extraction and return the whole body text
    #[arg(long)]
    pub raw: bool,
    /// Print JSON with title, byline, excerpt, method, and channel
    #[arg(long)]
    pub meta: bool,
    /// Split the text into overlapping chunks of this many characters
    #[arg(long)]
    pub chunk_size: Option<usize>,
    /// Characters shared by consecutive chunks
    #[arg(long, default_value_t = pagefetch::chunk::DEFAULT_CHUNK_OVERLAP)]
    pub chunk_overlap: usize,
    /// Maximum number of chunks
    #[arg(long, default_value_t = pagefetch::chunk::DEFAULT_MAX_CHUNKS)]
    pub max_chunks: usize,
    /// Allow loopback, private, and link-local targets
    #[arg(long)]
    pub allow_private: bool,
    /// Log every failed attempt
    #[arg(long)]
    pub debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP fetch service
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Split text from a file (or stdin) into overlapping chunks
    Chunk {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
        /// Characters per chunk (minimum 100)
        #[arg(long, default_value_t = pagefetch::chunk::DEFAULT_CHUNK_SIZE)]
        size: usize,
        /// Characters shared by consecutive chunks
        #[arg(long, default_value_t = pagefetch::chunk::DEFAULT_CHUNK_OVERLAP)]
        overlap: usize,
        /// Maximum number of chunks
        #[arg(long, default_value_t = pagefetch::chunk::DEFAULT_MAX_CHUNKS)]
        max_chunks: usize,
    },
    /// Validate configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Check the config file for unknown fields and risky settings
    Check,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().context("Failed to load config"),
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Respect the configured log settings when the file is readable; a broken
    // file is reported by the command that needs it.
    let logging_cfg = load_config(cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();
    if let Err(e) = pagefetch::utils::logging::init_logging(&logging_cfg) {
        eprintln!("Warning: {}", e);
    }

    match cli.command {
        None => match cli.url {
            Some(url) => {
                let config = load_config(cli.config.as_deref())?;
                fetch::cmd_fetch(&config, &url, &cli.fetch).await?;
            }
            None => {
                let mut cmd = Cli::command();
                cmd.print_help()?;
                println!();
            }
        },
        Some(Commands::Serve { host, port }) => {
            let config = load_config(cli.config.as_deref())?;
            serve::cmd_serve(config, host, port).await?;
        }
        Some(Commands::Chunk {
            file,
            size,
            overlap,
            max_chunks,
        }) => {
            chunk::cmd_chunk(file, size, overlap, max_chunks)?;
        }
        Some(Commands::Config { action }) => {
            config::cmd_config(action, cli.config.as_deref())?;
        }
        Some(Commands::Version) => {
            cmd_version();
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("pagefetch {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Hardened web page text fetcher");
}
