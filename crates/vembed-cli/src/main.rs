//! vembed CLI - Embed helper toolkit
//!
//! Features:
//! - Provider playback URL building (Cloudinary, Mux, Cloudflare Stream)
//! - Element id generation
//! - Player SDK bundle lookup
//! - Loader config validation

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vembed_core::MuxUrlOptions;

mod commands;
mod output;

use output::OutputFormat;

/// vembed CLI - Video embed toolkit
#[derive(Parser)]
#[command(name = "vembed")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Playback URL and player SDK toolkit for video embeds", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a provider playback URL
    Url {
        #[command(subcommand)]
        provider: UrlCommand,
    },

    /// Generate unique element ids
    Id {
        /// Id prefix
        #[arg(short, long)]
        prefix: Option<String>,

        /// Number of ids to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Show the SDK bundle a provider loads
    Sdk {
        /// Provider name (hls, dash, video-js, cloudflare, cloudinary, mux, jw-player)
        provider: String,

        /// JW Player cloud-hosted library URL
        #[arg(long)]
        library_url: Option<String>,
    },

    /// List supported providers
    Providers,

    /// Validate a loader config file (JSON)
    Config {
        /// Path to config file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum UrlCommand {
    /// Cloudinary video delivery URL
    Cloudinary {
        cloud_name: String,
        public_id: String,

        /// Transformation parameter as key=value (repeatable)
        #[arg(short, long = "transform")]
        transform: Vec<String>,

        /// Use http instead of https
        #[arg(long)]
        insecure: bool,
    },

    /// Mux HLS playback URL
    Mux {
        playback_id: String,

        /// Signed playback token
        #[arg(long)]
        token: Option<String>,

        #[arg(long)]
        max_resolution: Option<String>,

        #[arg(long)]
        min_resolution: Option<String>,

        /// Custom stream domain
        #[arg(long)]
        custom_domain: Option<String>,

        /// Poster time in seconds
        #[arg(long)]
        thumbnail_time: Option<f64>,
    },

    /// Cloudflare Stream manifest URL
    Cloudflare {
        account_id: String,
        video_id: String,

        /// Pre-signed manifest URL
        #[arg(long)]
        signed_url: Option<String>,

        /// Poster time in seconds
        #[arg(long)]
        thumbnail_time: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    vembed_core::init();
    let format = OutputFormat::from(cli.format.as_str());

    let out = match cli.command {
        Commands::Url { provider } => match provider {
            UrlCommand::Cloudinary {
                cloud_name,
                public_id,
                transform,
                insecure,
            } => commands::cloudinary_url(&cloud_name, &public_id, &transform, insecure, format)?,
            UrlCommand::Mux {
                playback_id,
                token,
                max_resolution,
                min_resolution,
                custom_domain,
                thumbnail_time,
            } => {
                let options = MuxUrlOptions {
                    token,
                    max_resolution,
                    min_resolution,
                    custom_domain,
                };
                commands::mux_url(&playback_id, &options, thumbnail_time, format)?
            }
            UrlCommand::Cloudflare {
                account_id,
                video_id,
                signed_url,
                thumbnail_time,
            } => commands::cloudflare_url(&account_id, &video_id, signed_url, thumbnail_time, format)?,
        },
        Commands::Id { prefix, count } => commands::ids(prefix.as_deref(), count),
        Commands::Sdk {
            provider,
            library_url,
        } => commands::sdk(&provider, library_url, format)?,
        Commands::Providers => commands::providers(),
        Commands::Config { path } => commands::check_config(&path, format)?,
    };

    println!("{out}");
    Ok(())
}
