//! embedsync CLI - media embed markup from the shell.

use clap::{Parser, Subcommand};
use embedsync::html::{self, Schema};
use embedsync::{EmbedOptions, EmbedService, MediaData, PassthroughUrls};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "embedsync")]
#[command(author, version, about = "Media embed synchronization", long_about = None)]
struct Cli {
    /// Options file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse embed HTML into a media record (JSON)
    Parse {
        /// Input file (use - for stdin)
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Build embed HTML from a media record (JSON)
    Build {
        /// Input file (use - for stdin)
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Patch existing embed HTML with a media record
    Patch {
        /// Media record (JSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Re-target the source as well as the dimensions
        #[arg(short, long)]
        new_embed: bool,

        /// Input file (use - for stdin)
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Resolve a media record (JSON) into `{url, html}`
    Resolve {
        /// Input file (use - for stdin)
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Decorate provider embed HTML for insertion
    Decorate {
        /// Width a bare iframe is scaled down to
        #[arg(short, long, default_value_t = 480)]
        max_width: u32,

        /// Aspect ratio of a wrapped embed, as WIDTHxHEIGHT
        #[arg(short, long, value_parser = parse_resolution)]
        resolution: Option<(u32, u32)>,

        /// Input file (use - for stdin)
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let width = width.trim().parse().map_err(|e| format!("width: {e}"))?;
    let height = height.trim().parse().map_err(|e| format!("height: {e}"))?;
    Ok((width, height))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let options = match &cli.config {
        Some(path) => EmbedOptions::load(path)?,
        None => EmbedOptions::default(),
    };
    debug!(?options, "loaded options");
    let schema = Schema::from_options(&options);

    let output = match cli.command {
        Commands::Parse { input } => {
            let data = html::html_to_data_with_options(&read_input(&input)?, schema.as_ref(), &options);
            serde_json::to_string_pretty(&data)?
        }
        Commands::Build { input } => {
            let data = read_record(&read_input(&input)?)?;
            html::data_to_html_with_options(&data, &PassthroughUrls, &options)
        }
        Commands::Patch {
            data,
            new_embed,
            input,
        } => {
            let data = read_record(&fs::read_to_string(&data)?)?;
            html::update_html_with_options(&read_input(&input)?, &data, new_embed, schema.as_ref(), &options)
        }
        Commands::Resolve { input } => {
            let data = read_record(&read_input(&input)?)?;
            let service = EmbedService::new().with_options(options);
            let result = service.resolve(&data).await?;
            serde_json::to_string_pretty(&result)?
        }
        Commands::Decorate {
            max_width,
            resolution,
            input,
        } => html::decorate_provider_embed_with_options(&read_input(&input)?, resolution, max_width, &options),
    };

    let mut stdout = io::stdout();
    stdout.write_all(output.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn read_input(input: &Path) -> io::Result<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(input)
    }
}

fn read_record(json: &str) -> Result<MediaData, serde_json::Error> {
    serde_json::from_str(json)
}
