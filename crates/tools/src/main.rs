use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::math::Viewport;
use grid::{Containment, ResolutionPolicy};
use serde::Serialize;
use tools::commands;
use tools::{CliError, HexConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hexagon grid viewport and cell selection tools")]
struct Args {
    /// Zoom to resolution policy (overrides HEXVIEW_POLICY)
    #[arg(long, global = true)]
    policy: Option<ResolutionPolicy>,

    /// How cells are matched against polygons (overrides HEXVIEW_CONTAINMENT)
    #[arg(long, global = true)]
    containment: Option<Containment>,

    /// Viewport throttle window in milliseconds (overrides HEXVIEW_THROTTLE_MS)
    #[arg(long, global = true)]
    throttle_ms: Option<u64>,

    /// Ceiling on visible cells (overrides HEXVIEW_MAX_CELLS)
    #[arg(long, global = true)]
    max_cells: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cells covering a viewport
    Visible {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        zoom: f64,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 720.0)]
        height: f64,
        /// Map rotation in degrees, clockwise
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        bearing: f64,
        /// Cells to report as highlighted, in any accepted form
        #[arg(long)]
        select: Vec<String>,
    },

    /// Resolve cell identifiers from free-form tokens
    Parse {
        #[arg(required = true)]
        tokens: Vec<String>,
    },

    /// Cells covering a polygon
    Cover {
        /// JSON ring: [[lon,lat],...]
        #[arg(long, allow_hyphen_values = true)]
        ring: String,
        #[arg(long)]
        resolution: u8,
        /// Merge complete sibling groups into their parents
        #[arg(long)]
        compact: bool,
    },

    /// Replay a JSON-lines log of viewport changes through the throttle
    Replay { path: PathBuf },

    /// Describe one cell
    Inspect { cell: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), CliError> {
    let args = Args::parse();

    let mut config = HexConfig::from_env();
    if let Some(policy) = args.policy {
        config.policy = policy;
    }
    if let Some(containment) = args.containment {
        config.containment = containment;
    }
    if let Some(ms) = args.throttle_ms {
        config.throttle_ms = ms;
    }
    if let Some(max) = args.max_cells {
        config.max_cells = max;
    }
    tracing::debug!(?config, "configuration");

    match args.command {
        Command::Visible {
            lat,
            lon,
            zoom,
            width,
            height,
            bearing,
            select,
        } => {
            let viewport = Viewport::new(lat, lon, zoom, width, height).with_bearing(bearing);
            print_json(&commands::visible(&config, &viewport, &select))
        }
        Command::Parse { tokens } => print_json(&commands::parse_tokens(&tokens)),
        Command::Cover {
            ring,
            resolution,
            compact,
        } => print_json(&commands::cover_ring(&config, &ring, resolution, compact)?),
        Command::Replay { path } => {
            let file = File::open(&path).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            print_json(&commands::replay(&config, BufReader::new(file), &path)?)
        }
        Command::Inspect { cell } => print_json(&commands::inspect(&cell)?),
    }
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
