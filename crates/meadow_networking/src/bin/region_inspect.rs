//! # Region Inspector
//!
//! Decodes a captured region update and prints what it carries.
//!
//! ## Usage
//!
//! ```bash
//! region_inspect capture.bin --config codec.toml
//! RUST_LOG=meadow_networking=debug region_inspect capture.bin
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use meadow_networking::{
    decode_region_update, CodecConfig, ConfigError, EntityUpdate, ProtocolError, ProtocolResult,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

struct Args {
    capture: PathBuf,
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();

    // Parse command line arguments (simple parsing, no external deps)
    let args: Vec<String> = std::env::args().collect();
    let mut capture = None;
    let mut config = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => capture = Some(PathBuf::from(other)),
        }
        i += 1;
    }

    let Some(capture) = capture else {
        print_usage();
        return ExitCode::FAILURE;
    };

    match run(&Args { capture, config }) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Ignore error if already set.
    let _ = fmt().with_env_filter(env_filter).try_init();
}

fn print_usage() {
    println!("Usage: region_inspect <CAPTURE> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>   Codec config TOML (default: built-in scales)");
    println!("  -h, --help            Show this help");
}

fn run(args: &Args) -> ProtocolResult<()> {
    let config = match &args.config {
        Some(path) => CodecConfig::from_toml_file(path)?,
        None => CodecConfig::default(),
    };

    let bytes = std::fs::read(&args.capture).map_err(|source| {
        ProtocolError::Config(ConfigError::Io {
            path: args.capture.display().to_string(),
            source,
        })
    })?;
    let update = decode_region_update(&bytes, &config)?;

    info!(
        "Region ({}, {}): {} bytes, {} records, {} removes, {} tiles, tile data {}",
        update.region.x,
        update.region.y,
        bytes.len(),
        update.updates.len(),
        update.removes.len(),
        update.tiles.len(),
        update.tile_data.as_ref().map_or_else(|| "absent".to_owned(), |d| format!("{} bytes", d.len()))
    );

    for record in &update.updates {
        println!("{}", describe(record));
    }
    for id in &update.removes {
        println!("remove {id}");
    }
    for tile in &update.tiles {
        println!("tile ({}, {}) = {}", tile.x, tile.y, tile.tile_type);
    }
    Ok(())
}

fn describe(record: &EntityUpdate) -> String {
    let mut line = format!("entity {} {:?}", record.id, record.flags);
    if let Some(p) = record.position {
        line.push_str(&format!(" pos=({:.3}, {:.3})", p.x, p.y));
    }
    if let Some(v) = record.velocity {
        line.push_str(&format!(" vel=({:.3}, {:.3})", v.x, v.y));
    }
    if let Some(name) = &record.name {
        line.push_str(&format!(" name={name:?}"));
        if record.name_bad {
            line.push_str(" (filtered)");
        }
    }
    line
}
