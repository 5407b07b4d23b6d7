//! Sheetsplit: split texture-atlas sprite sheets into individual sprites.
//!
//! A sprite sheet arrives as a PNG plus a property-list manifest recording
//! each sprite's rectangle, rotation flag, trim offset and pre-trim size.
//! Sheetsplit crops every named frame back out (de-rotating frames the
//! packer stored sideways) and assembles them into a ZIP archive, one PNG
//! per sprite. Input is either a ZIP containing both files or the two files
//! supplied separately.
//!
//! # Modules
//!
//! - [`plist`]: minimal XML property-list reader
//! - [`manifest`]: manifest parsing and frame geometry resolution
//! - [`sprite`]: per-frame crop, de-rotation and PNG encoding
//! - [`pairing`]: image/manifest pairing inside unpacked archives
//! - [`pipeline`]: end-to-end orchestration and archive assembly
//! - [`error`]: error types for sheetsplit operations

pub mod error;
pub mod manifest;
pub mod pairing;
pub mod pipeline;
pub mod plist;
pub mod sprite;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::SheetsplitError;

use pipeline::{FailurePolicy, SplitOptions};

/// The sheetsplit CLI application.
#[derive(Parser)]
#[command(name = "sheetsplit")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Split a sprite sheet into one PNG per frame.
    Split(SplitArgs),
}

/// Arguments for the split subcommand.
#[derive(clap::Args)]
struct SplitArgs {
    /// ZIP archive containing the sheet image and its manifest. When given,
    /// --image and --manifest are ignored.
    #[arg(long)]
    archive: Option<PathBuf>,

    /// Sprite sheet image (.png). Required together with --manifest when no
    /// archive is given; both must share a base name.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Frame manifest (.plist or .xml).
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Where to write the output archive.
    #[arg(short, long, default_value = pipeline::OUTPUT_ARCHIVE_NAME)]
    output: PathBuf,

    /// What to do when a frame with valid geometry fails to extract.
    #[arg(long, value_enum, default_value_t = FailurePolicy::Abort)]
    on_extract_error: FailurePolicy,
}

/// Run the sheetsplit CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SheetsplitError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Split(args)) => run_split(args),
        None => {
            println!("sheetsplit {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Split texture-atlas sprite sheets into individual sprites.");
            println!();
            println!("Run 'sheetsplit --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the split subcommand.
fn run_split(args: SplitArgs) -> Result<(), SheetsplitError> {
    let options = SplitOptions {
        extract_failures: args.on_extract_error,
    };

    let archive_bytes = if let Some(archive) = args.archive.as_deref() {
        pipeline::split_archive(archive, &options)?
    } else {
        match (args.image.as_deref(), args.manifest.as_deref()) {
            (Some(image), Some(manifest)) => pipeline::split_pair(image, manifest, &options)?,
            _ => {
                return Err(SheetsplitError::MissingInput(
                    "provide --archive, or both --image and --manifest".to_string(),
                ));
            }
        }
    };

    fs::write(&args.output, &archive_bytes).map_err(SheetsplitError::Io)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
