//! The extraction pipeline: resolve the input source, walk the manifest's
//! frames, and assemble the output archive.
//!
//! Temporary workspaces are `TempDir`s, so teardown happens on every exit
//! path, success or failure. No partial results are ever returned: a fatal
//! frame failure drops the whole output.

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::SheetsplitError;
use crate::manifest::{self, geometry};
use crate::pairing;
use crate::sprite;

/// Default name for the assembled sprite archive.
pub const OUTPUT_ARCHIVE_NAME: &str = "extracted_sprites.zip";

/// What to do when a geometry-resolved frame fails to extract.
///
/// Frames whose geometry cannot be resolved are always skipped with a
/// warning. Extraction failures abort the whole run by default, because an
/// out-of-bounds crop usually means the sheet and manifest do not belong
/// together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

/// Pipeline configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitOptions {
    pub extract_failures: FailurePolicy,
}

/// Split a sprite sheet archive read from disk.
pub fn split_archive(path: &Path, options: &SplitOptions) -> Result<Vec<u8>, SheetsplitError> {
    let bytes = fs::read(path).map_err(SheetsplitError::Io)?;
    split_archive_inner(&bytes, path, options)
}

/// Split a sprite sheet archive held in memory.
pub fn split_archive_bytes(
    bytes: &[u8],
    options: &SplitOptions,
) -> Result<Vec<u8>, SheetsplitError> {
    split_archive_inner(bytes, Path::new("<archive>"), options)
}

fn split_archive_inner(
    bytes: &[u8],
    label: &Path,
    options: &SplitOptions,
) -> Result<Vec<u8>, SheetsplitError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|source| SheetsplitError::ArchiveRead {
            path: label.to_path_buf(),
            message: source.to_string(),
        })?;

    // Workspace for the unpacked archive; removed when dropped, including
    // on the error paths below.
    let workspace = tempfile::tempdir().map_err(SheetsplitError::Io)?;
    archive
        .extract(workspace.path())
        .map_err(|source| SheetsplitError::ArchiveRead {
            path: label.to_path_buf(),
            message: source.to_string(),
        })?;

    let listing = pairing::list_files(workspace.path())?;
    let pair = pairing::pair_sheet_files(&listing)?;

    let image_bytes = fs::read(&pair.image).map_err(SheetsplitError::Io)?;
    let manifest_text = fs::read_to_string(&pair.manifest).map_err(SheetsplitError::Io)?;

    split_sheet(&image_bytes, &manifest_text, &pair.manifest, options)
}

/// Split a separately supplied sheet image and manifest.
///
/// The two files must share a base name, mirroring the pairing rule used
/// for archives.
pub fn split_pair(
    image_path: &Path,
    manifest_path: &Path,
    options: &SplitOptions,
) -> Result<Vec<u8>, SheetsplitError> {
    let image_base = pairing::base_name(image_path);
    let manifest_base = pairing::base_name(manifest_path);
    if image_base != manifest_base {
        return Err(SheetsplitError::BaseNameMismatch {
            image: image_path.display().to_string(),
            manifest: manifest_path.display().to_string(),
        });
    }

    let image_bytes = fs::read(image_path).map_err(SheetsplitError::Io)?;
    let manifest_text = fs::read_to_string(manifest_path).map_err(SheetsplitError::Io)?;

    split_sheet(&image_bytes, &manifest_text, manifest_path, options)
}

/// Run the core pipeline over in-memory sheet bytes and manifest text.
///
/// Frames are processed in manifest order; the output archive holds one
/// `<spriteName>.png` entry per successfully extracted frame, in that same
/// order. `manifest_path` provides error context only.
pub fn split_sheet(
    image_bytes: &[u8],
    manifest_text: &str,
    manifest_path: &Path,
    options: &SplitOptions,
) -> Result<Vec<u8>, SheetsplitError> {
    let sheet = image::load_from_memory(image_bytes)
        .map_err(|source| SheetsplitError::ImageDecode {
            message: source.to_string(),
        })?
        .to_rgba8();

    let manifest = manifest::parse_manifest_str(manifest_text, manifest_path)?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let entry_options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, raw) in &manifest.frames {
        let frame = match geometry::resolve_frame(name, raw) {
            Ok(frame) => frame,
            Err(err) => {
                eprintln!("Warning: {err}; skipping frame");
                continue;
            }
        };

        let png = match sprite::extract_sprite(&sheet, name, &frame)
            .and_then(|buffer| sprite::encode_png(&buffer, name))
        {
            Ok(png) => png,
            Err(err) if options.extract_failures == FailurePolicy::Skip => {
                eprintln!("Warning: {err}; skipping frame");
                continue;
            }
            Err(err) => return Err(err),
        };

        writer
            .start_file(format!("{name}.png"), entry_options)
            .map_err(|source| SheetsplitError::ArchiveWrite {
                message: source.to_string(),
            })?;
        writer.write_all(&png).map_err(SheetsplitError::Io)?;
    }

    let cursor = writer
        .finish()
        .map_err(|source| SheetsplitError::ArchiveWrite {
            message: source.to_string(),
        })?;
    Ok(cursor.into_inner())
}

/// Decode an output archive into `(entry name, bytes)` pairs in entry order.
///
/// Helper for callers (and tests) that inspect assembled archives.
pub fn read_archive_entries(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>, SheetsplitError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|source| SheetsplitError::ArchiveRead {
            path: Path::new("<archive>").to_path_buf(),
            message: source.to_string(),
        })?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|source| SheetsplitError::ArchiveRead {
                path: Path::new("<archive>").to_path_buf(),
                message: source.to_string(),
            })?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(SheetsplitError::Io)?;
        entries.push((file.name().to_string(), contents));
    }

    Ok(entries)
}
