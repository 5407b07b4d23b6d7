//! Finding the sheet/manifest pair inside an unpacked archive.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::SheetsplitError;

const IMAGE_EXTENSIONS: &[&str] = &["png"];
const MANIFEST_EXTENSIONS: &[&str] = &["plist", "xml"];

/// A matched sprite sheet image and its manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetPair {
    pub image: PathBuf,
    pub manifest: PathBuf,
}

/// Recursively list all files under `root`.
///
/// Entries are sorted by file name per directory so the listing order, and
/// with it pairing precedence, does not depend on filesystem readdir order.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, SheetsplitError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| SheetsplitError::DirWalk {
            path: root.to_path_buf(),
            message: source.to_string(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Pick the image/manifest pair from a file listing.
///
/// Candidates are filtered by extension (case-insensitive). The outer scan
/// walks image candidates in listing order; for each, manifest candidates
/// are scanned in listing order, and the first pair whose base file names
/// (extension stripped) are equal wins. First match, not best match.
pub fn pair_sheet_files(paths: &[PathBuf]) -> Result<SheetPair, SheetsplitError> {
    let images: Vec<&PathBuf> = paths
        .iter()
        .filter(|path| has_extension(path, IMAGE_EXTENSIONS))
        .collect();
    let manifests: Vec<&PathBuf> = paths
        .iter()
        .filter(|path| has_extension(path, MANIFEST_EXTENSIONS))
        .collect();

    if images.is_empty() || manifests.is_empty() {
        return Err(SheetsplitError::NoPairCandidates {
            png_count: images.len(),
            manifest_count: manifests.len(),
        });
    }

    for image in &images {
        let image_base = base_name(image);
        for manifest in &manifests {
            if base_name(manifest) == image_base {
                return Ok(SheetPair {
                    image: (*image).clone(),
                    manifest: (*manifest).clone(),
                });
            }
        }
    }

    Err(SheetsplitError::NoMatchingPair)
}

/// File name with the final extension stripped.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| {
            extensions
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}
