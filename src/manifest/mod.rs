//! Sprite sheet manifest reader.
//!
//! A manifest is a property-list document whose top-level dictionary carries
//! a `frames` key: a dictionary from sprite name to a per-frame record.
//! Records are kept in document order so extraction and output archive
//! assembly follow manifest iteration order.

pub mod geometry;

use std::fs;
use std::path::Path;

use crate::error::SheetsplitError;
use crate::plist::{self, PlistValue};

/// One frame record as it appears in the manifest, before geometry
/// resolution. Field shapes vary between packer dialects; see
/// [`geometry::resolve_frame`].
#[derive(Clone, Debug)]
pub struct RawFrame {
    /// The bounding rectangle: a `{{x,y},{w,h}}` string or an
    /// `{x,y,w,h}` dictionary.
    pub frame: Option<PlistValue>,
    /// Whether the sprite was placed on the sheet rotated 90 degrees.
    pub rotated: bool,
    /// Trim offset, string or dictionary form. Carried, not applied.
    pub offset: Option<PlistValue>,
    /// Pre-trim sprite size, string or dictionary form. Carried, not applied.
    pub source_size: Option<PlistValue>,
}

/// A parsed manifest: named frame records in document order.
#[derive(Clone, Debug)]
pub struct Manifest {
    pub frames: Vec<(String, RawFrame)>,
}

/// Read and parse a manifest file.
pub fn parse_manifest(path: &Path) -> Result<Manifest, SheetsplitError> {
    let text = fs::read_to_string(path).map_err(SheetsplitError::Io)?;
    parse_manifest_str(&text, path)
}

/// Parse manifest text. `path` provides error context only.
pub fn parse_manifest_str(text: &str, path: &Path) -> Result<Manifest, SheetsplitError> {
    let document = plist::parse_plist_str(text, path)?;

    let frames_value = document
        .get("frames")
        .ok_or_else(|| SheetsplitError::MissingFrames {
            path: path.to_path_buf(),
        })?;
    let entries = frames_value
        .as_dict()
        .ok_or_else(|| SheetsplitError::MissingFrames {
            path: path.to_path_buf(),
        })?;

    let frames = entries
        .iter()
        .map(|(name, record)| (name.clone(), raw_frame_from_record(record)))
        .collect();

    Ok(Manifest { frames })
}

fn raw_frame_from_record(record: &PlistValue) -> RawFrame {
    RawFrame {
        frame: record.get("frame").cloned(),
        rotated: record
            .get("rotated")
            .and_then(PlistValue::as_bool)
            .unwrap_or(false),
        offset: record.get("offset").cloned(),
        source_size: record.get("sourceSize").cloned(),
    }
}
