use std::path::PathBuf;
use thiserror::Error;

/// The main error type for sheetsplit operations.
#[derive(Debug, Error)]
pub enum SheetsplitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse property list from {path}: {message}")]
    PlistParse { path: PathBuf, message: String },

    #[error("No 'frames' dictionary found in {path}")]
    MissingFrames { path: PathBuf },

    #[error("Failed to read archive {path}: {message}")]
    ArchiveRead { path: PathBuf, message: String },

    #[error("Failed to assemble output archive: {message}")]
    ArchiveWrite { message: String },

    #[error("Failed while traversing {path}: {message}")]
    DirWalk { path: PathBuf, message: String },

    #[error(
        "Archive must contain at least one .png and one .plist/.xml file \
         (found {png_count} image and {manifest_count} manifest candidates)"
    )]
    NoPairCandidates {
        png_count: usize,
        manifest_count: usize,
    },

    #[error("No matching sprite sheet pair in archive; the .png and .plist must share a base name")]
    NoMatchingPair,

    #[error("Sprite sheet and manifest must share a base name: '{image}' vs '{manifest}'")]
    BaseNameMismatch { image: String, manifest: String },

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Failed to decode sprite sheet image: {message}")]
    ImageDecode { message: String },

    #[error("Invalid geometry for frame '{name}': {message}")]
    FrameGeometry { name: String, message: String },

    #[error("Failed to extract sprite '{name}': {message}")]
    SpriteExtract { name: String, message: String },

    #[error("Failed to encode sprite '{name}' as PNG: {message}")]
    PngEncode { name: String, message: String },
}
