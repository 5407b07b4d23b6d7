//! Frame geometry resolution.
//!
//! Manifests come in two dialects. Older packers encode rectangles as
//! strings like `{{2,2},{64,32}}`; newer ones use dictionaries with `x`,
//! `y`, `w`, `h` entries. Both normalize into one [`SpriteFrame`] per
//! sprite. Resolution never consults the sheet; bounds are checked at crop
//! time by the extractor.

use crate::error::SheetsplitError;
use crate::manifest::RawFrame;
use crate::plist::PlistValue;

/// Signed point, used for trim offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePoint {
    pub x: i32,
    pub y: i32,
}

/// Unsigned size, used for the pre-trim source size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// One sprite's normalized geometry.
///
/// `x`, `y`, `width` and `height` describe the logical (unrotated) sprite.
/// When `rotated` is set, the physical footprint on the sheet has width and
/// height swapped; the extractor accounts for that. `offset` and
/// `source_size` record the packer's trim data but are not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteFrame {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub rotated: bool,
    pub offset: FramePoint,
    pub source_size: FrameSize,
}

/// Normalize one raw frame record.
///
/// Fails with [`SheetsplitError::FrameGeometry`] when the rectangle is
/// missing, malformed, or neither a string nor a dictionary. Callers treat
/// that as a per-frame skip, not a fatal error.
pub fn resolve_frame(name: &str, raw: &RawFrame) -> Result<SpriteFrame, SheetsplitError> {
    let rect = raw
        .frame
        .as_ref()
        .ok_or_else(|| geometry_error(name, "missing frame rectangle".to_string()))?;

    let (x, y, width, height) = match rect {
        PlistValue::String(text) => {
            let parts = parse_braced_ints(text).map_err(|message| geometry_error(name, message))?;
            if parts.len() != 4 {
                return Err(geometry_error(
                    name,
                    format!("expected 4 rectangle components in '{text}', got {}", parts.len()),
                ));
            }
            (parts[0], parts[1], parts[2], parts[3])
        }
        PlistValue::Dict(_) => (
            dict_int(rect, "x", name)?,
            dict_int(rect, "y", name)?,
            dict_int(rect, "w", name)?,
            dict_int(rect, "h", name)?,
        ),
        other => {
            return Err(geometry_error(
                name,
                format!("frame rectangle is neither a string nor a dictionary: {other:?}"),
            ));
        }
    };

    let x = non_negative(x, "x", name)?;
    let y = non_negative(y, "y", name)?;
    let width = positive(width, "width", name)?;
    let height = positive(height, "height", name)?;

    let offset = resolve_offset(raw.offset.as_ref(), name)?;
    let source_size = resolve_source_size(raw.source_size.as_ref(), name, width, height)?;

    Ok(SpriteFrame {
        x,
        y,
        width,
        height,
        rotated: raw.rotated,
        offset,
        source_size,
    })
}

fn resolve_offset(
    offset: Option<&PlistValue>,
    name: &str,
) -> Result<FramePoint, SheetsplitError> {
    match offset {
        None => Ok(FramePoint { x: 0, y: 0 }),
        Some(PlistValue::String(text)) => {
            let parts = parse_braced_ints(text).map_err(|message| geometry_error(name, message))?;
            if parts.len() != 2 {
                return Err(geometry_error(
                    name,
                    format!("expected 2 offset components in '{text}', got {}", parts.len()),
                ));
            }
            Ok(FramePoint {
                x: offset_component(parts[0], "x", name)?,
                y: offset_component(parts[1], "y", name)?,
            })
        }
        Some(value @ PlistValue::Dict(_)) => Ok(FramePoint {
            x: offset_component(
                value.get("x").and_then(PlistValue::as_i64).unwrap_or(0),
                "x",
                name,
            )?,
            y: offset_component(
                value.get("y").and_then(PlistValue::as_i64).unwrap_or(0),
                "y",
                name,
            )?,
        }),
        Some(other) => Err(geometry_error(
            name,
            format!("offset is neither a string nor a dictionary: {other:?}"),
        )),
    }
}

fn resolve_source_size(
    source_size: Option<&PlistValue>,
    name: &str,
    frame_width: u32,
    frame_height: u32,
) -> Result<FrameSize, SheetsplitError> {
    match source_size {
        None => Ok(FrameSize {
            width: frame_width,
            height: frame_height,
        }),
        Some(PlistValue::String(text)) => {
            let parts = parse_braced_ints(text).map_err(|message| geometry_error(name, message))?;
            if parts.len() != 2 {
                return Err(geometry_error(
                    name,
                    format!(
                        "expected 2 sourceSize components in '{text}', got {}",
                        parts.len()
                    ),
                ));
            }
            Ok(FrameSize {
                width: non_negative(parts[0], "sourceSize width", name)?,
                height: non_negative(parts[1], "sourceSize height", name)?,
            })
        }
        Some(value @ PlistValue::Dict(_)) => {
            let width = value
                .get("width")
                .and_then(PlistValue::as_i64)
                .unwrap_or(i64::from(frame_width));
            let height = value
                .get("height")
                .and_then(PlistValue::as_i64)
                .unwrap_or(i64::from(frame_height));
            Ok(FrameSize {
                width: non_negative(width, "sourceSize width", name)?,
                height: non_negative(height, "sourceSize height", name)?,
            })
        }
        Some(other) => Err(geometry_error(
            name,
            format!("sourceSize is neither a string nor a dictionary: {other:?}"),
        )),
    }
}

/// Parse `{{2,2},{64,32}}`-style strings: strip braces and spaces, split on
/// commas, parse each component as an integer (fractional values truncate).
fn parse_braced_ints(raw: &str) -> Result<Vec<i64>, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | ' '))
        .collect();

    cleaned
        .split(',')
        .map(|part| {
            part.parse::<i64>()
                .or_else(|_| part.parse::<f64>().map(|value| value as i64))
                .map_err(|_| format!("invalid integer '{part}' in '{raw}'"))
        })
        .collect()
}

fn dict_int(rect: &PlistValue, key: &str, name: &str) -> Result<i64, SheetsplitError> {
    rect.get(key)
        .and_then(PlistValue::as_i64)
        .ok_or_else(|| geometry_error(name, format!("frame rectangle missing numeric '{key}'")))
}

fn offset_component(value: i64, field: &str, name: &str) -> Result<i32, SheetsplitError> {
    i32::try_from(value).map_err(|_| {
        geometry_error(name, format!("offset {field} out of range, got {value}"))
    })
}

fn non_negative(value: i64, field: &str, name: &str) -> Result<u32, SheetsplitError> {
    u32::try_from(value)
        .map_err(|_| geometry_error(name, format!("{field} must be non-negative, got {value}")))
}

fn positive(value: i64, field: &str, name: &str) -> Result<u32, SheetsplitError> {
    if value <= 0 {
        return Err(geometry_error(
            name,
            format!("{field} must be positive, got {value}"),
        ));
    }
    non_negative(value, field, name)
}

fn geometry_error(name: &str, message: String) -> SheetsplitError {
    SheetsplitError::FrameGeometry {
        name: name.to_string(),
        message,
    }
}
