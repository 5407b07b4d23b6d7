//! Sprite extraction: crop one frame out of the sheet and restore its
//! logical orientation.
//!
//! Packers that set the rotated flag place the sprite on the sheet turned
//! 90 degrees clockwise while the manifest keeps the pre-rotation
//! dimensions. The physical footprint therefore has width and height
//! swapped; the crop swaps them back and a 90-degree counter-clockwise turn
//! (`rotate270`) undoes the placement rotation.

use std::io::Cursor;

use image::{imageops, RgbaImage};

use crate::error::SheetsplitError;
use crate::manifest::geometry::SpriteFrame;

/// Crop (and if needed de-rotate) one sprite from the sheet.
///
/// The returned buffer always has the logical `width x height` dimensions.
/// A crop region outside the sheet is a [`SheetsplitError::SpriteExtract`]
/// failure; callers decide whether that aborts the run.
pub fn extract_sprite(
    sheet: &RgbaImage,
    name: &str,
    frame: &SpriteFrame,
) -> Result<RgbaImage, SheetsplitError> {
    let (crop_width, crop_height) = if frame.rotated {
        (frame.height, frame.width)
    } else {
        (frame.width, frame.height)
    };

    let (sheet_width, sheet_height) = sheet.dimensions();
    let right = u64::from(frame.x) + u64::from(crop_width);
    let bottom = u64::from(frame.y) + u64::from(crop_height);
    if right > u64::from(sheet_width) || bottom > u64::from(sheet_height) {
        return Err(SheetsplitError::SpriteExtract {
            name: name.to_string(),
            message: format!(
                "crop region {crop_width}x{crop_height}+{x}+{y} exceeds sheet bounds {sheet_width}x{sheet_height}",
                x = frame.x,
                y = frame.y,
            ),
        });
    }

    let cropped = imageops::crop_imm(sheet, frame.x, frame.y, crop_width, crop_height).to_image();

    Ok(if frame.rotated {
        imageops::rotate270(&cropped)
    } else {
        cropped
    })
}

/// Encode one extracted sprite as PNG bytes.
pub fn encode_png(sprite: &RgbaImage, name: &str) -> Result<Vec<u8>, SheetsplitError> {
    let mut bytes = Vec::new();
    sprite
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .map_err(|source| SheetsplitError::PngEncode {
            name: name.to_string(),
            message: source.to_string(),
        })?;
    Ok(bytes)
}
