use std::io::{Cursor, Write};

use image::{Rgba, RgbaImage};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Deterministic per-pixel pattern so misplaced crops show up as mismatches.
pub fn patterned(width: u32, height: u32, seed: u8) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            seed.wrapping_add(x as u8),
            seed.wrapping_add(y as u8),
            seed.wrapping_mul(3).wrapping_add((x ^ y) as u8),
            255,
        ])
    })
}

pub fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .expect("encode png");
    bytes
}

/// One string-dialect frame entry for a frames dict.
pub fn string_frame(name: &str, x: u32, y: u32, width: u32, height: u32, rotated: bool) -> String {
    let rotated_tag = if rotated { "<true/>" } else { "<false/>" };
    format!(
        "<key>{name}</key><dict>\
         <key>frame</key><string>{{{{{x},{y}}},{{{width},{height}}}}}</string>\
         <key>rotated</key>{rotated_tag}\
         <key>offset</key><string>{{0,0}}</string>\
         <key>sourceSize</key><string>{{{width},{height}}}</string>\
         </dict>"
    )
}

/// Wrap frame entries into a complete plist manifest document, including
/// the Apple DOCTYPE header real packers emit.
pub fn frames_plist(entries: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
         \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
         <plist version=\"1.0\"><dict>\
         <key>frames</key><dict>{entries}</dict>\
         <key>metadata</key><dict><key>format</key><integer>2</integer></dict>\
         </dict></plist>"
    )
}

/// Build an in-memory ZIP from `(entry name, bytes)` pairs.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, bytes) in entries {
        writer
            .start_file(name.to_string(), options)
            .expect("start zip entry");
        writer.write_all(bytes).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}
