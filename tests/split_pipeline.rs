//! End-to-end tests for the split pipeline: archive and dual-file inputs,
//! frame skip/abort behavior, and output archive contents.

mod common;

use std::fs;
use std::path::Path;

use image::imageops;
use image::RgbaImage;

use sheetsplit::error::SheetsplitError;
use sheetsplit::pipeline::{
    self, read_archive_entries, FailurePolicy, SplitOptions,
};

use common::{frames_plist, patterned, png_bytes, string_frame, zip_bytes};

fn default_options() -> SplitOptions {
    SplitOptions::default()
}

#[test]
fn unrotated_frame_round_trips_exactly() {
    let patch = patterned(16, 8, 5);
    let mut sheet = RgbaImage::new(64, 64);
    imageops::replace(&mut sheet, &patch, 5, 7);

    let manifest = frames_plist(&string_frame("hero", 5, 7, 16, 8, false));
    let archive = pipeline::split_sheet(
        &png_bytes(&sheet),
        &manifest,
        Path::new("hero.plist"),
        &default_options(),
    )
    .expect("split sheet");

    let entries = read_archive_entries(&archive).expect("read output");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "hero.png");

    let decoded = image::load_from_memory(&entries[0].1)
        .expect("decode sprite")
        .to_rgba8();
    assert_eq!(decoded, patch);
}

#[test]
fn rotated_frame_is_restored_upright() {
    // The packer stores the sprite rotated 90 degrees clockwise, so the
    // 24x10 logical sprite occupies a 10x24 footprint on the sheet.
    let patch = patterned(24, 10, 11);
    let placed = imageops::rotate90(&patch);
    let mut sheet = RgbaImage::new(48, 48);
    imageops::replace(&mut sheet, &placed, 12, 6);

    let manifest = frames_plist(&string_frame("spin", 12, 6, 24, 10, true));
    let archive = pipeline::split_sheet(
        &png_bytes(&sheet),
        &manifest,
        Path::new("spin.plist"),
        &default_options(),
    )
    .expect("split sheet");

    let entries = read_archive_entries(&archive).expect("read output");
    let decoded = image::load_from_memory(&entries[0].1)
        .expect("decode sprite")
        .to_rgba8();
    assert_eq!(decoded.dimensions(), (24, 10));
    assert_eq!(decoded, patch);
}

#[test]
fn object_dialect_rectangles_are_supported() {
    let patch = patterned(12, 12, 20);
    let mut sheet = RgbaImage::new(32, 32);
    imageops::replace(&mut sheet, &patch, 8, 8);

    let manifest = frames_plist(
        "<key>gem</key><dict>\
         <key>frame</key><dict>\
         <key>x</key><integer>8</integer>\
         <key>y</key><integer>8</integer>\
         <key>w</key><integer>12</integer>\
         <key>h</key><integer>12</integer>\
         </dict></dict>",
    );
    let archive = pipeline::split_sheet(
        &png_bytes(&sheet),
        &manifest,
        Path::new("gem.plist"),
        &default_options(),
    )
    .expect("split sheet");

    let entries = read_archive_entries(&archive).expect("read output");
    assert_eq!(entries[0].0, "gem.png");
    let decoded = image::load_from_memory(&entries[0].1)
        .expect("decode sprite")
        .to_rgba8();
    assert_eq!(decoded, patch);
}

#[test]
fn output_entries_follow_manifest_order() {
    let sheet = patterned(64, 64, 1);
    let entries_xml = [
        string_frame("zebra", 0, 0, 8, 8, false),
        string_frame("apple", 8, 0, 8, 8, false),
        string_frame("mango", 16, 0, 8, 8, false),
    ]
    .concat();

    let archive = pipeline::split_sheet(
        &png_bytes(&sheet),
        &frames_plist(&entries_xml),
        Path::new("sheet.plist"),
        &default_options(),
    )
    .expect("split sheet");

    let names: Vec<String> = read_archive_entries(&archive)
        .expect("read output")
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, ["zebra.png", "apple.png", "mango.png"]);
}

#[test]
fn malformed_rectangle_is_skipped_but_out_of_bounds_aborts() {
    let sheet = patterned(32, 32, 7);

    // Malformed rectangle: skipped with a warning, run continues.
    let skip_manifest = frames_plist(&format!(
        "<key>bad</key><dict><key>frame</key><integer>3</integer></dict>{}",
        string_frame("good", 0, 0, 8, 8, false)
    ));
    let archive = pipeline::split_sheet(
        &png_bytes(&sheet),
        &skip_manifest,
        Path::new("sheet.plist"),
        &default_options(),
    )
    .expect("split sheet");
    let names: Vec<String> = read_archive_entries(&archive)
        .expect("read output")
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, ["good.png"]);

    // Resolvable but out-of-bounds rectangle: the whole run fails, no
    // archive is produced even though another frame was extractable.
    let abort_manifest = frames_plist(&format!(
        "{}{}",
        string_frame("good", 0, 0, 8, 8, false),
        string_frame("oob", 30, 30, 16, 16, false)
    ));
    let err = pipeline::split_sheet(
        &png_bytes(&sheet),
        &abort_manifest,
        Path::new("sheet.plist"),
        &default_options(),
    )
    .unwrap_err();
    assert!(matches!(err, SheetsplitError::SpriteExtract { .. }));
}

#[test]
fn skip_policy_turns_extraction_failures_into_skips() {
    let sheet = patterned(32, 32, 7);
    let manifest = frames_plist(&format!(
        "{}{}",
        string_frame("oob", 30, 30, 16, 16, false),
        string_frame("good", 0, 0, 8, 8, false)
    ));

    let options = SplitOptions {
        extract_failures: FailurePolicy::Skip,
    };
    let archive = pipeline::split_sheet(
        &png_bytes(&sheet),
        &manifest,
        Path::new("sheet.plist"),
        &options,
    )
    .expect("split sheet");

    let names: Vec<String> = read_archive_entries(&archive)
        .expect("read output")
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, ["good.png"]);
}

#[test]
fn missing_frames_key_fails_the_request() {
    let sheet = patterned(16, 16, 2);
    let err = pipeline::split_sheet(
        &png_bytes(&sheet),
        "<plist><dict><key>metadata</key><dict/></dict></plist>",
        Path::new("sheet.plist"),
        &default_options(),
    )
    .unwrap_err();
    assert!(matches!(err, SheetsplitError::MissingFrames { .. }));
}

#[test]
fn undecodable_sheet_fails_the_request() {
    let manifest = frames_plist(&string_frame("hero", 0, 0, 4, 4, false));
    let err = pipeline::split_sheet(
        b"not a png",
        &manifest,
        Path::new("sheet.plist"),
        &default_options(),
    )
    .unwrap_err();
    assert!(matches!(err, SheetsplitError::ImageDecode { .. }));
}

#[test]
fn archive_input_pairs_nested_files_by_base_name() {
    let patch = patterned(8, 8, 4);
    let mut sheet = RgbaImage::new(32, 32);
    imageops::replace(&mut sheet, &patch, 2, 2);
    let manifest = frames_plist(&string_frame("coin", 2, 2, 8, 8, false));

    let sheet_png = png_bytes(&sheet);
    let input = zip_bytes(&[
        ("readme.txt", b"decoy".as_slice()),
        ("art/sheets/coins.png", sheet_png.as_slice()),
        ("meta/coins.plist", manifest.as_bytes()),
    ]);

    let archive = pipeline::split_archive_bytes(&input, &default_options()).expect("split archive");
    let entries = read_archive_entries(&archive).expect("read output");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "coin.png");

    let decoded = image::load_from_memory(&entries[0].1)
        .expect("decode sprite")
        .to_rgba8();
    assert_eq!(decoded, patch);
}

#[test]
fn archive_without_candidates_fails() {
    let input = zip_bytes(&[("readme.txt", b"no sprites here".as_slice())]);
    let err = pipeline::split_archive_bytes(&input, &default_options()).unwrap_err();
    assert!(matches!(err, SheetsplitError::NoPairCandidates { .. }));
}

#[test]
fn archive_with_mismatched_base_names_fails() {
    let sheet = patterned(8, 8, 1);
    let manifest = frames_plist(&string_frame("coin", 0, 0, 4, 4, false));
    let sheet_png = png_bytes(&sheet);
    let input = zip_bytes(&[
        ("sheet.png", sheet_png.as_slice()),
        ("other.plist", manifest.as_bytes()),
    ]);

    let err = pipeline::split_archive_bytes(&input, &default_options()).unwrap_err();
    assert!(matches!(err, SheetsplitError::NoMatchingPair));
}

#[test]
fn dual_files_require_equal_base_names() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let patch = patterned(8, 8, 6);
    let mut sheet = RgbaImage::new(16, 16);
    imageops::replace(&mut sheet, &patch, 0, 0);
    let manifest = frames_plist(&string_frame("dot", 0, 0, 8, 8, false));

    let image_path = temp.path().join("sprite.png");
    let matching_manifest = temp.path().join("sprite.plist");
    let mismatched_manifest = temp.path().join("other.plist");
    fs::write(&image_path, png_bytes(&sheet)).expect("write sheet");
    fs::write(&matching_manifest, &manifest).expect("write manifest");
    fs::write(&mismatched_manifest, &manifest).expect("write manifest");

    let archive = pipeline::split_pair(&image_path, &matching_manifest, &default_options())
        .expect("split pair");
    let entries = read_archive_entries(&archive).expect("read output");
    assert_eq!(entries[0].0, "dot.png");

    let err =
        pipeline::split_pair(&image_path, &mismatched_manifest, &default_options()).unwrap_err();
    assert!(matches!(err, SheetsplitError::BaseNameMismatch { .. }));
}
