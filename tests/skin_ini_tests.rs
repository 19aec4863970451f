//! Integration tests for skin.ini patching
//!
//! Exercise `patch_skin_ini` against real files in each supported encoding.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use triplestack::skin_ini::{patch_skin_ini, IniDocument, IniPatch, Placement, TextEncoding, SKIN_INI};

const SAMPLE: &str = "[General]\r\n\
Name: Triple\r\n\
Author: Ren\u{e9}e  \r\n\
\r\n\
[Colours]\r\n\
Combo1: 255,128,0\r\n\
\r\n\
[Fonts]\r\n\
\tHitCirclePrefix: default\r\n\
\tScorePrefix: score\r\n";

fn encode(encoding: TextEncoding, text: &str) -> Vec<u8> {
    let mut raw = match encoding {
        TextEncoding::Utf16Le => vec![0xFF, 0xFE],
        TextEncoding::Utf16Be => vec![0xFE, 0xFF],
        TextEncoding::Latin1 => Vec::new(),
    };
    raw.extend(encoding.encode(text));
    raw
}

fn patch_file(dir: &Path, raw: &[u8], value: &str) -> Vec<u8> {
    let path = dir.join(SKIN_INI);
    fs::write(&path, raw).expect("should write skin.ini");
    patch_skin_ini(dir, &IniPatch::hit_circle_overlap(value)).expect("patch should succeed");
    fs::read(&path).expect("should read skin.ini")
}

#[test]
fn test_encoding_and_bom_preserved_for_all_encodings() {
    for encoding in [TextEncoding::Utf16Le, TextEncoding::Utf16Be, TextEncoding::Latin1] {
        let temp = TempDir::new().expect("should create temp dir");
        let raw = encode(encoding, SAMPLE);
        let written = patch_file(temp.path(), &raw, "160");

        let doc = IniDocument::from_bytes(&written);
        assert_eq!(doc.encoding, encoding, "{:?}", encoding);
        let bom_len = if encoding == TextEncoding::Latin1 { 0 } else { 2 };
        assert_eq!(doc.bom, raw[..bom_len]);

        let expected = SAMPLE.replace(
            "\tHitCirclePrefix: default\r\n",
            "\tHitCirclePrefix: default\r\n\t\tHitCircleOverlap: 160\n",
        );
        assert_eq!(written, encode(encoding, &expected), "{:?}", encoding);
    }
}

#[test]
fn test_repeated_runs_keep_one_key() {
    let temp = TempDir::new().expect("should create temp dir");
    let raw = encode(TextEncoding::Utf16Le, SAMPLE);
    patch_file(temp.path(), &raw, "140");
    patch_skin_ini(temp.path(), &IniPatch::hit_circle_overlap("160")).unwrap();
    patch_skin_ini(temp.path(), &IniPatch::hit_circle_overlap("150")).unwrap();

    let text = IniDocument::from_bytes(&fs::read(temp.path().join(SKIN_INI)).unwrap()).text();
    assert_eq!(text.matches("HitCircleOverlap").count(), 1);
    assert!(text.contains("\t\tHitCircleOverlap: 150\n"));
}

#[test]
fn test_stray_keys_removed_and_reinserted_after_anchor() {
    let temp = TempDir::new().expect("should create temp dir");
    let input = "[General]\nHitCircleOverlap: 3\n\n[Fonts]\nHitCircleOverlap: 99\nHitCirclePrefix: num\n";
    let written = patch_file(temp.path(), input.as_bytes(), "160");
    assert_eq!(
        String::from_utf8(written).unwrap(),
        "[General]\n\n[Fonts]\nHitCirclePrefix: num\n\tHitCircleOverlap: 160\n"
    );
}

#[test]
fn test_missing_file_created() {
    let temp = TempDir::new().expect("should create temp dir");
    let outcome = patch_skin_ini(temp.path(), &IniPatch::hit_circle_overlap("160")).unwrap();
    assert_eq!(outcome.placement, Placement::NewSection(2));
    assert_eq!(fs::read(temp.path().join(SKIN_INI)).unwrap(), b"\n[Fonts]\n\tHitCircleOverlap: 160\n");
}

#[test]
fn test_unrelated_lines_untouched() {
    let temp = TempDir::new().expect("should create temp dir");
    let input = "; comment  \n[General]\n  Name:   spaced   \r\n\t\n[Fonts]\nScorePrefix: s\n[Mania]\nKeys: 4\n";
    let written = String::from_utf8(patch_file(temp.path(), input.as_bytes(), "160")).unwrap();
    assert_eq!(
        written,
        "; comment  \n[General]\n  Name:   spaced   \r\n\t\n[Fonts]\nScorePrefix: s\nHitCircleOverlap: 160\n[Mania]\nKeys: 4\n"
    );
}
