//! Reinsertion of a managed key into a `skin.ini` section
//!
//! The rewrite is two-phase:
//!
//! 1. A single scan that inserts the key right after the anchor key, or right
//!    before the next section header if the target section ends without one.
//! 2. Only if phase 1 never inserted (the target section is the last one), a
//!    boundary fixup over the rebuilt lines: the key goes before the first
//!    bracketed line that closes the target section, or at the very end.
//!
//! If the section does not exist at all it is appended to the document.

use std::sync::OnceLock;

use regex::Regex;

use super::document::IniDocument;
use super::IniError;

/// Where the key line ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Directly after the anchor line, at line index
    AfterAnchor(usize),
    /// Directly before the header of the section following the target
    BeforeNextSection(usize),
    /// Directly before a bracketed non-header line found by the fixup pass
    BeforeBoundary(usize),
    /// Appended at the end of a target section that runs to end of file
    SectionEnd(usize),
    /// In a freshly appended section
    NewSection(usize),
}

impl Placement {
    /// Line index of the inserted key line
    pub fn line(&self) -> usize {
        match *self {
            Placement::AfterAnchor(i)
            | Placement::BeforeNextSection(i)
            | Placement::BeforeBoundary(i)
            | Placement::SectionEnd(i)
            | Placement::NewSection(i) => i,
        }
    }
}

/// Result of a patch, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Stale instances of the key that were stripped
    pub removed: usize,
    pub placement: Placement,
}

/// Key to (re)insert and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniPatch {
    pub section: String,
    pub key: String,
    pub anchor: String,
    pub value: String,
}

fn section_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\[([^\]]+)\]\s*$").expect("static regex"))
}

/// Name inside a `[name]` header line, if the line is exactly a header
fn section_name(line: &str) -> Option<&str> {
    section_header().captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn key_pattern(key: &str) -> Result<Regex, IniError> {
    Regex::new(&format!(r"(?i)^\s*{}\s*:", regex::escape(key)))
        .map_err(|e| IniError::Pattern(e.to_string()))
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Push a line, first terminating an unterminated predecessor
fn push_line(lines: &mut Vec<String>, line: String) {
    terminate_last(lines);
    lines.push(line);
}

fn terminate_last(lines: &mut [String]) {
    if let Some(last) = lines.last_mut() {
        if !last.ends_with('\n') {
            last.push('\n');
        }
    }
}

impl IniPatch {
    /// `HitCircleOverlap: <value>` after `HitCirclePrefix` in `[Fonts]`
    pub fn hit_circle_overlap(value: impl Into<String>) -> Self {
        Self {
            section: "Fonts".to_string(),
            key: "HitCircleOverlap".to_string(),
            anchor: "HitCirclePrefix".to_string(),
            value: value.into(),
        }
    }

    fn key_line(&self, indent: &str) -> String {
        format!("{}{}: {}\n", indent, self.key, self.value)
    }

    fn is_target(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.section)
    }

    /// Apply the patch to a document in place.
    pub fn apply(&self, doc: &mut IniDocument) -> Result<PatchOutcome, IniError> {
        let key_re = key_pattern(&self.key)?;
        let anchor_re = key_pattern(&self.anchor)?;

        let before = doc.lines.len();
        doc.lines.retain(|line| !key_re.is_match(line));
        let removed = before - doc.lines.len();

        let mut out: Vec<String> = Vec::with_capacity(doc.lines.len() + 3);
        let mut in_target = false;
        let mut target_seen = false;
        let mut placement = None;

        for line in doc.lines.drain(..) {
            if let Some(name) = section_name(&line) {
                if in_target && placement.is_none() {
                    placement = Some(Placement::BeforeNextSection(out.len()));
                    push_line(&mut out, self.key_line(""));
                }
                in_target = self.is_target(name);
                target_seen |= in_target;
                out.push(line);
                continue;
            }

            if in_target && placement.is_none() && anchor_re.is_match(&line) {
                let indent = format!("{}\t", leading_whitespace(&line));
                out.push(line);
                placement = Some(Placement::AfterAnchor(out.len()));
                push_line(&mut out, self.key_line(&indent));
                continue;
            }

            out.push(line);
        }

        let placement = match placement {
            Some(p) => p,
            None if !target_seen => {
                push_line(&mut out, "\n".to_string());
                out.push(format!("[{}]\n", self.section));
                out.push(self.key_line("\t"));
                Placement::NewSection(out.len() - 1)
            }
            None => self.insert_at_section_boundary(&mut out),
        };

        doc.lines = out;
        Ok(PatchOutcome { removed, placement })
    }

    /// Fixup pass for a target section that phase 1 left without the key.
    fn insert_at_section_boundary(&self, lines: &mut Vec<String>) -> Placement {
        let mut in_target = false;
        let mut boundary = None;

        for (i, line) in lines.iter().enumerate() {
            if let Some(name) = section_name(line) {
                in_target = self.is_target(name);
                continue;
            }
            if in_target && line.trim_start().starts_with('[') {
                boundary = Some(i);
                break;
            }
        }

        match boundary {
            Some(i) => {
                lines.insert(i, self.key_line(""));
                Placement::BeforeBoundary(i)
            }
            None => {
                push_line(lines, self.key_line(""));
                Placement::SectionEnd(lines.len() - 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch_text(input: &str, value: &str) -> (String, PatchOutcome) {
        let mut doc = IniDocument::from_bytes(input.as_bytes());
        let outcome = IniPatch::hit_circle_overlap(value).apply(&mut doc).unwrap();
        (doc.text(), outcome)
    }

    #[test]
    fn test_insert_after_anchor() {
        let (out, outcome) = patch_text("[Fonts]\nHitCirclePrefix: default\n", "160");
        assert_eq!(out, "[Fonts]\nHitCirclePrefix: default\n\tHitCircleOverlap: 160\n");
        assert_eq!(outcome.placement, Placement::AfterAnchor(2));
    }

    #[test]
    fn test_anchor_indent_is_mirrored() {
        let input = "[Fonts]\r\n    HitCirclePrefix: num\r\n    ScorePrefix: score\r\n";
        let (out, _) = patch_text(input, "120");
        assert_eq!(
            out,
            "[Fonts]\r\n    HitCirclePrefix: num\r\n    \tHitCircleOverlap: 120\n    ScorePrefix: score\r\n"
        );
    }

    #[test]
    fn test_empty_document_gets_section() {
        let (out, outcome) = patch_text("", "160");
        assert_eq!(out, "\n[Fonts]\n\tHitCircleOverlap: 160\n");
        assert_eq!(outcome.placement, Placement::NewSection(2));
    }

    #[test]
    fn test_section_appended_after_other_sections() {
        let (out, _) = patch_text("[General]\nName: test\n", "160");
        assert_eq!(out, "[General]\nName: test\n\n[Fonts]\n\tHitCircleOverlap: 160\n");
    }

    #[test]
    fn test_unterminated_last_line_before_new_section() {
        let (out, _) = patch_text("[General]\nName: test", "160");
        assert_eq!(out, "[General]\nName: test\n\n[Fonts]\n\tHitCircleOverlap: 160\n");
    }

    #[test]
    fn test_unterminated_anchor_line() {
        let (out, _) = patch_text("[Fonts]\nHitCirclePrefix: default", "160");
        assert_eq!(out, "[Fonts]\nHitCirclePrefix: default\n\tHitCircleOverlap: 160\n");
    }

    #[test]
    fn test_no_anchor_inserts_before_next_section() {
        let input = "[Fonts]\nScorePrefix: score\n[Colours]\nCombo1: 255,0,0\n";
        let (out, outcome) = patch_text(input, "160");
        assert_eq!(
            out,
            "[Fonts]\nScorePrefix: score\nHitCircleOverlap: 160\n[Colours]\nCombo1: 255,0,0\n"
        );
        assert_eq!(outcome.placement, Placement::BeforeNextSection(2));
    }

    #[test]
    fn test_last_section_without_anchor_appends_at_end() {
        let input = "[General]\nName: x\n[Fonts]\nScorePrefix: score\n";
        let (out, outcome) = patch_text(input, "160");
        assert_eq!(out, "[General]\nName: x\n[Fonts]\nScorePrefix: score\nHitCircleOverlap: 160\n");
        assert_eq!(outcome.placement, Placement::SectionEnd(4));
    }

    #[test]
    fn test_fixup_pass_stops_at_bracketed_line() {
        let input = "[Fonts]\nScorePrefix: score\n[Broken\nComboPrefix: combo\n";
        let (out, outcome) = patch_text(input, "160");
        assert_eq!(
            out,
            "[Fonts]\nScorePrefix: score\nHitCircleOverlap: 160\n[Broken\nComboPrefix: combo\n"
        );
        assert_eq!(outcome.placement, Placement::BeforeBoundary(2));
    }

    #[test]
    fn test_header_with_trailing_text_is_not_a_section() {
        let input = "[Fonts] ; fonts\nHitCirclePrefix: default\n";
        let (out, outcome) = patch_text(input, "160");
        assert!(matches!(outcome.placement, Placement::NewSection(_)));
        assert!(out.starts_with(input));
    }

    #[test]
    fn test_section_match_is_case_insensitive() {
        let (out, _) = patch_text("[fonts]\nhitcircleprefix: x\n", "160");
        assert_eq!(out, "[fonts]\nhitcircleprefix: x\n\tHitCircleOverlap: 160\n");
    }

    #[test]
    fn test_strays_removed_everywhere() {
        let input = "[General]\nhitcircleoverlap : 3\n[Fonts]\nHitCircleOverlap: 5\nHitCirclePrefix: default\n";
        let (out, outcome) = patch_text(input, "160");
        assert_eq!(outcome.removed, 2);
        assert_eq!(
            out,
            "[General]\n[Fonts]\nHitCirclePrefix: default\n\tHitCircleOverlap: 160\n"
        );
    }

    #[test]
    fn test_first_target_section_is_canonical() {
        let input = "[Fonts]\nScorePrefix: a\n[Fonts]\nHitCirclePrefix: b\n";
        let (out, _) = patch_text(input, "160");
        assert_eq!(out.matches("HitCircleOverlap").count(), 1);
        assert_eq!(
            out,
            "[Fonts]\nScorePrefix: a\nHitCircleOverlap: 160\n[Fonts]\nHitCirclePrefix: b\n"
        );
    }

    #[test]
    fn test_patch_is_idempotent_in_key_count() {
        let mut doc = IniDocument::from_bytes(b"[General]\nName: x\n[Fonts]\nHitCirclePrefix: d\n");
        IniPatch::hit_circle_overlap("140").apply(&mut doc).unwrap();
        let first = doc.text();
        let outcome = IniPatch::hit_circle_overlap("160").apply(&mut doc).unwrap();
        assert_eq!(outcome.removed, 1);
        let second = doc.text();
        assert_eq!(second.matches("HitCircleOverlap").count(), 1);
        assert!(second.contains("HitCircleOverlap: 160\n"));
        assert_eq!(first.replace("140", "160"), second);
    }

    #[test]
    fn test_key_prefix_lookalike_is_kept() {
        let (out, outcome) = patch_text("[Fonts]\nHitCircleOverlapX: 1\n", "160");
        assert_eq!(outcome.removed, 0);
        assert!(out.contains("HitCircleOverlapX: 1\n"));
    }
}
