//! Outline parsing.
//!
//! The outline prompt asks for sections separated by `---`, each with a
//! bracketed title, a `Target:` line, and a `Description:` line. Models
//! follow that loosely, so parsing is tolerant: targets fall back to
//! defaults and malformed sections are dropped rather than failing the run.

use std::sync::OnceLock;

use regex::Regex;

use scriptforge_core::OutlineSection;

const DEFAULT_WORD_TARGET: &str = "~800 words";
const DEFAULT_PARAGRAPH_TARGET: &str = "~35 paragraphs";

fn words_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)~?\s*\d+\s*words").expect("words pattern must compile"))
}

fn paragraphs_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)~?\s*\d+\s*paragraphs").expect("paragraphs pattern must compile")
    })
}

fn description_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)description:").expect("description pattern must compile"))
}

/// Parse an outline response into sections, dropping malformed blocks.
pub fn parse_outline(text: &str) -> Vec<OutlineSection> {
    text.split("---")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .filter_map(parse_section)
        .collect()
}

fn parse_section(block: &str) -> Option<OutlineSection> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let title = lines
        .first()?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .to_string();
    if title.is_empty() {
        return None;
    }

    let mut word_target = DEFAULT_WORD_TARGET.to_string();
    let mut paragraph_target = DEFAULT_PARAGRAPH_TARGET.to_string();
    if let Some(target_line) = lines
        .iter()
        .find(|line| line.to_lowercase().contains("target:"))
    {
        if let Some(m) = words_pattern().find(target_line) {
            word_target = m.as_str().trim().to_string();
        }
        if let Some(m) = paragraphs_pattern().find(target_line) {
            paragraph_target = m.as_str().trim().to_string();
        }
    }

    let description_line = lines
        .iter()
        .find(|line| description_pattern().is_match(line))?;
    let description = description_pattern()
        .splitn(description_line, 2)
        .nth(1)?
        .trim()
        .to_string();

    Some(OutlineSection {
        title,
        word_target,
        paragraph_target,
        description,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
