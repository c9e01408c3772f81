//! Prompt assembly for the story pipeline.
//!
//! Four builders: outline, per-part script, reference character, and
//! character analysis. The outline prompt dictates the `---`-separated
//! format that [`crate::outline::parse_outline`] expects; keep the two in
//! sync when changing either.

use scriptforge_core::{CharacterProfile, OutlineSection, Prompt, ScriptPart};

/// How many prior parts are replayed as context for the next part.
const CONTEXT_PARTS: usize = 2;

fn character_note(character: Option<&CharacterProfile>) -> String {
    match character.and_then(|c| c.summary()) {
        Some(summary) => format!(
            "\n\nThe protagonist has the following characteristics: {}. \
             Ensure the story respects these details.",
            summary
        ),
        None => String::new(),
    }
}

/// Prompt for the five-part outline.
pub fn outline(idea: &str, character: Option<&CharacterProfile>, language: &str) -> Prompt {
    let text = format!(
        "You are an expert storyteller. Create a compelling story outline in {lang} \
based on the idea below. The story revolves around an underestimated character with an \
extraordinary talent who overcomes prejudice, and it must evoke surprise, suspense, and \
satisfaction.

STORY IDEA: \"{idea}\"{character}

Create a detailed outline with exactly 5 parts, in this order: the shocking opening hook, \
raising the stakes, an unexpected twist, the public climax, and a meaningful ending.

Output format rules:
1. The entire outline, including titles and descriptions, must be in {lang}.
2. The word count for each section must be between 700 and 1000 words, with paragraph \
counts based on 22-24 words per paragraph.
3. The output must strictly follow this shape, using \"---\" to separate sections, with \
no other text before or after:

[Part 1 Title]
Target: ~800 words / ~35 paragraphs
Description: [Brief description for Part 1]
---
[Part 2 Title]
Target: ~900 words / ~38 paragraphs
Description: [Brief description for Part 2]
---
...and so on for all 5 parts.",
        lang = language.to_uppercase(),
        idea = idea,
        character = character_note(character),
    );
    Prompt::simple(text)
}

/// System/user prompt pair for one script part.
///
/// Context is bounded: only the last two completed parts are replayed, not
/// the full history, to keep the prompt size flat as the script grows.
pub fn script_part(
    idea: &str,
    outline: &[OutlineSection],
    prior_parts: &[ScriptPart],
    index: usize,
    character: Option<&CharacterProfile>,
    language: &str,
) -> Prompt {
    let section = &outline[index];
    let lang = language.to_uppercase();

    let mut system = format!(
        "You are an elite storyteller writing one part of a narrated story, following \
the outline and section details you are given.{character}

Critical requirements:
1. The entire script must be in {lang}.
2. Every paragraph must be strictly between 22 and 24 words long, with no exceptions. \
Review every paragraph before finalizing.
3. Do not number paragraphs; separate them with a single blank line.
4. Start with a header line `[SECTION TITLE] – Part X (word count/paragraph count)` and \
end with a footer line `Word count: [X] | Paragraphs: [Y]`, translated into {lang} if it \
is not English.
5. Show, don't tell: reveal emotion through action and sensory detail. Keep the pacing \
fast, give every part its own conflict, and end each part with a bridge that builds \
anticipation for the next.",
        character = character_note(character),
        lang = lang,
    );
    if index == 0 {
        system.push_str(
            "\n\nThis is the beginning of the story: open with an exceptionally \
compelling hook in the first few paragraphs.",
        );
    } else if index + 1 == outline.len() {
        system.push_str(
            "\n\nThis is the end of the story: conclude the narrative with a clear, \
meaningful lesson in the final paragraphs.",
        );
    }

    let outline_listing = outline
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "Part {}: {} ({} / {}) - {}",
                i + 1,
                s.title,
                s.word_target,
                s.paragraph_target,
                s.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let context = prior_parts[index.saturating_sub(CONTEXT_PARTS)..index]
        .iter()
        .map(|part| part.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");
    let context = if context.is_empty() {
        "This is the first part, so there is no previous context.".to_string()
    } else {
        context
    };

    let user = format!(
        "STORY IDEA: \"{idea}\"

FULL STORY OUTLINE:
{outline_listing}

CONTEXT FROM PREVIOUS PARTS:
{context}

CURRENT TASK:
Write the script for Part {number}: {title}.
- Description for this part: \"{description}\".
- Target: approximately {words} words / {paragraphs} paragraphs.
- Remember every critical requirement, especially the strict 22-24 word count per \
paragraph and the absence of paragraph numbering.",
        idea = idea,
        outline_listing = outline_listing,
        context = context,
        number = index + 1,
        title = section.title,
        description = section.description,
        words = section.word_count(),
        paragraphs = section.paragraph_count(),
    );

    Prompt::system_user(system, user)
}

/// Prompt for a visual reference description of the main character.
pub fn reference_character(idea: &str, language: &str) -> Prompt {
    let text = format!(
        "You are a character concept artist creating a visual reference for an image \
generation model. Based on the story idea below, describe the main character in \
{lang}: nationality, age, skin color, hair style and color, shirt, and pants, each on \
its own labeled line. Close with a 2-3 sentence justification connecting the design to \
the story's theme.

STORY IDEA: \"{idea}\"",
        lang = language.to_uppercase(),
        idea = idea,
    );
    Prompt::simple(text)
}

/// System/user prompt pair for analyzing every character in a finished script.
pub fn character_analysis(full_script: &str, language: &str) -> Prompt {
    let system = format!(
        "You are a character profiler. Read the provided script and produce a physical \
description of every character, in {lang}, for use by an image generation model.

For each character output exactly two lines: a Markdown heading with the character's \
name, then one comma-separated line with these attributes in order: nationality, age, \
height, build, skin color, hair style, hair color, shirt, pants. Infer missing details \
from the character's context rather than leaving them out. Do not add personality or \
role information.",
        lang = language.to_uppercase(),
    );
    let user = format!(
        "SCRIPT TO ANALYZE:
---
{script}
---

Provide the character analysis now, with no text before or after it.",
        script = full_script,
    );
    Prompt::system_user(system, user)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_outline() -> Vec<OutlineSection> {
        (1..=4)
            .map(|i| OutlineSection {
                title: format!("Part {i} Title"),
                word_target: "~800 words".to_string(),
                paragraph_target: "~35 paragraphs".to_string(),
                description: format!("Events of part {i}."),
            })
            .collect()
    }

    #[test]
    fn test_outline_prompt_carries_idea_and_language() {
        let prompt = outline("a janitor who fences", None, "english");
        let text = prompt.user_text();
        assert!(text.contains("a janitor who fences"));
        assert!(text.contains("ENGLISH"));
        assert!(text.contains("---"));
        assert!(prompt.system_text().is_none());
    }

    #[test]
    fn test_outline_prompt_includes_character_when_present() {
        let character = CharacterProfile {
            nationality: "Japanese".to_string(),
            ..Default::default()
        };
        let prompt = outline("idea", Some(&character), "english");
        assert!(prompt.user_text().contains("nationality: Japanese"));

        let without = outline("idea", Some(&CharacterProfile::default()), "english");
        assert!(!without.user_text().contains("characteristics"));
    }

    #[test]
    fn test_script_part_context_is_last_two_parts() {
        let outline = sample_outline();
        let parts: Vec<ScriptPart> = (1..=3)
            .map(|i| ScriptPart::new(format!("CONTENT-{i}")))
            .collect();

        let prompt = script_part("idea", &outline, &parts, 3, None, "english");
        let user = prompt.user_text();
        assert!(!user.contains("CONTENT-1"));
        assert!(user.contains("CONTENT-2"));
        assert!(user.contains("CONTENT-3"));
    }

    #[test]
    fn test_script_part_first_has_no_context_and_hook_note() {
        let outline = sample_outline();
        let prompt = script_part("idea", &outline, &[], 0, None, "english");
        assert!(prompt
            .user_text()
            .contains("no previous context"));
        assert!(prompt.system_text().unwrap().contains("hook"));
    }

    #[test]
    fn test_script_part_last_has_lesson_note() {
        let outline = sample_outline();
        let parts: Vec<ScriptPart> = (1..=3)
            .map(|i| ScriptPart::new(format!("CONTENT-{i}")))
            .collect();
        let prompt = script_part("idea", &outline, &parts, 3, None, "english");
        assert!(prompt.system_text().unwrap().contains("meaningful lesson"));
    }

    #[test]
    fn test_script_part_lists_full_outline_and_current_task() {
        let outline = sample_outline();
        let prompt = script_part("idea", &outline, &[], 0, None, "english");
        let user = prompt.user_text();
        for section in &outline {
            assert!(user.contains(&section.title));
        }
        assert!(user.contains("Write the script for Part 1"));
        assert!(user.contains("800 words"));
    }

    #[test]
    fn test_character_analysis_embeds_script() {
        let prompt = character_analysis("THE FULL SCRIPT", "english");
        assert!(prompt.user_text().contains("THE FULL SCRIPT"));
        assert!(prompt.system_text().unwrap().contains("character profiler"));
    }

    #[test]
    fn test_reference_character_is_simple_prompt() {
        let prompt = reference_character("idea", "english");
        assert!(prompt.system_text().is_none());
        assert!(prompt.user_text().contains("concept artist"));
    }
}
