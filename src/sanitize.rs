//! Post-processing for model replies.
//!
//! The persona prompt forbids formatting markers and meta-commentary, but the
//! model leaks them anyway often enough that every reply gets scrubbed here
//! before it reaches the transcript.

use regex::Regex;
use std::sync::OnceLock;

fn role_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(Dr\.\s*Sarah:|Therapist:|Assistant:)\s*").unwrap())
}

fn meta_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\(This is [^)]+\)").unwrap())
}

fn bracketed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[^\]]*\]").unwrap())
}

fn blank_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").unwrap())
}

/// Scrub a raw model reply: drop a leading role-label echo, emphasis and
/// bullet markers, parenthetical meta-commentary, bracketed instructions, and
/// collapse blank-line runs. Total: if scrubbing leaves nothing, the trimmed
/// original is returned so a non-empty reply never surfaces blank.
pub fn clean_reply(raw: &str) -> String {
    let original = raw.trim();

    let text = role_label().replace(original, "");
    let text = text.replace("***", "");
    let text = text.replace("**", "");
    let text = text.replace("* ", "");
    let text = meta_comment().replace_all(&text, "");
    let text = bracketed().replace_all(&text, "");
    let text = blank_runs().replace_all(&text, "\n");
    let cleaned = text.trim();

    if cleaned.is_empty() {
        original.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_emphasis_and_meta_commentary() {
        assert_eq!(
            clean_reply("**Hello** there! (This is supportive)"),
            "Hello there!"
        );
    }

    #[test]
    fn test_strips_leading_role_label() {
        assert_eq!(clean_reply("Dr. Sarah: How are you?"), "How are you?");
        assert_eq!(clean_reply("THERAPIST: take a breath"), "take a breath");
        assert_eq!(clean_reply("assistant: hi"), "hi");
    }

    #[test]
    fn test_role_label_only_stripped_at_start() {
        assert_eq!(
            clean_reply("Earlier you said Assistant: was confusing"),
            "Earlier you said Assistant: was confusing"
        );
    }

    #[test]
    fn test_strips_bullets_and_brackets() {
        assert_eq!(
            clean_reply("* first thing\n* second thing [stay in character]"),
            "first thing\nsecond thing"
        );
    }

    #[test]
    fn test_collapses_blank_line_runs() {
        assert_eq!(clean_reply("one\n\n\ntwo\n\nthree"), "one\ntwo\nthree");
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let samples = [
            "**Hello** there! (This is supportive)",
            "Dr. Sarah: *** welcome\n\n\nback [aside]",
            "plain reply, nothing to do",
            "* a\n* b\n\n* c",
        ];
        for sample in samples {
            let once = clean_reply(sample);
            assert_eq!(clean_reply(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_never_empty_for_nonempty_input() {
        // Everything gets scrubbed away, so the original comes back.
        let all_markup = "[instruction only]";
        assert_eq!(clean_reply(all_markup), all_markup);

        let meta_only = "(This is a meta note)";
        assert_eq!(clean_reply(meta_only), meta_only);
    }

    #[test]
    fn test_plain_text_passes_through() {
        let text = "That sounds really difficult. What was going through your mind?";
        assert_eq!(clean_reply(text), text);
    }
}
