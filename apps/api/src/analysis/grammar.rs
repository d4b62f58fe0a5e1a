//! Heuristic grammar and style checks. Each check appends at most one message.

use once_cell::sync::Lazy;
use regex::Regex;

use super::text::{is_stopword, sentences, words, WordCounts};

pub const INCONSISTENT_TENSE: &str = "Inconsistent verb tenses detected";
pub const PASSIVE_VOICE: &str = "Passive voice detected - consider using active voice";

const LONG_SENTENCE_WORDS: usize = 30;
const OVERUSE_MIN_COUNT: u32 = 5;
const OVERUSE_MIN_LEN: usize = 4;
const OVERUSE_REPORTED: usize = 3;

static RE_PAST_TENSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+ed\b").unwrap());
static RE_PRESENT_PARTICIPLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+ing\b").unwrap());
static RE_PASSIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(was|were|been|being)\s+\w+ed\b").unwrap());

/// Runs every check in a fixed order and returns the triggered diagnostics.
pub fn detect_grammar_issues(text: &str) -> Vec<String> {
    [
        check_tense_consistency(text),
        check_passive_voice(text),
        check_long_sentences(text),
        check_overused_words(text),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn check_tense_consistency(text: &str) -> Option<String> {
    let past = RE_PAST_TENSE.find_iter(text).count();
    let present = RE_PRESENT_PARTICIPLE.find_iter(text).count();
    if past == 0 || present == 0 {
        return None;
    }

    let ratio = past as f64 / (past + present) as f64;
    (0.3 < ratio && ratio < 0.7).then(|| INCONSISTENT_TENSE.to_string())
}

fn check_passive_voice(text: &str) -> Option<String> {
    RE_PASSIVE
        .is_match(text)
        .then(|| PASSIVE_VOICE.to_string())
}

fn check_long_sentences(text: &str) -> Option<String> {
    let long = sentences(text)
        .into_iter()
        .filter(|s| s.split_whitespace().count() > LONG_SENTENCE_WORDS)
        .count();

    (long > 0).then(|| {
        format!("Found {long} sentences with 30+ words - consider breaking them down")
    })
}

/// Reports up to three overused words in first-seen order, not by count.
fn check_overused_words(text: &str) -> Option<String> {
    let text_lower = text.to_lowercase();
    let counts: WordCounts = words(&text_lower).collect();

    let overused: Vec<&str> = counts
        .iter()
        .filter(|(w, c)| {
            *c > OVERUSE_MIN_COUNT && w.chars().count() > OVERUSE_MIN_LEN && !is_stopword(w)
        })
        .map(|(w, _)| w)
        .take(OVERUSE_REPORTED)
        .collect();

    (!overused.is_empty())
        .then(|| format!("Overused words detected: {}", overused.join(", ")))
}
