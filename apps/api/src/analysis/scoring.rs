//! ATS compatibility scoring.
//!
//! Points (sum clamped to 100):
//! - 10 per section keyword present
//! - 15 if any quantified achievement (`40%`, `$5000`, `10+`)
//! - 2 per action verb present
//! - up to 30 for job-description word overlap

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::text::words;

pub const MAX_SCORE: u32 = 100;

const SECTION_KEYWORDS: &[&str] = &["experience", "education", "skills", "summary", "objective"];
const SECTION_POINTS: u32 = 10;

const ACTION_VERBS: &[&str] = &[
    "achieved",
    "improved",
    "managed",
    "developed",
    "created",
    "led",
    "increased",
    "decreased",
];
const ACTION_VERB_POINTS: u32 = 2;

const QUANTIFIED_POINTS: u32 = 15;
const JOB_MATCH_POINTS: f64 = 30.0;

static RE_QUANTIFIED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+%|\$\d+|\d+\+").unwrap());

/// Computes the 0–100 ATS compatibility score.
pub fn calculate_ats_score(text: &str, job_description: Option<&str>) -> u32 {
    let text_lower = text.to_lowercase();
    let mut score = 0;

    score += SECTION_POINTS * count_present(&text_lower, SECTION_KEYWORDS);

    if RE_QUANTIFIED.is_match(text) {
        score += QUANTIFIED_POINTS;
    }

    score += ACTION_VERB_POINTS * count_present(&text_lower, ACTION_VERBS);

    if let Some(job_description) = job_description {
        score += job_match_points(&text_lower, job_description);
    }

    score.min(MAX_SCORE)
}

fn count_present(text_lower: &str, keywords: &[&str]) -> u32 {
    keywords.iter().filter(|k| text_lower.contains(*k)).count() as u32
}

/// `|resume ∩ job| / |job|` scaled to 30 and truncated.
fn job_match_points(text_lower: &str, job_description: &str) -> u32 {
    let job_lower = job_description.to_lowercase();
    let job_words: HashSet<&str> = words(&job_lower).collect();
    if job_words.is_empty() {
        return 0;
    }

    let resume_words: HashSet<&str> = words(text_lower).collect();
    let overlap = job_words.intersection(&resume_words).count();
    let ratio = overlap as f64 / job_words.len() as f64;
    (ratio * JOB_MATCH_POINTS) as u32
}
