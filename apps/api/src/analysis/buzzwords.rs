//! Buzzword extraction against a fixed vocabulary, plus job-description terms.

use once_cell::sync::Lazy;
use regex::Regex;

use super::text::{significant_words, WordCounts};

pub const MAX_BUZZWORDS: usize = 15;
const JOB_TERMS: usize = 5;
const JOB_TERM_MIN_LEN: usize = 3;

/// Domain vocabulary as regex patterns, matched against lowercased text.
const BUZZWORD_PATTERNS: &[&str] = &[
    r"machine learning",
    r"artificial intelligence",
    r"deep learning",
    r"data science",
    r"cloud computing",
    r"agile",
    r"scrum",
    r"devops",
    r"ci/cd",
    r"microservices",
    r"api",
    r"rest",
    r"sql",
    r"python",
    r"javascript",
    r"react",
    r"node\.js",
    r"docker",
    r"kubernetes",
    r"aws",
    r"azure",
    r"gcp",
    r"analytics",
    r"visualization",
    r"dashboard",
    r"kpi",
    r"stakeholder",
    r"cross-functional",
    r"leadership",
    r"problem-solving",
    r"communication",
    r"teamwork",
];

struct Buzzword {
    pattern: Regex,
    label: String,
}

static BUZZWORDS: Lazy<Vec<Buzzword>> = Lazy::new(|| {
    BUZZWORD_PATTERNS
        .iter()
        .map(|p| Buzzword {
            pattern: Regex::new(p).unwrap(),
            label: clean_pattern(p),
        })
        .collect()
});

/// Drops regex escapes so `node\.js` is reported as `node.js`.
fn clean_pattern(pattern: &str) -> String {
    pattern.replace('\\', "")
}

/// Vocabulary hits in vocabulary order, then the job description's most
/// frequent terms that also occur in the résumé. Capped at 15, no duplicates.
pub fn extract_buzzwords(text: &str, job_description: Option<&str>) -> Vec<String> {
    let text_lower = text.to_lowercase();

    let mut found: Vec<String> = BUZZWORDS
        .iter()
        .filter(|b| b.pattern.is_match(&text_lower))
        .map(|b| b.label.clone())
        .collect();

    if let Some(job_description) = job_description {
        let counts: WordCounts = significant_words(job_description, JOB_TERM_MIN_LEN)
            .into_iter()
            .collect();

        for (word, _) in counts.most_common(JOB_TERMS) {
            if text_lower.contains(&word) && !found.contains(&word) {
                found.push(word);
            }
        }
    }

    found.truncate(MAX_BUZZWORDS);
    found
}
