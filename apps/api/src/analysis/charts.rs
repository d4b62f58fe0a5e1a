//! Chart aggregates: category coverage and keyword density.

use super::text::{significant_words, WordCounts};
use crate::models::analysis::ChartData;

const PERCENT_PER_HIT: u32 = 20;
const DENSITY_MIN_LEN: usize = 4;
const DENSITY_TOP: usize = 10;

pub const SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Technical",
        &["python", "java", "javascript", "sql", "react", "node", "docker"],
    ),
    (
        "Analytical",
        &["data", "analytics", "statistics", "visualization", "insights"],
    ),
    (
        "Management",
        &["leadership", "team", "project", "stakeholder", "strategy"],
    ),
    (
        "Soft Skills",
        &["communication", "collaboration", "problem-solving", "creative"],
    ),
];

/// Both aggregates are computed from the text alone; the buzzword list is
/// accepted for call-site symmetry with the role matcher but not consulted.
pub fn generate_chart_data(text: &str, _buzzwords: &[String]) -> ChartData {
    ChartData {
        skills_coverage: skills_coverage(text),
        keyword_density: keyword_density(text),
    }
}

/// `min(hits × 20, 100)` per category, in category order.
fn skills_coverage(text: &str) -> Vec<(String, u32)> {
    let text_lower = text.to_lowercase();
    SKILL_CATEGORIES
        .iter()
        .map(|(category, keywords)| {
            let hits = keywords.iter().filter(|k| text_lower.contains(*k)).count() as u32;
            (category.to_string(), (hits * PERCENT_PER_HIT).min(100))
        })
        .collect()
}

fn keyword_density(text: &str) -> Vec<(String, u32)> {
    let counts: WordCounts = significant_words(text, DENSITY_MIN_LEN).into_iter().collect();
    counts.most_common(DENSITY_TOP)
}
