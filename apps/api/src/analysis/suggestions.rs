//! Improvement suggestions from the completion service, with a fixed fallback.
//!
//! The completion boundary returns `Result`; every error variant maps to the
//! fallback list here, so callers always receive exactly five suggestions.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::prompts::{JOB_PROMPT_CHARS, RESUME_PROMPT_CHARS, SUGGESTIONS_PROMPT_TEMPLATE};
use crate::llm_client::CompletionClient;

pub const SUGGESTION_COUNT: usize = 5;

pub const FALLBACK_SUGGESTIONS: [&str; SUGGESTION_COUNT] = [
    "Add more quantifiable achievements with specific metrics",
    "Include relevant industry keywords and technical skills",
    "Use strong action verbs at the beginning of bullet points",
    "Ensure consistent formatting and verb tenses throughout",
    "Add a professional summary highlighting key qualifications",
];

static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").unwrap());

pub fn fallback_suggestions() -> Vec<String> {
    FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Builds the completion prompt from truncated résumé and job text.
pub fn build_prompt(text: &str, job_description: Option<&str>) -> String {
    let job_section = job_description
        .map(|jd| format!("Job Description: {}", truncate_chars(jd, JOB_PROMPT_CHARS)))
        .unwrap_or_default();

    SUGGESTIONS_PROMPT_TEMPLATE
        .replace("{resume_text}", truncate_chars(text, RESUME_PROMPT_CHARS))
        .replace("{job_section}", &job_section)
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Collects the text of every `N.` line, numbering stripped, in order.
pub fn parse_suggestions(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| RE_NUMBERED.is_match(line))
        .map(|line| RE_NUMBERED.replace(line, "").trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Always returns exactly five non-empty suggestions.
pub async fn generate_suggestions(
    text: &str,
    job_description: Option<&str>,
    llm: &dyn CompletionClient,
) -> Vec<String> {
    if text.trim().is_empty() {
        debug!("Empty résumé text, using fallback suggestions");
        return fallback_suggestions();
    }

    let prompt = build_prompt(text, job_description);
    let parsed = match llm.complete(&prompt).await {
        Ok(response) => parse_suggestions(&response),
        Err(e) => {
            warn!("Suggestion generation failed, using fallback: {e}");
            return fallback_suggestions();
        }
    };

    if parsed.is_empty() {
        warn!("LLM response contained no numbered suggestions, using fallback");
        return fallback_suggestions();
    }

    complete_with_fallback(parsed)
}

/// Keeps the first five parsed suggestions, topping up from the fallback list.
fn complete_with_fallback(mut suggestions: Vec<String>) -> Vec<String> {
    suggestions.truncate(SUGGESTION_COUNT);
    for fallback in FALLBACK_SUGGESTIONS {
        if suggestions.len() == SUGGESTION_COUNT {
            break;
        }
        if !suggestions.iter().any(|s| s == fallback) {
            suggestions.push(fallback.to_string());
        }
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ScriptedCompletion;

    const RESUME: &str = "Experienced Software Engineer. Improved system performance by 40%.";

    #[test]
    fn test_fallback_round_trips_through_parser() {
        let numbered: String = FALLBACK_SUGGESTIONS
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {s}\n", i + 1))
            .collect();
        assert_eq!(parse_suggestions(&numbered), fallback_suggestions());
    }

    #[test]
    fn test_parse_ignores_prose_and_blank_items() {
        let response = "Here are my suggestions:\n\n  1. Quantify results\n2.\n- bullet\n10.Add keywords\nThanks!";
        assert_eq!(
            parse_suggestions(response),
            vec!["Quantify results".to_string(), "Add keywords".to_string()]
        );
    }

    #[test]
    fn test_prompt_truncates_inputs() {
        let text = "é".repeat(RESUME_PROMPT_CHARS + 100);
        let jd = "j".repeat(JOB_PROMPT_CHARS + 100);
        let prompt = build_prompt(&text, Some(&jd));
        assert!(prompt.contains(&"é".repeat(RESUME_PROMPT_CHARS)));
        assert!(!prompt.contains(&"é".repeat(RESUME_PROMPT_CHARS + 1)));
        assert!(prompt.contains(&format!("Job Description: {}", "j".repeat(JOB_PROMPT_CHARS))));
        assert!(!prompt.contains(&"j".repeat(JOB_PROMPT_CHARS + 1)));
    }

    #[test]
    fn test_prompt_without_job_description() {
        let prompt = build_prompt(RESUME, None);
        assert!(prompt.contains(RESUME));
        assert!(!prompt.contains("Job Description:"));
        assert!(prompt.contains("ATS optimization"));
    }

    #[tokio::test]
    async fn test_failure_returns_fallback() {
        let llm = ScriptedCompletion::failing();
        let suggestions = generate_suggestions(RESUME, None, &llm).await;
        assert_eq!(suggestions, fallback_suggestions());
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_reply_returns_fallback() {
        let llm = ScriptedCompletion::replying("I cannot help with that.");
        assert_eq!(
            generate_suggestions(RESUME, None, &llm).await,
            fallback_suggestions()
        );
    }

    #[tokio::test]
    async fn test_empty_resume_skips_llm() {
        let llm = ScriptedCompletion::replying("1. Unused");
        assert_eq!(
            generate_suggestions("   ", None, &llm).await,
            fallback_suggestions()
        );
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_parsed_suggestions_capped_at_five() {
        let reply = (1..=7)
            .map(|i| format!("{i}. Suggestion {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let llm = ScriptedCompletion::replying(&reply);
        let suggestions = generate_suggestions(RESUME, Some("Rust role"), &llm).await;
        assert_eq!(
            suggestions,
            (1..=5).map(|i| format!("Suggestion {i}")).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_short_reply_topped_up_from_fallback() {
        let reply = format!("1. Lead with impact\n2. {}", FALLBACK_SUGGESTIONS[0]);
        let llm = ScriptedCompletion::replying(&reply);
        let suggestions = generate_suggestions(RESUME, None, &llm).await;
        assert_eq!(suggestions.len(), SUGGESTION_COUNT);
        assert_eq!(suggestions[0], "Lead with impact");
        assert_eq!(suggestions[1], FALLBACK_SUGGESTIONS[0]);
        assert_eq!(suggestions[2], FALLBACK_SUGGESTIONS[1]);
        assert!(suggestions.iter().all(|s| !s.is_empty()));
    }
}
