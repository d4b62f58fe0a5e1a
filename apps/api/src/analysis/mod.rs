//! Résumé analysis pipeline.
//!
//! Every stage reads only the résumé text and the optional job description;
//! the role matcher and chart builder additionally receive the buzzword list.

pub mod buzzwords;
pub mod charts;
pub mod grammar;
pub mod handlers;
pub mod prompts;
pub mod roles;
pub mod scoring;
pub mod suggestions;
pub mod text;

use tracing::info;

use crate::llm_client::CompletionClient;
use crate::models::analysis::ResumeAnalysis;

use buzzwords::extract_buzzwords;
use charts::generate_chart_data;
use grammar::detect_grammar_issues;
use roles::match_job_roles;
use scoring::calculate_ats_score;
use suggestions::generate_suggestions;

/// Runs all analysis stages over extracted résumé text.
pub async fn analyze_resume(
    text: &str,
    job_description: Option<&str>,
    llm: &dyn CompletionClient,
) -> ResumeAnalysis {
    let ats_score = calculate_ats_score(text, job_description);
    let grammar = detect_grammar_issues(text);
    let buzzwords = extract_buzzwords(text, job_description);
    let suggestions = generate_suggestions(text, job_description, llm).await;
    let matched_roles = match_job_roles(text, &buzzwords);
    let charts = generate_chart_data(text, &buzzwords);

    info!(
        ats_score,
        grammar_issues = grammar.len(),
        buzzwords = buzzwords.len(),
        matched_roles = matched_roles.len(),
        with_job_description = job_description.is_some(),
        "Résumé analyzed"
    );

    ResumeAnalysis {
        ats_score,
        grammar,
        buzzwords,
        suggestions,
        matched_roles,
        charts,
    }
}
