/// Suggestion prompt. `{resume_text}` and `{job_section}` are substituted at call time.
pub const SUGGESTIONS_PROMPT_TEMPLATE: &str = "\
Analyze this resume and provide 5 specific, actionable suggestions for improvement.

Resume:
{resume_text}

{job_section}

Provide suggestions in the following format:
1. [Suggestion 1]
2. [Suggestion 2]
3. [Suggestion 3]
4. [Suggestion 4]
5. [Suggestion 5]

Focus on: ATS optimization, quantifiable achievements, relevant keywords, formatting, and overall impact.";

/// Characters of résumé text embedded in the prompt.
pub const RESUME_PROMPT_CHARS: usize = 2000;
/// Characters of job description embedded in the prompt.
pub const JOB_PROMPT_CHARS: usize = 500;
