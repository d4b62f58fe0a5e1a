//! Role matching against a static role table.

use crate::models::analysis::JobMatch;

pub const MAX_MATCHED_ROLES: usize = 3;
const MIN_KEYWORD_HITS: usize = 2;

pub struct RoleListing {
    pub title: &'static str,
    pub salary: &'static str,
    pub apply_url: &'static str,
    pub keywords: &'static [&'static str],
}

pub const ROLE_TABLE: &[RoleListing] = &[
    RoleListing {
        title: "Data Analyst",
        salary: "7-9 LPA",
        apply_url: "https://example.com/job1",
        keywords: &["data", "analytics", "sql", "python"],
    },
    RoleListing {
        title: "Software Engineer",
        salary: "10-15 LPA",
        apply_url: "https://example.com/job2",
        keywords: &["programming", "javascript", "react", "api"],
    },
    RoleListing {
        title: "Data Scientist",
        salary: "12-18 LPA",
        apply_url: "https://example.com/job3",
        keywords: &["machine learning", "python", "statistics"],
    },
    RoleListing {
        title: "DevOps Engineer",
        salary: "15-20 LPA",
        apply_url: "https://example.com/job4",
        keywords: &["docker", "kubernetes", "ci/cd", "aws"],
    },
    RoleListing {
        title: "Product Manager",
        salary: "18-25 LPA",
        apply_url: "https://example.com/job5",
        keywords: &["stakeholder", "agile", "analytics", "leadership"],
    },
];

impl RoleListing {
    /// Keywords found in the lowercased text or listed verbatim among the buzzwords.
    pub fn keyword_hits(&self, text_lower: &str, buzzwords: &[String]) -> usize {
        self.keywords
            .iter()
            .filter(|k| text_lower.contains(*k) || buzzwords.iter().any(|b| b == *k))
            .count()
    }

    fn to_match(&self) -> JobMatch {
        JobMatch {
            title: self.title.to_string(),
            salary: self.salary.to_string(),
            apply_url: self.apply_url.to_string(),
        }
    }
}

/// First three roles with at least two keyword hits, in table order.
pub fn match_job_roles(text: &str, buzzwords: &[String]) -> Vec<JobMatch> {
    let text_lower = text.to_lowercase();
    ROLE_TABLE
        .iter()
        .filter(|role| role.keyword_hits(&text_lower, buzzwords) >= MIN_KEYWORD_HITS)
        .take(MAX_MATCHED_ROLES)
        .map(RoleListing::to_match)
        .collect()
}
