use serde::{ser::SerializeMap, Serialize, Serializer};

/// A role from the static role table, copied verbatim into responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub title: String,
    pub salary: String,
    pub apply_url: String,
}

/// Chart-ready aggregates. Both maps serialize as JSON objects in vector order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// Category name to coverage percentage (0–100), in fixed category order.
    #[serde(serialize_with = "ordered_map")]
    pub skills_coverage: Vec<(String, u32)>,
    /// Keyword to occurrence count, descending by count.
    #[serde(serialize_with = "ordered_map")]
    pub keyword_density: Vec<(String, u32)>,
}

/// The full response body of both analysis endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub ats_score: u32,
    pub grammar: Vec<String>,
    pub buzzwords: Vec<String>,
    pub suggestions: Vec<String>,
    pub matched_roles: Vec<JobMatch>,
    pub charts: ChartData,
}

fn ordered_map<S>(entries: &[(String, u32)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}
