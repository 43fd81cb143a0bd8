use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct TestRef {
    #[serde(default)]
    pub name: String,
}

/// One completed attempt as listed by `GET /api/results`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ResultSummary {
    pub id: u64,
    pub test_id: u64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub total_questions: i64,
    /// Seconds.
    #[serde(default)]
    pub time_taken: u64,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub test: Option<TestRef>,
}

impl ResultSummary {
    #[must_use]
    pub fn test_name(&self) -> String {
        self.test
            .as_ref()
            .map(|test| test.name.trim())
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("Test #{}", self.test_id), str::to_string)
    }

    /// Whole percent, 0 when the attempt had no questions.
    #[must_use]
    pub fn percent(&self) -> i64 {
        if self.total_questions <= 0 {
            return 0;
        }
        self.score * 100 / self.total_questions
    }
}

#[derive(Debug, Deserialize)]
pub struct ResultsResponse {
    #[serde(default)]
    pub data: Option<Vec<ResultSummary>>,
}
