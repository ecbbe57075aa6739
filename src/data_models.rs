use serde::Serialize;
use serde_json::Value;

use crate::normalize::LinkRecord;

/// A validated batch of queries.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub queries: Vec<String>,
    /// Only ever `Some` for a positive limit.
    pub max_results: Option<usize>,
    pub exclude_domains: Option<Vec<String>>,
}

impl SearchRequest {
    pub fn new(queries: Vec<String>) -> SearchRequest {
        SearchRequest {
            queries,
            ..Default::default()
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> SearchRequest {
        self.max_results = (max_results > 0).then_some(max_results);
        self
    }

    pub fn with_exclude_domains(mut self, domains: Vec<String>) -> SearchRequest {
        self.exclude_domains = Some(domains);
        self
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct QueryResult {
    pub query: String,
    pub links: Vec<LinkRecord>,
    #[serde(rename = "_debug_original", skip_serializing_if = "Option::is_none")]
    pub debug_original: Option<Value>,
}

#[derive(Serialize, Debug, Clone)]
pub struct SearchResponse {
    pub results: Vec<QueryResult>,
}
