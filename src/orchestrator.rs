use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::data_models::{QueryResult, SearchRequest, SearchResponse};
use crate::error::{AdapterError, MISSING_QUERIES_MESSAGE};
use crate::normalize::normalize;
use crate::upstream::{SearchUpstream, UpstreamQueryParams};

/// Fans a batch of queries out to the upstream and assembles the normalized results.
///
/// The batch is all-or-nothing: if any query fails, the whole call fails and
/// the successful siblings are discarded.
pub struct SearchOrchestrator {
    config: Arc<Config>,
    upstream: Arc<dyn SearchUpstream>,
}

impl SearchOrchestrator {
    pub fn new(config: Arc<Config>, upstream: Arc<dyn SearchUpstream>) -> SearchOrchestrator {
        SearchOrchestrator { config, upstream }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn handle(&self, request: SearchRequest) -> Result<SearchResponse, AdapterError> {
        if !self.config.has_api_key() {
            return Err(AdapterError::Configuration);
        }
        if request.queries.is_empty() {
            return Err(AdapterError::Validation(MISSING_QUERIES_MESSAGE.to_string()));
        }

        let start = Instant::now();
        let base = base_params(&self.config, request.exclude_domains.as_deref());
        let timeout = Duration::from_millis(self.config.request_timeout_ms);

        tracing::info!(
            "searching {} queries (depth: {}, output: {})",
            request.queries.len(),
            base.depth,
            base.output_type
        );

        // all queries start together; join_all keeps input order
        let calls = request.queries.iter().enumerate().map(|(index, query)| {
            let params = UpstreamQueryParams {
                q: query.clone(),
                ..base.clone()
            };
            let upstream = self.upstream.clone();
            async move {
                let result = upstream.search(&params, timeout).await;
                if let Err(e) = &result {
                    tracing::warn!("query #{index} {:?} failed: {e}", params.q);
                }
                result
            }
        });

        let documents = join_all(calls)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let output_type = self.config.default_output_type;
        let results: Vec<QueryResult> = request
            .queries
            .into_iter()
            .zip(documents)
            .map(|(query, doc)| QueryResult {
                links: normalize(output_type, &doc, request.max_results),
                debug_original: self.config.debug_attach_original.then_some(doc),
                query,
            })
            .collect();

        tracing::info!(
            "batch of {} queries completed in {}ms",
            results.len(),
            start.elapsed().as_millis()
        );

        Ok(SearchResponse { results })
    }
}

/// Shared per-batch payload; `q` is filled in per query.
pub fn base_params(config: &Config, client_excludes: Option<&[String]>) -> UpstreamQueryParams {
    UpstreamQueryParams {
        q: String::new(),
        depth: config.default_depth.as_str().to_string(),
        output_type: config.default_output_type.as_str().to_string(),
        include_images: config.static_include_images,
        include_domains: config
            .static_include_domains
            .clone()
            .filter(|domains| !domains.is_empty()),
        exclude_domains: merge_domains(client_excludes, config.static_exclude_domains.as_deref()),
        from_date: config.static_from_date.clone(),
        to_date: config.static_to_date.clone(),
    }
}

/// Union of both lists, first occurrence wins. `None` when the union is empty.
pub fn merge_domains(client: Option<&[String]>, configured: Option<&[String]>) -> Option<Vec<String>> {
    let mut merged: Vec<String> = Vec::new();
    for domain in client
        .unwrap_or_default()
        .iter()
        .chain(configured.unwrap_or_default())
    {
        if !merged.contains(domain) {
            merged.push(domain.clone());
        }
    }
    (!merged.is_empty()).then_some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Depth, OutputType};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_domains_union() {
        let client = strings(&["a.com"]);
        let configured = strings(&["a.com", "b.com"]);
        assert_eq!(
            merge_domains(Some(client.as_slice()), Some(configured.as_slice())),
            Some(strings(&["a.com", "b.com"]))
        );
    }

    #[test]
    fn test_merge_domains_dedupes_within_a_list() {
        let client = strings(&["x.com", "x.com", "y.com"]);
        assert_eq!(
            merge_domains(Some(client.as_slice()), None),
            Some(strings(&["x.com", "y.com"]))
        );
    }

    #[test]
    fn test_merge_domains_empty() {
        assert_eq!(merge_domains(None, None), None);
        let empty: Vec<String> = Vec::new();
        assert_eq!(merge_domains(Some(empty.as_slice()), Some(empty.as_slice())), None);
    }

    #[test]
    fn test_base_params_from_config() {
        let config = Config {
            default_depth: Depth::Deep,
            default_output_type: OutputType::SourcedAnswer,
            static_include_domains: Some(strings(&["docs.rs"])),
            static_exclude_domains: Some(strings(&["spam.com"])),
            static_from_date: Some("2024-01-01".into()),
            static_to_date: Some("2024-12-31".into()),
            static_include_images: true,
            ..Config::default()
        };
        let client = strings(&["ads.com"]);

        let params = base_params(&config, Some(client.as_slice()));
        assert_eq!(params.depth, "deep");
        assert_eq!(params.output_type, "sourcedAnswer");
        assert!(params.include_images);
        assert_eq!(params.include_domains, Some(strings(&["docs.rs"])));
        assert_eq!(params.exclude_domains, Some(strings(&["ads.com", "spam.com"])));
        assert_eq!(params.from_date.as_deref(), Some("2024-01-01"));
        assert_eq!(params.to_date.as_deref(), Some("2024-12-31"));
    }

    #[test]
    fn test_base_params_defaults() {
        let params = base_params(&Config::default(), None);
        assert_eq!(params.depth, "standard");
        assert_eq!(params.output_type, "searchResults");
        assert!(!params.include_images);
        assert!(params.include_domains.is_none());
        assert!(params.exclude_domains.is_none());
        assert!(params.from_date.is_none());
    }
}
