use serde_json::Value;

use crate::data_models::SearchRequest;
use crate::error::{AdapterError, MISSING_QUERIES_MESSAGE};

/// Validate a parsed JSON body into a `SearchRequest`.
///
/// Expected shape: `{queries: string[], max_results?: integer, exclude_domains?: string[]}`.
/// Only `queries` is strict; the optional fields are ignored when malformed.
pub fn parse_search_request(body: &Value) -> Result<SearchRequest, AdapterError> {
    let queries = body
        .get("queries")
        .and_then(Value::as_array)
        .filter(|queries| !queries.is_empty())
        .ok_or_else(|| AdapterError::Validation(MISSING_QUERIES_MESSAGE.to_string()))?;

    let queries = queries
        .iter()
        .map(|q| q.as_str().map(str::to_string))
        .collect::<Option<Vec<String>>>()
        .ok_or_else(|| {
            AdapterError::Validation("Field \"queries\" must contain only strings.".to_string())
        })?;

    let exclude_domains = body
        .get("exclude_domains")
        .and_then(Value::as_array)
        .map(|domains| {
            domains
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<String>>()
        });

    Ok(SearchRequest {
        queries,
        max_results: body.get("max_results").and_then(positive_integer),
        exclude_domains,
    })
}

fn positive_integer(value: &Value) -> Option<usize> {
    let n = match value.as_u64() {
        Some(n) => n,
        // accept 3.0 but not 3.5
        None => value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f > 0.0)
            .map(|f| f as u64)?,
    };
    (n > 0).then_some(n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_request() {
        let request = parse_search_request(&json!({
            "queries": ["rust", "tokio"],
            "max_results": 3,
            "exclude_domains": ["a.com", 7, "b.com"]
        }))
        .unwrap();

        assert_eq!(request.queries, vec!["rust", "tokio"]);
        assert_eq!(request.max_results, Some(3));
        assert_eq!(
            request.exclude_domains,
            Some(vec!["a.com".to_string(), "b.com".to_string()])
        );
    }

    #[test]
    fn test_missing_or_empty_queries() {
        for body in [
            json!({}),
            json!({ "queries": [] }),
            json!({ "queries": "rust" }),
            json!({ "queries": null }),
            json!([]),
        ] {
            let err = parse_search_request(&body).unwrap_err();
            assert!(matches!(&err, AdapterError::Validation(m) if m == MISSING_QUERIES_MESSAGE));
        }
    }

    #[test]
    fn test_non_string_queries_rejected() {
        let err = parse_search_request(&json!({ "queries": ["ok", 1] })).unwrap_err();
        assert!(matches!(err, AdapterError::Validation(_)));
    }

    #[test]
    fn test_max_results_must_be_positive_integer() {
        let parse = |v: Value| {
            parse_search_request(&json!({ "queries": ["q"], "max_results": v }))
                .unwrap()
                .max_results
        };
        assert_eq!(parse(json!(2)), Some(2));
        assert_eq!(parse(json!(2.0)), Some(2));
        assert_eq!(parse(json!(0)), None);
        assert_eq!(parse(json!(-4)), None);
        assert_eq!(parse(json!(2.5)), None);
        assert_eq!(parse(json!("2")), None);
    }
}
