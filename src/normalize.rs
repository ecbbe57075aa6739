//! Maps upstream search documents into `LinkRecord`s.
//!
//! The upstream returns one of two shapes depending on the requested output
//! type: a `results` array, or a `sources` array with a top-level `answer`.
//! Both are read loosely as `serde_json::Value` so that missing or oddly typed
//! fields degrade to empty strings instead of failing the batch.

use serde::Serialize;
use serde_json::Value;

use crate::config::OutputType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub title: String,
    pub url: String,
    pub content: String,
}

pub fn normalize(output_type: OutputType, doc: &Value, max_results: Option<usize>) -> Vec<LinkRecord> {
    match output_type {
        OutputType::SourcedAnswer => from_sourced_answer(doc, max_results),
        OutputType::SearchResults => from_search_results(doc, max_results),
    }
}

pub fn from_search_results(doc: &Value, max_results: Option<usize>) -> Vec<LinkRecord> {
    items(doc, "results", max_results)
        .iter()
        .map(|item| LinkRecord {
            title: first_str(item, &["title", "name"]),
            url: first_str(item, &["url"]),
            content: first_str(item, &["snippet", "summary"]),
        })
        .collect()
}

pub fn from_sourced_answer(doc: &Value, max_results: Option<usize>) -> Vec<LinkRecord> {
    let answer = str_field(doc, "answer");
    items(doc, "sources", max_results)
        .iter()
        .map(|source| LinkRecord {
            title: first_str(source, &["name"]),
            url: first_str(source, &["url"]),
            content: str_field(source, "snippet")
                .or(answer)
                .unwrap_or_default()
                .to_string(),
        })
        .collect()
}

// A non-array field reads as empty. Zero is treated as "no limit".
fn items<'a>(doc: &'a Value, key: &str, max_results: Option<usize>) -> &'a [Value] {
    let all = doc
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    match max_results {
        Some(n) if n > 0 => &all[..n.min(all.len())],
        _ => all,
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn first_str(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| str_field(value, key))
        .unwrap_or_default()
        .to_string()
}
