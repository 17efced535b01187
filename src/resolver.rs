use serde_json::{Map, Value};

/// Field name probed first when the caller gives no hint.
pub const DEFAULT_URL_FIELD: &str = "uploadUrl";

/// Field names that carry a single upload URL. Backend response shapes have
/// drifted over time, so the resolver matches a set of synonyms rather than
/// one schema.
const URL_FIELD_ALIASES: &[&str] = &[
    "uploadUrl",
    "upload_url",
    "presignedUrl",
    "presigned_url",
    "signedUrl",
    "signed_url",
    "putUrl",
    "put_url",
    "fileUrl",
    "url",
];

/// Field names that carry an array of upload URLs directly.
const URL_LIST_ALIASES: &[&str] = &[
    "uploadUrls",
    "upload_urls",
    "presignedUrls",
    "presigned_urls",
    "urls",
];

/// Field names that carry an array of per-file records, each holding its own
/// URL under one of the `URL_FIELD_ALIASES`.
const RECORD_LIST_ALIASES: &[&str] = &["data", "files", "attachments", "uploads", "items", "results"];

/// Recursion cutoff. Response payloads are small; anything nested deeper
/// than this is not a field we planted.
const MAX_SCAN_DEPTH: usize = 8;

/// Collect every upload URL found in `response`, in traversal order.
///
/// Never panics and always terminates, whatever shape `response` has.
/// A missing or `null` response yields an empty list.
pub fn resolve_upload_urls(response: &Value, hint: &str) -> Vec<String> {
    let mut found = Vec::new();
    scan_response(response, hint, true, &mut found);
    log::debug!(
        "resolved {} upload URL(s) from response (hint: {})",
        found.len(),
        hint
    );
    found
}

/// First upload URL found in `response`, if any.
pub fn resolve_upload_url(response: &Value, hint: &str) -> Option<String> {
    let mut found = Vec::new();
    scan_response(response, hint, false, &mut found);
    found.into_iter().next()
}

/// Lenient entry point for a raw response body. A body that is not JSON is
/// treated as a bare URL string, matching how some endpoints answer with
/// just the presigned link as text.
pub fn resolve_from_body(body: &str, hint: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => resolve_upload_urls(&value, hint),
        Err(e) => {
            log::debug!("response body is not JSON ({}), treating it as a bare URL", e);
            let trimmed = body.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
    }
}

fn scan_response(response: &Value, hint: &str, want_all: bool, found: &mut Vec<String>) {
    match response {
        Value::String(s) => {
            // The response itself is the URL.
            if !s.is_empty() {
                found.push(s.clone());
            }
        }
        Value::Object(_) | Value::Array(_) => {
            scan_node(response, hint, want_all, 0, found);
        }
        _ => {}
    }
}

/// Probe one node, then its children. Returns true once the node (or, in
/// single mode, any descendant) produced matches; a matched node's subtree
/// is not descended into, so each URL is collected exactly once.
fn scan_node(
    node: &Value,
    hint: &str,
    want_all: bool,
    depth: usize,
    found: &mut Vec<String>,
) -> bool {
    if depth > MAX_SCAN_DEPTH {
        return false;
    }

    if let Value::Object(map) = node {
        // A direct array of URLs is the cheapest, least ambiguous signal;
        // it wins over record scanning.
        for alias in with_hint_first(hint, URL_LIST_ALIASES) {
            if let Some(Value::Array(items)) = map.get(alias) {
                let urls: Vec<String> = items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                if !urls.is_empty() {
                    found.extend(urls);
                    return true;
                }
            }
        }

        // An array of per-file records, one URL collected per element in
        // element order.
        for alias in RECORD_LIST_ALIASES {
            if let Some(Value::Array(items)) = map.get(*alias) {
                let mut urls = Vec::new();
                for item in items {
                    if let Value::Object(record) = item {
                        if let Some(url) = first_field_match(record, hint) {
                            urls.push(url);
                        }
                    }
                }
                if !urls.is_empty() {
                    found.extend(urls);
                    return true;
                }
            }
        }

        // A URL field directly on the node, or on its `data` object.
        let mut urls = field_matches(map, hint);
        if urls.is_empty() {
            if let Some(Value::Object(data)) = map.get("data") {
                urls = field_matches(data, hint);
            }
        }
        if !urls.is_empty() {
            found.extend(urls);
            return true;
        }
    }

    // Nothing on this node; repeat on every object/array-valued member.
    let children: Box<dyn Iterator<Item = &Value> + '_> = match node {
        Value::Object(map) => Box::new(map.values()),
        Value::Array(items) => Box::new(items.iter()),
        _ => return false,
    };

    let mut matched = false;
    for child in children {
        if !(child.is_object() || child.is_array()) {
            continue;
        }
        if scan_node(child, hint, want_all, depth + 1, found) {
            matched = true;
            if !want_all {
                return true;
            }
        }
    }
    matched
}

/// All URL-field matches on one object, hint name first.
fn field_matches(map: &Map<String, Value>, hint: &str) -> Vec<String> {
    let mut urls = Vec::new();
    for alias in with_hint_first(hint, URL_FIELD_ALIASES) {
        if let Some(Value::String(s)) = map.get(alias) {
            if !s.is_empty() {
                urls.push(s.clone());
            }
        }
    }
    urls
}

/// First URL-field match on one record, hint taking precedence.
fn first_field_match(record: &Map<String, Value>, hint: &str) -> Option<String> {
    for alias in with_hint_first(hint, URL_FIELD_ALIASES) {
        if let Some(Value::String(s)) = record.get(alias) {
            if !s.is_empty() {
                return Some(s.clone());
            }
        }
    }
    None
}

fn with_hint_first<'a>(
    hint: &'a str,
    aliases: &'a [&'a str],
) -> impl Iterator<Item = &'a str> {
    std::iter::once(hint).chain(aliases.iter().copied().filter(move |a| *a != hint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_url_list_returned_in_order() {
        let response = json!({ "uploadUrls": ["https://s/a", "https://s/b", "https://s/c"] });
        let urls = resolve_upload_urls(&response, DEFAULT_URL_FIELD);
        assert_eq!(urls, vec!["https://s/a", "https://s/b", "https://s/c"]);
    }

    #[test]
    fn test_array_under_hint_name_counts_as_url_list() {
        let response = json!({ "uploadUrl": ["https://s/a", "https://s/b"] });
        let urls = resolve_upload_urls(&response, "uploadUrl");
        assert_eq!(urls, vec!["https://s/a", "https://s/b"]);
    }

    #[test]
    fn test_record_list_with_mixed_aliases() {
        let response = json!({
            "data": [
                { "uploadUrl": "https://s/1" },
                { "presigned_url": "https://s/2" },
                { "name": "c.png", "url": "https://s/3" },
            ]
        });
        let urls = resolve_upload_urls(&response, DEFAULT_URL_FIELD);
        assert_eq!(urls, vec!["https://s/1", "https://s/2", "https://s/3"]);
    }

    #[test]
    fn test_record_without_url_is_skipped() {
        let response = json!({
            "files": [
                { "uploadUrl": "https://s/1" },
                { "name": "no-url.png" },
            ]
        });
        let urls = resolve_upload_urls(&response, DEFAULT_URL_FIELD);
        assert_eq!(urls, vec!["https://s/1"]);
    }

    #[test]
    fn test_direct_list_wins_over_record_list() {
        let response = json!({
            "urls": ["https://direct/a"],
            "data": [{ "uploadUrl": "https://records/b" }],
        });
        let urls = resolve_upload_urls(&response, DEFAULT_URL_FIELD);
        assert_eq!(urls, vec!["https://direct/a"]);
    }

    #[test]
    fn test_hint_takes_precedence_over_synonyms() {
        let response = json!({
            "url": "https://synonym",
            "uploadUrl": "https://hinted",
        });
        assert_eq!(
            resolve_upload_url(&response, "uploadUrl").as_deref(),
            Some("https://hinted")
        );
        let all = resolve_upload_urls(&response, "uploadUrl");
        assert_eq!(all, vec!["https://hinted", "https://synonym"]);
    }

    #[test]
    fn test_url_inside_nested_data_object() {
        let response = json!({ "data": { "uploadUrl": "https://s/n" } });
        assert_eq!(
            resolve_upload_url(&response, DEFAULT_URL_FIELD).as_deref(),
            Some("https://s/n")
        );
    }

    #[test]
    fn test_bare_string_response_is_the_url() {
        let response = json!("https://s/bare?sig=1");
        let urls = resolve_upload_urls(&response, DEFAULT_URL_FIELD);
        assert_eq!(urls, vec!["https://s/bare?sig=1"]);
    }

    #[test]
    fn test_null_and_empty_responses_yield_nothing() {
        assert!(resolve_upload_urls(&Value::Null, DEFAULT_URL_FIELD).is_empty());
        assert!(resolve_upload_urls(&json!({}), DEFAULT_URL_FIELD).is_empty());
        assert!(resolve_upload_url(&Value::Null, DEFAULT_URL_FIELD).is_none());
        assert!(resolve_upload_urls(&json!(42), DEFAULT_URL_FIELD).is_empty());
        assert!(resolve_upload_urls(&json!(false), DEFAULT_URL_FIELD).is_empty());
    }

    #[test]
    fn test_sibling_branches_accumulate_in_order() {
        let response = json!({
            "notice": { "uploadUrl": "https://s/first" },
            "post": { "uploadUrl": "https://s/second" },
        });
        let urls = resolve_upload_urls(&response, DEFAULT_URL_FIELD);
        assert_eq!(urls, vec!["https://s/first", "https://s/second"]);
    }

    #[test]
    fn test_single_mode_stops_at_first_hit() {
        let response = json!({
            "a": { "uploadUrl": "https://s/first" },
            "b": { "uploadUrl": "https://s/second" },
        });
        assert_eq!(
            resolve_upload_url(&response, DEFAULT_URL_FIELD).as_deref(),
            Some("https://s/first")
        );
    }

    #[test]
    fn test_deeply_nested_url_is_found_within_bound() {
        let mut response = json!({ "uploadUrl": "https://s/deep" });
        for _ in 0..4 {
            response = json!({ "wrapper": response });
        }
        assert_eq!(
            resolve_upload_url(&response, DEFAULT_URL_FIELD).as_deref(),
            Some("https://s/deep")
        );
    }

    #[test]
    fn test_nesting_past_depth_bound_is_ignored() {
        let mut response = json!({ "uploadUrl": "https://s/too-deep" });
        for _ in 0..12 {
            response = json!({ "wrapper": response });
        }
        assert!(resolve_upload_urls(&response, DEFAULT_URL_FIELD).is_empty());
    }

    #[test]
    fn test_records_inside_array_wrapper_are_found() {
        let response = json!({
            "result": [
                { "attachments": [{ "uploadUrl": "https://s/x" }, { "uploadUrl": "https://s/y" }] }
            ]
        });
        let urls = resolve_upload_urls(&response, DEFAULT_URL_FIELD);
        assert_eq!(urls, vec!["https://s/x", "https://s/y"]);
    }

    #[test]
    fn test_resolver_is_pure_and_idempotent() {
        let response = json!({
            "data": [{ "uploadUrl": "https://s/1" }, { "url": "https://s/2" }]
        });
        let snapshot = response.clone();
        let first = resolve_upload_urls(&response, DEFAULT_URL_FIELD);
        let second = resolve_upload_urls(&response, DEFAULT_URL_FIELD);
        assert_eq!(first, second);
        assert_eq!(response, snapshot);
    }

    #[test]
    fn test_resolve_from_body_parses_json_or_falls_back_to_text() {
        let urls = resolve_from_body(r#"{"uploadUrl":"https://s/json"}"#, DEFAULT_URL_FIELD);
        assert_eq!(urls, vec!["https://s/json"]);

        let urls = resolve_from_body("https://s/plain?sig=2", DEFAULT_URL_FIELD);
        assert_eq!(urls, vec!["https://s/plain?sig=2"]);

        assert!(resolve_from_body("", DEFAULT_URL_FIELD).is_empty());
    }

    #[test]
    fn test_empty_string_fields_are_not_urls() {
        let response = json!({ "uploadUrl": "", "data": [{ "url": "" }] });
        assert!(resolve_upload_urls(&response, DEFAULT_URL_FIELD).is_empty());
    }
}
