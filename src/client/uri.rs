//! Endpoint URL templating

use reqwest::Url;
use std::collections::{BTreeMap, HashSet};

/// Resolve a path template against the base URL
///
/// Every `:name` placeholder (a colon followed by ASCII letters, digits or
/// underscores) whose name is bound in `variables` is replaced by the bound
/// value. Only the first occurrence of each placeholder is substituted.
/// Values are inserted as-is, so callers encode them beforehand. Placeholders
/// without a binding stay in the URL verbatim.
#[must_use]
pub fn build_endpoint_uri(
    base_url: &Url,
    template: &str,
    variables: &BTreeMap<String, String>,
) -> String {
    let base = base_url.as_str().trim_end_matches('/');
    let mut uri = String::with_capacity(base.len() + template.len());
    uri.push_str(base);

    let mut substituted: HashSet<&str> = HashSet::new();
    let mut unresolved: Vec<&str> = Vec::new();
    let mut rest = template;

    while let Some(colon) = rest.find(':') {
        uri.push_str(&rest[..colon]);
        let after = &rest[colon + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];

        match variables.get(name) {
            Some(value) if !name.is_empty() && substituted.insert(name) => {
                uri.push_str(value);
            }
            _ => {
                if !name.is_empty() && !variables.contains_key(name) {
                    unresolved.push(name);
                }
                uri.push(':');
                uri.push_str(name);
            }
        }
        rest = &after[name_len..];
    }
    uri.push_str(rest);

    if !unresolved.is_empty() {
        tracing::warn!(
            template,
            placeholders = ?unresolved,
            "path template has unresolved placeholders"
        );
    }

    uri
}

/// Placeholder names of a template, in order of appearance
#[cfg(test)]
pub(crate) fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(colon) = rest.find(':') {
        let after = &rest[colon + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if name_len > 0 {
            names.push(&after[..name_len]);
        }
        rest = &after[name_len..];
    }
    names
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://app.barracks.io").unwrap()
    }

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn template_without_placeholders_is_appended_to_base() {
        let uri = build_endpoint_uri(&base(), "/api/member/updates", &BTreeMap::new());
        assert_eq!(uri, "https://app.barracks.io/api/member/updates");
    }

    #[test]
    fn placeholders_are_substituted_in_template_order() {
        let uri = build_endpoint_uri(
            &base(),
            "/api/member/packages/:reference/versions/:version",
            &vars(&[("version", "1.0.2"), ("reference", "io.barracks.app")]),
        );
        assert_eq!(
            uri,
            "https://app.barracks.io/api/member/packages/io.barracks.app/versions/1.0.2"
        );
    }

    #[test]
    fn query_string_placeholders_are_substituted() {
        let uri = build_endpoint_uri(
            &base(),
            "/api/member/updates/:uuid/status/scheduled?time=:time",
            &vars(&[("uuid", "u1"), ("time", "2026-01-01T00%3A00%3A00Z")]),
        );
        assert_eq!(
            uri,
            "https://app.barracks.io/api/member/updates/u1/status/scheduled?time=2026-01-01T00%3A00%3A00Z"
        );
    }

    #[test]
    fn repeated_placeholder_is_substituted_once() {
        let uri = build_endpoint_uri(&base(), "/a/:id/b/:id", &vars(&[("id", "7")]));
        assert_eq!(uri, "https://app.barracks.io/a/7/b/:id");
    }

    #[test]
    fn unresolved_placeholder_is_left_verbatim() {
        let uri = build_endpoint_uri(&base(), "/api/member/filters/:filter", &BTreeMap::new());
        assert_eq!(uri, "https://app.barracks.io/api/member/filters/:filter");
    }

    #[test]
    fn values_are_not_rescanned_for_placeholders() {
        let uri = build_endpoint_uri(
            &base(),
            "/x/:a/:b",
            &vars(&[("a", ":b"), ("b", "two")]),
        );
        assert_eq!(uri, "https://app.barracks.io/x/:b/two");
    }

    #[test]
    fn base_url_path_is_kept() {
        let base = Url::parse("http://localhost:8080/proxy/").unwrap();
        let uri = build_endpoint_uri(&base, "/api/me", &BTreeMap::new());
        assert_eq!(uri, "http://localhost:8080/proxy/api/me");
    }

    #[test]
    fn placeholders_are_listed_in_order() {
        assert_eq!(
            placeholders("/api/member/packages/:reference/versions/:version"),
            vec!["reference", "version"]
        );
        assert!(placeholders("/api/me").is_empty());
    }
}
