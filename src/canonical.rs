//! Scanning of canonical `<tag:theme_prop:ID default="VALUE" />` tags

use crate::types::CanonicalTag;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn canonical_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // identifiers are derived from free-form legacy names and may hold
        // spaces or slashes; only a quote ends them
        Regex::new(r#"<tag:theme_prop:([^"]+?)\s+default="([^"]*)"\s*/>"#)
            .expect("canonical tag pattern is valid")
    })
}

fn to_tag(caps: &Captures) -> Option<CanonicalTag> {
    let whole = caps.get(0)?;
    Some(CanonicalTag {
        sequence: None,
        property_id: caps.get(1)?.as_str().to_string(),
        default_value: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
        position: whole.start(),
        raw_text: whole.as_str().to_string(),
    })
}

/// All canonical tags in `text`, in document order. Scanned tags have no
/// sequence number; callers that know where a tag came from attach it.
pub fn scan(text: &str) -> Vec<CanonicalTag> {
    canonical_regex()
        .captures_iter(text)
        .filter_map(|caps| to_tag(&caps))
        .collect()
}

/// Replace every canonical tag with the string produced by `f`.
pub fn replace_tags<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&CanonicalTag) -> String,
{
    canonical_regex()
        .replace_all(text, |caps: &Captures| match to_tag(caps) {
            Some(tag) => f(&tag),
            None => caps[0].to_string(),
        })
        .into_owned()
}
