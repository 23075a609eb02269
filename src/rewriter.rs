//! First-pass rewriting of legacy tags into canonical theme property tags

use crate::resolver::NameResolver;
use crate::types::{CanonicalTag, LegacyTagOccurrence, Resolution, CANONICAL_TAG_PREFIX};

/// Render a canonical tag.
pub fn canonical_tag(property_id: &str, default_value: &str) -> String {
    format!(r#"{}{} default="{}" />"#, CANONICAL_TAG_PREFIX, property_id, default_value)
}

/// Output of the rewrite pass.
#[derive(Debug, Clone, Default)]
pub struct RewriteOutput {
    pub text: String,
    /// One tag per legacy occurrence, same order, positions in `text`.
    pub tags: Vec<CanonicalTag>,
    pub mapped_count: usize,
    pub derived_count: usize,
}

pub struct TagRewriter<'a> {
    resolver: NameResolver<'a>,
}

impl<'a> TagRewriter<'a> {
    pub fn new(resolver: NameResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Replace every occurrence with its canonical tag in one left-to-right
    /// pass. `occurrences` must come from `source` and be in document order.
    pub fn rewrite(&self, source: &str, occurrences: &[LegacyTagOccurrence]) -> RewriteOutput {
        let mut output = RewriteOutput {
            text: String::with_capacity(source.len()),
            tags: Vec::with_capacity(occurrences.len()),
            ..Default::default()
        };
        let mut cursor = 0;

        for occurrence in occurrences {
            output.text.push_str(&source[cursor..occurrence.position]);

            let (property_id, resolution) =
                self.resolver.resolve(&occurrence.name, &occurrence.tag_type);
            match resolution {
                Resolution::Mapped => output.mapped_count += 1,
                Resolution::Derived => output.derived_count += 1,
            }
            log::trace!(
                "Pass {}: {}_{} -> {}",
                occurrence.order.pass(),
                occurrence.name,
                occurrence.tag_type,
                property_id
            );

            let raw_text = canonical_tag(&property_id, &occurrence.value);
            output.tags.push(CanonicalTag {
                sequence: Some(occurrence.sequence),
                property_id,
                default_value: occurrence.value.clone(),
                position: output.text.len(),
                raw_text: raw_text.clone(),
            });
            output.text.push_str(&raw_text);
            cursor = occurrence.end();
        }
        output.text.push_str(&source[cursor..]);

        output
    }
}
