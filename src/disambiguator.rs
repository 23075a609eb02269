//! Renaming of colliding property identifiers
//!
//! The first tag of every duplicate group keeps its identifier. Each later
//! tag gets a suffix from the context classifier, run on the original
//! document around the legacy tag it came from, or a positional `_N` suffix
//! when no context signal is found.

use crate::canonical;
use crate::context::{window_before, ContextClassifier};
use crate::types::{
    DuplicateGroup, LegacyTagOccurrence, Rename, SuffixSource, CANONICAL_TAG_PREFIX,
    CONTEXT_WINDOW_CHARS,
};
use std::collections::HashSet;

pub struct DuplicateResolver<'a> {
    original: &'a str,
    occurrences: &'a [LegacyTagOccurrence],
}

impl<'a> DuplicateResolver<'a> {
    pub fn new(original: &'a str, occurrences: &'a [LegacyTagOccurrence]) -> Self {
        Self {
            original,
            occurrences,
        }
    }

    /// Decide the renames for `groups`, found in `converted`.
    pub fn plan(&self, converted: &str, groups: &[DuplicateGroup]) -> Vec<Rename> {
        if groups.is_empty() {
            return Vec::new();
        }

        let mut taken: HashSet<String> = canonical::scan(converted)
            .into_iter()
            .map(|tag| tag.property_id)
            .collect();
        let mut renames = Vec::new();

        for group in groups {
            for (index, tag) in group.tags.iter().enumerate().skip(1) {
                let origin = tag
                    .sequence
                    .and_then(|sequence| self.occurrences.get(sequence))
                    .filter(|occurrence| Some(occurrence.sequence) == tag.sequence);

                let window = match origin {
                    Some(occurrence) => {
                        window_before(self.original, occurrence.position, CONTEXT_WINDOW_CHARS)
                    }
                    None => {
                        log::debug!(
                            "No source tag for '{}' at {}, using converted text as context",
                            tag.property_id,
                            tag.position
                        );
                        window_before(converted, tag.position, CONTEXT_WINDOW_CHARS)
                    }
                };

                let (suffix, source) = match ContextClassifier::classify(window) {
                    Some(suffix) => (suffix.as_str().to_string(), SuffixSource::Context),
                    None => (format!("_{}", index), SuffixSource::Positional),
                };
                let new_id = claim_identifier(&group.property_id, &suffix, index, &mut taken);
                log::debug!(
                    "Duplicate '{}' #{} renamed to '{}' ({:?})",
                    group.property_id,
                    index,
                    new_id,
                    source
                );

                let replacement_raw = tag.raw_text.replacen(
                    &format!("{}{}", CANONICAL_TAG_PREFIX, group.property_id),
                    &format!("{}{}", CANONICAL_TAG_PREFIX, new_id),
                    1,
                );
                renames.push(Rename {
                    position: tag.position,
                    original_raw: tag.raw_text.clone(),
                    replacement_raw,
                    from: group.property_id.clone(),
                    to: new_id,
                    source,
                    correlated: origin.is_some(),
                });
            }
        }

        renames
    }

    /// Plan and apply the renames.
    pub fn resolve(&self, converted: &str, groups: &[DuplicateGroup]) -> (String, Vec<Rename>) {
        let renames = self.plan(converted, groups);
        (apply_renames(converted, &renames), renames)
    }
}

/// Pick `id + suffix`, or append `_N` until the identifier is unused.
fn claim_identifier(id: &str, suffix: &str, index: usize, taken: &mut HashSet<String>) -> String {
    let base = format!("{}{}", id, suffix);
    let mut candidate = base.clone();
    let mut n = index;
    while taken.contains(&candidate) {
        candidate = format!("{}_{}", base, n);
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

/// Apply renames back to front so earlier positions stay valid.
pub fn apply_renames(text: &str, renames: &[Rename]) -> String {
    let mut ordered: Vec<&Rename> = renames.iter().collect();
    ordered.sort_by(|a, b| b.position.cmp(&a.position));

    let mut output = text.to_string();
    for rename in ordered {
        let range = rename.position..rename.position + rename.original_raw.len();
        if output.get(range.clone()) == Some(rename.original_raw.as_str()) {
            output.replace_range(range, &rename.replacement_raw);
        } else {
            log::warn!("Rename of '{}' at {} no longer matches, skipped", rename.from, rename.position);
        }
    }
    output
}
