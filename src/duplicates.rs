//! Detection of canonical tags that share a property identifier

use crate::canonical;
use crate::types::{CanonicalTag, DuplicateGroup};
use std::collections::HashMap;

pub struct DuplicateDetector;

impl DuplicateDetector {
    /// Group the canonical tags in `text` by identifier and keep the groups
    /// with two or more members. Tags listed in `known` (the rewriter's
    /// output for this text) keep their sequence numbers; any other
    /// canonical tag found in the text has none.
    ///
    /// Groups are ordered by the position of their first member.
    pub fn detect(text: &str, known: &[CanonicalTag]) -> Vec<DuplicateGroup> {
        let by_position: HashMap<usize, &CanonicalTag> =
            known.iter().map(|tag| (tag.position, tag)).collect();

        let mut groups: Vec<DuplicateGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for scanned in canonical::scan(text) {
            let tag = match by_position.get(&scanned.position) {
                Some(known) if known.raw_text == scanned.raw_text => (*known).clone(),
                _ => scanned,
            };
            match index.get(&tag.property_id) {
                Some(&slot) => groups[slot].tags.push(tag),
                None => {
                    index.insert(tag.property_id.clone(), groups.len());
                    groups.push(DuplicateGroup {
                        property_id: tag.property_id.clone(),
                        tags: vec![tag],
                    });
                }
            }
        }

        groups.retain(|group| group.tags.len() > 1);
        groups
    }
}
