//! Property identifier resolution for legacy `(name, type)` pairs

use crate::mapping::MappingTable;
use crate::types::Resolution;

pub struct NameResolver<'a> {
    table: &'a MappingTable,
}

impl<'a> NameResolver<'a> {
    pub fn new(table: &'a MappingTable) -> Self {
        Self { table }
    }

    /// Resolve a pair to its property identifier. Never fails: a pair missing
    /// from the table gets a derived identifier.
    pub fn resolve(&self, name: &str, tag_type: &str) -> (String, Resolution) {
        match self.table.lookup(name, tag_type) {
            Some(id) => (id.to_string(), Resolution::Mapped),
            None => {
                let id = derive_identifier(name, tag_type);
                log::debug!("No mapping for '{}_{}', derived '{}'", name, tag_type, id);
                (id, Resolution::Derived)
            }
        }
    }
}

/// Derive an identifier from a CamelCase legacy name.
///
/// `CMContentArea` / `color` becomes `c_m_content_area_color`. The result
/// depends only on the inputs and is not checked against the mapping table.
pub fn derive_identifier(name: &str, tag_type: &str) -> String {
    let mut snake = String::with_capacity(name.len() * 2);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            snake.push('_');
        }
        snake.push(ch);
    }
    let snake = snake.to_lowercase();
    let snake = snake.trim_start_matches('_').replace("__", "_");
    format!("{}_{}", snake, tag_type.to_lowercase())
}
