//! Lookup table from legacy `name_type` keys to theme property identifiers

use std::collections::HashMap;
use std::sync::OnceLock;

/// Built-in legacy-to-theme mappings, keyed by `name + "_" + type`.
const BUILTIN_MAPPINGS: &[(&str, &str)] = &[
    ("CMResultsAdUrl_font-size", "ad_url_font_size"),
    ("CMResultsAdUrl_color", "ad_url_font_color"),
    ("CMResultsAdUrl_font-family", "ad_url_font-family"),
    ("CMResultsAdTitle_font-size", "ad_title_font_size"),
    ("CMResultsAdTitle_color", "ad_title_color"),
    ("CMResultsAdTitle_font-family", "ad_title_font_family"),
    ("CMResultsAdDescription_font-size", "ad_desc_font_size"),
    ("CMResultsAdDescription_color", "ad_desc_font_color"),
    ("CMResultsAdDescription_font-family", "ad_desc_font_family"),
    ("ResultsAdDescription_font-size", "ad_desc_desktop_font_size"),
    ("CustomResultsAdUrlBackGround_color", "ad_background"),
    ("CustomResultsAdUrlBorder_color", "ad_border_color"),
    ("CMContentArea_color", "body_background"),
    ("HeaderArea_color", "header_background"),
    ("AdBorder_color", "cta_border_color"),
    ("CMAdsLabel_color", "cta_background"),
    ("Bullet_font-size", "cta_text_font_size"),
    ("BulletText_color", "cta_text_font_color"),
    ("BulletShape_color", "chevron_color"),
    ("KeywordsHoverUnderline_checkbox", "title_hover_underline"),
    ("KeywordArea_color", "keyword_link_color"),
    ("relcontspan_font-family", "relcont_span_font_family"),
    ("HeaderText_font-size", "header_text_font_size"),
    ("HeaderText_color", "header_text_color"),
    ("HeaderText_textCase", "header_text_case"),
    ("HeaderText_tallness", "header_border_width"),
    ("HeaderText_border-style", "header_border_style"),
    ("CMResultsAdUrl_font-size_desktop", "ad_url_desktop_font_size"),
    ("CMResultsAdTitle_font-size_desktop", "ad_title_desktop_font_size"),
    ("AdBorder_color_desktop", "cta_border_desktop_color"),
    ("InnerBorder_color", "ad_url_font_color"),
    ("CallToAction_content", "cta_text"),
];

/// Immutable `(name, type) -> property id` table.
///
/// Keys are exact, case-sensitive `name_type` strings. A table is never
/// mutated after construction, so it can be shared freely between
/// conversions running on different threads.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: HashMap<String, String>,
}

impl MappingTable {
    /// The process-wide built-in table.
    pub fn builtin() -> &'static MappingTable {
        static BUILTIN: OnceLock<MappingTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let entries = BUILTIN_MAPPINGS
                .iter()
                .map(|(key, id)| (key.to_string(), id.to_string()))
                .collect();
            MappingTable { entries }
        })
    }

    /// Layer user mappings over the built-in table. User entries win on
    /// conflicting keys.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = Self::builtin().entries.clone();
        for (key, id) in overrides {
            let key = key.into();
            let id = id.into();
            log::debug!("Custom mapping: {} -> {}", key, id);
            entries.insert(key, id);
        }
        MappingTable { entries }
    }

    /// Build the lookup key for a `(name, type)` pair.
    pub fn key(name: &str, tag_type: &str) -> String {
        format!("{}_{}", name, tag_type)
    }

    pub fn lookup(&self, name: &str, tag_type: &str) -> Option<&str> {
        self.entries.get(&Self::key(name, tag_type)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
