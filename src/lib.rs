//! STL Tags Converter
//!
//! Converts markup written for the legacy templating dialect, where theme
//! values are declared with `<tagd:style name="..." value="..." type="..." />`,
//! into the successor dialect's `<tag:theme_prop:ID default="..." />` tags,
//! and offers the operations needed to edit and preview the result.
//!
//! # Basic Usage
//!
//! ```rust
//! use stlconv::convert;
//!
//! let html = r##"<body style="background: <tagd:style name="CMContentArea" value="#fff" type="color" />">"##;
//! assert_eq!(
//!     convert(html),
//!     r##"<body style="background: <tag:theme_prop:body_background default="#fff" />">"##
//! );
//! ```
//!
//! # Conversion Pipeline
//!
//! 1. **Recognize**: find legacy tags in both attribute orders
//! 2. **Rewrite**: map each `(name, type)` to a property identifier and emit
//!    canonical tags
//! 3. **Disambiguate**: rename repeated identifiers using the surrounding
//!    CSS context
//! 4. **Normalize**: collapse line breaks around the new tags
//!
//! None of these steps can fail. Tags that do not match the legacy grammar
//! are left as they are, unknown names get a derived identifier and
//! collisions that context cannot explain get a positional suffix.

pub mod error;
pub mod types;
pub mod mapping;
pub mod recognizer;
pub mod resolver;
pub mod rewriter;
pub mod canonical;
pub mod duplicates;
pub mod context;
pub mod disambiguator;
pub mod normalize;
pub mod properties;
pub mod cli;

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

// Re-export commonly used types and functions
pub use error::{ConverterError, Result};
pub use types::*;
pub use mapping::MappingTable;
pub use recognizer::TagRecognizer;
pub use resolver::{derive_identifier, NameResolver};
pub use rewriter::{canonical_tag, TagRewriter};
pub use duplicates::DuplicateDetector;
pub use context::{ContextClassifier, ContextSuffix};
pub use disambiguator::DuplicateResolver;
pub use normalize::normalize_whitespace;
pub use properties::{apply_edits, extract_properties, is_color_value, substitute_defaults};
pub use cli::ConverterCli;

/// Converter version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Conversion options and settings
#[derive(Debug, Clone, Default)]
pub struct ConverterOptions {
    /// Log every pipeline stage at info level
    pub debug_mode: bool,

    /// Extra `name_type -> property id` mappings layered over the built-in table
    pub custom_mappings: HashMap<String, String>,
}

/// Pipeline stages, in order. A stage with nothing to do passes its input
/// through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    Raw,
    LegacyMatched { pass: u8 },
    DuplicatesResolved,
    Normalized,
}

impl fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionStage::Raw => write!(f, "raw"),
            ConversionStage::LegacyMatched { pass } => write!(f, "legacy matched (pass {})", pass),
            ConversionStage::DuplicatesResolved => write!(f, "duplicates resolved"),
            ConversionStage::Normalized => write!(f, "normalized"),
        }
    }
}

/// Conversion statistics and metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    /// Input size in bytes
    pub source_size: u64,

    /// Output size in bytes
    pub output_size: u64,

    /// `<tagd:style` markers in the input, well-formed or not
    pub legacy_tag_count: usize,

    /// Legacy tags rewritten to canonical tags
    pub converted_count: usize,

    /// Markers that did not form a recognizable tag
    pub unrecognized_count: usize,

    /// Identifiers taken from the mapping table
    pub mapped_count: usize,

    /// Identifiers derived from the legacy name
    pub derived_count: usize,

    /// Identifiers shared by two or more tags before disambiguation
    pub duplicate_group_count: usize,

    /// Tags renamed during disambiguation
    pub renamed_count: usize,

    /// Renamed tags with no originating legacy tag
    pub correlation_miss_count: usize,

    /// Renamed tags that got a positional suffix
    pub positional_fallback_count: usize,

    /// Canonical tags in the output
    pub canonical_tag_count: usize,

    /// Conversion time in milliseconds
    pub convert_time_ms: u64,
}

/// Converted document together with its statistics.
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub output: String,
    pub stats: ConversionStats,
    pub renames: Vec<Rename>,
    /// Stages in the order they completed
    pub stages: Vec<ConversionStage>,
}

/// Runs the conversion pipeline against one mapping table.
pub struct Converter<'a> {
    table: &'a MappingTable,
    debug_mode: bool,
}

impl<'a> Converter<'a> {
    pub fn new(table: &'a MappingTable) -> Self {
        Self {
            table,
            debug_mode: false,
        }
    }

    pub fn with_debug(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    fn complete(&self, stages: &mut Vec<ConversionStage>, stage: ConversionStage) {
        stages.push(stage);
        if self.debug_mode {
            log::info!("Stage: {}", stage);
        } else {
            log::debug!("Stage: {}", stage);
        }
    }

    pub fn convert(&self, document: &str) -> ConversionReport {
        let start_time = Instant::now();
        let mut stats = ConversionStats {
            source_size: document.len() as u64,
            ..Default::default()
        };

        if document.trim().is_empty() {
            return ConversionReport {
                stats,
                ..Default::default()
            };
        }

        let mut stages = Vec::with_capacity(5);
        self.complete(&mut stages, ConversionStage::Raw);
        let recognizer = TagRecognizer::shared();
        let occurrences = recognizer.recognize(document);
        stats.legacy_tag_count = recognizer.count_markers(document);
        stats.converted_count = occurrences.len();
        stats.unrecognized_count = stats.legacy_tag_count.saturating_sub(occurrences.len());
        if stats.unrecognized_count > 0 {
            log::warn!(
                "{} legacy tag(s) could not be recognized and were left as-is",
                stats.unrecognized_count
            );
        }
        let rewriter = TagRewriter::new(NameResolver::new(self.table));
        let rewritten = rewriter.rewrite(document, &occurrences);
        stats.mapped_count = rewritten.mapped_count;
        stats.derived_count = rewritten.derived_count;
        // both passes are substituted in the single rewrite above
        for order in [AttributeOrder::NameValueType, AttributeOrder::TypeNameValue] {
            self.complete(&mut stages, ConversionStage::LegacyMatched { pass: order.pass() });
            log::debug!(
                "Pass {} rewrote {} tag(s)",
                order.pass(),
                occurrences.iter().filter(|o| o.order == order).count()
            );
        }

        let groups = DuplicateDetector::detect(&rewritten.text, &rewritten.tags);
        stats.duplicate_group_count = groups.len();
        let (resolved, renames) =
            DuplicateResolver::new(document, &occurrences).resolve(&rewritten.text, &groups);
        stats.renamed_count = renames.len();
        stats.correlation_miss_count = renames.iter().filter(|r| !r.correlated).count();
        stats.positional_fallback_count = renames
            .iter()
            .filter(|r| r.source == SuffixSource::Positional)
            .count();
        self.complete(&mut stages, ConversionStage::DuplicatesResolved);

        let output = normalize_whitespace(&resolved);
        self.complete(&mut stages, ConversionStage::Normalized);

        stats.output_size = output.len() as u64;
        stats.canonical_tag_count = canonical::scan(&output).len();
        stats.convert_time_ms = start_time.elapsed().as_millis() as u64;

        if self.debug_mode {
            log::info!(
                "Converted {} tags -> {} new tags ({} renamed)",
                stats.legacy_tag_count,
                stats.canonical_tag_count,
                stats.renamed_count
            );
            log::debug!("Full stats: {:?}", stats);
        }

        ConversionReport {
            output,
            stats,
            renames,
            stages,
        }
    }
}

/// Convert a document with the built-in mapping table.
pub fn convert(document: &str) -> String {
    Converter::new(MappingTable::builtin()).convert(document).output
}

/// Convert a document with custom options
pub fn convert_with_options(document: &str, options: &ConverterOptions) -> ConversionReport {
    if options.custom_mappings.is_empty() {
        Converter::new(MappingTable::builtin())
            .with_debug(options.debug_mode)
            .convert(document)
    } else {
        let table = MappingTable::with_overrides(options.custom_mappings.clone());
        Converter::new(&table)
            .with_debug(options.debug_mode)
            .convert(document)
    }
}

/// Convert a file and write the result to `output_path`.
pub fn convert_file(
    input_path: &str,
    output_path: &str,
    options: &ConverterOptions,
) -> Result<ConversionStats> {
    use std::fs;

    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::info!("Converting '{}' to '{}'...", input_path, output_path);
        log::debug!("Converter options: {:?}", options);
    }

    let source = fs::read_to_string(input_path).map_err(|e| ConverterError::FileNotFound {
        path: format!("{}: {}", input_path, e),
    })?;

    let report = convert_with_options(&source, options);

    fs::write(output_path, &report.output)?;

    Ok(report.stats)
}
