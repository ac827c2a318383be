// logcleave - core/catalog.rs
//
// Category configuration loading, normalization, and compilation.
// Core layer: accepts document strings, never touches the filesystem.
// I/O is handled by main, which feeds content here.
//
// The document maps category names to pattern definitions:
//
//   {
//     "errors.log": {
//       "patterns": ["error", {"pattern": "fail", "keep": true}],
//       "keep_all_blocks": false
//     }
//   }
//
// A bare string and an object with a `pattern` key are the two accepted
// pattern shapes; both normalize into the same compiled PatternRule so
// matching logic never branches on the original representation. Category
// declaration order is preserved for deterministic iteration and logging.

use crate::core::model::{Catalog, OutputCategory, PatternRule};
use crate::util::constants;
use crate::util::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

// =============================================================================
// Raw document shapes
// =============================================================================

/// Raw category definition as deserialized from the document, before
/// validation and regex compilation.
#[derive(Debug, Deserialize)]
struct CategoryDoc {
    patterns: Option<Vec<Value>>,
    #[serde(default)]
    keep_all_blocks: bool,
}

/// Raw pattern entry: a bare string, or an object with `pattern` and an
/// optional `keep` flag.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternItem {
    Bare(String),
    Spec {
        pattern: String,
        #[serde(default)]
        keep: bool,
    },
}

/// Load a configuration document into a compiled `Catalog`.
///
/// The format is chosen by the file extension of `source_path`: `.toml`
/// parses as TOML, anything else as JSON (the canonical format).
/// `source_path` is otherwise used for error messages only.
///
/// Fails with a `ConfigError` naming the category (and pattern index where
/// applicable) on any structural or regex problem. Loading happens once,
/// before any file is processed; the Catalog is read-only afterwards.
pub fn load(content: &str, source_path: &Path) -> Result<Catalog, ConfigError> {
    let doc = parse_document(content, source_path)?;
    compile_document(&doc, source_path)
}

/// The canonical example configuration document, shown by `sample-config`.
pub fn sample_config() -> &'static str {
    include_str!("../../samples/logcleave.json")
}

// =============================================================================
// Document parsing
// =============================================================================

/// Parse the raw document text into a JSON value tree.
///
/// TOML documents are converted into the same value shape so the validation
/// walk below handles both front-ends identically.
fn parse_document(content: &str, source_path: &Path) -> Result<Value, ConfigError> {
    let is_toml = source_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    if is_toml {
        let value: toml::Value = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
            path: source_path.to_path_buf(),
            source: e,
        })?;
        serde_json::to_value(value).map_err(|e| ConfigError::JsonParse {
            path: source_path.to_path_buf(),
            source: e,
        })
    } else {
        serde_json::from_str(content).map_err(|e| ConfigError::JsonParse {
            path: source_path.to_path_buf(),
            source: e,
        })
    }
}

// =============================================================================
// Validation and compilation
// =============================================================================

/// Walk the parsed document and compile it into a `Catalog`.
fn compile_document(doc: &Value, source_path: &Path) -> Result<Catalog, ConfigError> {
    let mapping = doc.as_object().ok_or_else(|| ConfigError::NotAMapping {
        path: source_path.to_path_buf(),
    })?;

    let mut categories = Vec::with_capacity(mapping.len());
    for (name, def) in mapping {
        categories.push(compile_category(name, def)?);
    }

    tracing::debug!(
        categories = categories.len(),
        rules = categories.iter().map(|c| c.rules.len()).sum::<usize>(),
        "Catalog loaded"
    );

    Ok(Catalog::new(categories))
}

/// Compile one category definition.
fn compile_category(name: &str, def: &Value) -> Result<OutputCategory, ConfigError> {
    let doc: CategoryDoc =
        serde_json::from_value(def.clone()).map_err(|_| ConfigError::InvalidCategory {
            category: name.to_string(),
            reason: "definition must be an object with a 'patterns' list and \
                     an optional boolean 'keep_all_blocks'",
        })?;

    let patterns = doc.patterns.ok_or_else(|| ConfigError::MissingPatterns {
        category: name.to_string(),
    })?;

    if patterns.is_empty() {
        return Err(ConfigError::EmptyPatterns {
            category: name.to_string(),
        });
    }

    let mut rules = Vec::with_capacity(patterns.len());
    for (index, item) in patterns.iter().enumerate() {
        rules.push(compile_rule(name, index, item)?);
    }

    Ok(OutputCategory {
        name: name.to_string(),
        rules,
        keep_all_blocks: doc.keep_all_blocks,
    })
}

/// Normalize one pattern entry into a compiled rule.
///
/// A bare string becomes `{regex, keep: false}`; an object with a `pattern`
/// key becomes `{regex, keep: keep-or-false}`. Anything else is rejected
/// with the category and pattern index.
fn compile_rule(category: &str, index: usize, item: &Value) -> Result<PatternRule, ConfigError> {
    let item: PatternItem =
        serde_json::from_value(item.clone()).map_err(|_| ConfigError::InvalidPatternItem {
            category: category.to_string(),
            index,
        })?;

    let (pattern, keep) = match item {
        PatternItem::Bare(pattern) => (pattern, false),
        PatternItem::Spec { pattern, keep } => (pattern, keep),
    };

    let regex = compile_regex(category, index, &pattern)?;
    Ok(PatternRule { regex, keep })
}

/// Compile a regex pattern with length validation to prevent ReDoS.
fn compile_regex(category: &str, index: usize, pattern: &str) -> Result<Regex, ConfigError> {
    if pattern.len() > constants::MAX_REGEX_PATTERN_LENGTH {
        return Err(ConfigError::RegexTooLong {
            category: category.to_string(),
            index,
            length: pattern.len(),
            max_length: constants::MAX_REGEX_PATTERN_LENGTH,
        });
    }

    Regex::new(pattern).map_err(|e| ConfigError::InvalidRegex {
        category: category.to_string(),
        index,
        pattern: pattern.to_string(),
        source: e,
    })
}

// =============================================================================
// Tests
// =============================================================================
