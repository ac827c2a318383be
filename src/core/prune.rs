// logcleave - core/prune.rs
//
// Removal-pattern parsing and the block-removal decision for `prune`.
// Core layer: accepts pattern-file content, never touches the filesystem.
//
// The pattern file lists one regular expression per line. Blank lines and
// lines starting with '#' are ignored. A block is removed when any of its
// lines matches any pattern.

use crate::core::model::LogBlock;
use crate::util::constants;
use crate::util::error::PatternFileError;
use regex::Regex;
use std::path::Path;

/// One compiled removal pattern, tagged with its pattern-file line number
/// for diagnostics.
#[derive(Debug, Clone)]
pub struct PrunePattern {
    /// 1-based line number in the pattern file.
    pub line: usize,

    /// Compiled pattern.
    pub regex: Regex,
}

/// The loaded set of removal patterns.
#[derive(Debug, Clone, Default)]
pub struct PruneSet {
    patterns: Vec<PrunePattern>,
}

impl PruneSet {
    /// Parse pattern-file content into a compiled set.
    ///
    /// `source_path` is used for error messages only. Each pattern is
    /// compiled individually so a broken entry is reported with its line
    /// number instead of failing as one opaque alternation.
    pub fn parse(content: &str, source_path: &Path) -> Result<Self, PatternFileError> {
        let mut patterns = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if trimmed.len() > constants::MAX_REGEX_PATTERN_LENGTH {
                return Err(PatternFileError::RegexTooLong {
                    path: source_path.to_path_buf(),
                    line: line_no,
                    length: trimmed.len(),
                    max_length: constants::MAX_REGEX_PATTERN_LENGTH,
                });
            }

            let regex = Regex::new(trimmed).map_err(|e| PatternFileError::InvalidRegex {
                path: source_path.to_path_buf(),
                line: line_no,
                pattern: trimmed.to_string(),
                source: e,
            })?;

            patterns.push(PrunePattern {
                line: line_no,
                regex,
            });
        }

        tracing::debug!(
            patterns = patterns.len(),
            file = %source_path.display(),
            "Removal patterns loaded"
        );

        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Pattern source strings, for startup logging.
    pub fn pattern_strings(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.regex.as_str())
    }

    /// Whether a block should be removed: true when any of its lines matches
    /// any pattern. An empty set removes nothing.
    pub fn should_remove(&self, block: &LogBlock) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        block
            .content_lines()
            .any(|line| self.patterns.iter().any(|p| p.regex.is_match(line)))
    }
}

// =============================================================================
// Tests
// =============================================================================
