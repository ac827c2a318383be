// logcleave - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no CLI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use regex::Regex;
use std::path::PathBuf;

// =============================================================================
// Pattern rules and categories
// =============================================================================

/// A single compiled routing rule inside a category.
///
/// The configuration's dual representation (bare string vs. object with
/// `keep`) is resolved into this one shape at load time; matching logic never
/// sees the original form.
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Compiled pattern, tested against each line of a block.
    pub regex: Regex,

    /// When true, a block matched by this rule is also retained in the
    /// per-source unmatched file.
    pub keep: bool,
}

/// A named output destination governed by one or more rules.
#[derive(Debug, Clone)]
pub struct OutputCategory {
    /// Category name; doubles as the destination file name under the output
    /// directory.
    pub name: String,

    /// Rules in declaration order.
    pub rules: Vec<PatternRule>,

    /// When true, every block routed to this category is also retained in
    /// the per-source unmatched file.
    pub keep_all_blocks: bool,
}

/// The complete, loaded category configuration.
///
/// Categories keep their declaration order from the configuration document.
/// Order is irrelevant to match semantics but keeps iteration, logging, and
/// summary output deterministic.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<OutputCategory>,
}

impl Catalog {
    pub fn new(categories: Vec<OutputCategory>) -> Self {
        Self { categories }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutputCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }
}

// =============================================================================
// Log blocks
// =============================================================================

/// A maximal run of consecutive lines treated as one classification unit.
///
/// Begins at a boundary-marker line, or at file start for a leading
/// headerless block. Lines carry their original terminators so the writer
/// can reproduce the input bytes verbatim; they are never reordered or
/// mutated after segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBlock {
    /// Path of the file this block was read from.
    pub source_file: PathBuf,

    /// Raw lines, terminator-inclusive, in original order.
    pub lines: Vec<String>,

    /// 1-based line number in the source file where this block begins.
    pub start_line: u64,
}

impl LogBlock {
    /// Iterate the block's lines with trailing `\r\n`/`\n` stripped.
    ///
    /// Classification matches against these; the raw `lines` are what gets
    /// written out.
    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|l| l.trim_end_matches('\n').trim_end_matches('\r'))
    }

    /// Total byte length of the block as written to a destination.
    pub fn byte_len(&self) -> usize {
        self.lines.iter().map(|l| l.len()).sum()
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Routing decision for one block, derived purely from (block, catalog).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassificationResult {
    /// Names of matched categories, in catalog declaration order.
    pub matched_categories: Vec<String>,

    /// Whether the block is also retained in the per-source unmatched file.
    pub retain_in_unmatched: bool,
}

// =============================================================================
// Run summaries
// =============================================================================

/// Summary statistics for a completed split run.
///
/// Per-invocation local state threaded through the orchestrator, never
/// process-wide — keeps runs independent and the orchestrator testable in
/// isolation.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Files successfully opened and processed.
    pub files_processed: usize,

    /// Files skipped because they could not be read.
    pub files_skipped: usize,

    /// Blocks read across all processed files.
    pub blocks_read: usize,

    /// Successful (category, block) write events.
    pub blocks_extracted: usize,

    /// Blocks written to a per-source unmatched file.
    pub blocks_unmatched: usize,

    /// Writes that failed against their destination.
    pub write_errors: usize,

    /// Per-file breakdown, in processing order.
    pub file_summaries: Vec<FileSummary>,

    /// Non-fatal warnings surfaced during the run.
    pub warnings: Vec<String>,

    /// Wall-clock run duration.
    pub duration: std::time::Duration,
}

/// Per-file split statistics.
#[derive(Debug, Clone)]
pub struct FileSummary {
    pub path: PathBuf,
    pub blocks_read: usize,
    pub blocks_extracted: usize,
    pub blocks_unmatched: usize,
}

/// Summary statistics for a completed prune run.
#[derive(Debug, Clone, Default)]
pub struct PruneSummary {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub lines_read: usize,
    pub lines_removed: usize,
    pub blocks_processed: usize,
    pub blocks_removed: usize,

    /// Non-fatal warnings surfaced during the run.
    pub warnings: Vec<String>,

    /// Wall-clock run duration.
    pub duration: std::time::Duration,
}

impl PruneSummary {
    /// Percentage of blocks that survived pruning (100.0 when none were read).
    pub fn blocks_remaining_pct(&self) -> f64 {
        if self.blocks_processed == 0 {
            return 100.0;
        }
        let remained = self.blocks_processed - self.blocks_removed;
        remained as f64 / self.blocks_processed as f64 * 100.0
    }

    /// Percentage of lines that survived pruning (100.0 when none were read).
    pub fn lines_remaining_pct(&self) -> f64 {
        if self.lines_read == 0 {
            return 100.0;
        }
        let remained = self.lines_read - self.lines_removed;
        remained as f64 / self.lines_read as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_lines_strip_terminators_only() {
        let block = LogBlock {
            source_file: PathBuf::from("a.log"),
            lines: vec![
                "[12:00:00,001] start \n".to_string(),
                "tab\t\r\n".to_string(),
                "no terminator".to_string(),
            ],
            start_line: 1,
        };
        let stripped: Vec<&str> = block.content_lines().collect();
        // Interior whitespace survives; only line terminators are removed.
        assert_eq!(stripped, vec!["[12:00:00,001] start ", "tab\t", "no terminator"]);
    }

    #[test]
    fn test_byte_len_counts_terminators() {
        let block = LogBlock {
            source_file: PathBuf::from("a.log"),
            lines: vec!["ab\n".to_string(), "c".to_string()],
            start_line: 1,
        };
        assert_eq!(block.byte_len(), 4);
    }

    #[test]
    fn test_prune_percentages() {
        let summary = PruneSummary {
            blocks_processed: 4,
            blocks_removed: 1,
            lines_read: 10,
            lines_removed: 5,
            ..Default::default()
        };
        assert_eq!(summary.blocks_remaining_pct(), 75.0);
        assert_eq!(summary.lines_remaining_pct(), 50.0);
    }

    #[test]
    fn test_prune_percentages_empty_run() {
        let summary = PruneSummary::default();
        assert_eq!(summary.blocks_remaining_pct(), 100.0);
        assert_eq!(summary.lines_remaining_pct(), 100.0);
    }
}
