// logcleave - core/segment.rs
//
// Block segmentation: splits a file's text into an ordered, lazy sequence of
// LogBlocks. Core layer: accepts string content, never touches the
// filesystem.
//
// A new block begins at every line matching the boundary marker (by default a
// `[HH:MM:SS,mmm]` timestamp token at line start); all following non-marker
// lines belong to the current block. Lines before the first marker form a
// synthetic leading block. The segmenter performs no filtering or validation
// of line content — every input line lands in exactly one block, verbatim.

use crate::core::model::LogBlock;
use crate::util::error::SegmentError;
use regex::Regex;
use std::iter::Peekable;
use std::path::Path;
use std::str::SplitInclusive;

/// Compile a block-boundary marker pattern.
pub fn compile_marker(pattern: &str) -> Result<Regex, SegmentError> {
    Regex::new(pattern).map_err(|e| SegmentError::InvalidMarker {
        pattern: pattern.to_string(),
        source: e,
    })
}

/// Lazy iterator of `LogBlock`s over one file's content.
///
/// One segmenter per file; construct a new one to restart. Lines are split
/// terminator-inclusively so blocks reproduce the input bytes exactly; the
/// marker is tested against each line with its terminator stripped.
pub struct BlockSegmenter<'a> {
    source_file: &'a Path,
    marker: &'a Regex,
    lines: Peekable<SplitInclusive<'a, char>>,
    /// 1-based line number of the next unconsumed line.
    line_no: u64,
}

impl<'a> BlockSegmenter<'a> {
    pub fn new(content: &'a str, source_file: &'a Path, marker: &'a Regex) -> Self {
        Self {
            source_file,
            marker,
            lines: content.split_inclusive('\n').peekable(),
            line_no: 1,
        }
    }
}

impl Iterator for BlockSegmenter<'_> {
    type Item = LogBlock;

    fn next(&mut self) -> Option<LogBlock> {
        // The first available line always opens a block: either it is a
        // marker line, or it belongs to the synthetic leading block of a
        // file that does not start on a marker.
        let first = self.lines.next()?;
        let start_line = self.line_no;
        self.line_no += 1;

        let mut lines = vec![first.to_string()];
        while let Some(line) = self.lines.peek() {
            if self.marker.is_match(trim_terminator(line)) {
                break;
            }
            lines.push((*line).to_string());
            self.lines.next();
            self.line_no += 1;
        }

        Some(LogBlock {
            source_file: self.source_file.to_path_buf(),
            lines,
            start_line,
        })
    }
}

/// Strip a single trailing `\n` or `\r\n` from a raw line.
fn trim_terminator(line: &str) -> &str {
    line.trim_end_matches('\n').trim_end_matches('\r')
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants;
    use std::path::PathBuf;

    fn default_marker() -> Regex {
        compile_marker(constants::DEFAULT_BLOCK_MARKER).unwrap()
    }

    fn segment(content: &str) -> Vec<LogBlock> {
        let marker = default_marker();
        let path = PathBuf::from("test.log");
        BlockSegmenter::new(content, &path, &marker).collect()
    }

    #[test]
    fn test_marker_lines_open_blocks() {
        let content = "[10:48:42,953] first\n\
                       continuation one\n\
                       continuation two\n\
                       [10:48:43,000] second\n";
        let blocks = segment(content);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines.len(), 3);
        assert_eq!(blocks[0].start_line, 1);
        assert_eq!(blocks[1].lines.len(), 1);
        assert_eq!(blocks[1].start_line, 4);
    }

    #[test]
    fn test_leading_lines_form_synthetic_block() {
        let content = "header without marker\n\
                       another header line\n\
                       [10:48:42,953] first real block\n";
        let blocks = segment(content);
        assert_eq!(blocks.len(), 2, "leading lines are kept, not dropped");
        assert_eq!(
            blocks[0].lines,
            vec!["header without marker\n", "another header line\n"]
        );
        assert_eq!(blocks[1].start_line, 3);
    }

    #[test]
    fn test_empty_file_yields_no_blocks() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_final_block_without_trailing_marker() {
        let content = "[10:48:42,953] start\n\
                       trailing line with no newline at EOF";
        let blocks = segment(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].lines[1], "trailing line with no newline at EOF",
            "final line survives without a terminator"
        );
    }

    /// A file with N marker lines produces exactly N blocks (no leading
    /// content here), each a single line.
    #[test]
    fn test_marker_only_file() {
        let content = "[10:00:00,001] a\n[10:00:00,002] b\n[10:00:00,003] c\n";
        let blocks = segment(content);
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| b.lines.len() == 1));
    }

    /// Concatenating every block's raw lines reproduces the input bytes —
    /// segmentation is lossless.
    #[test]
    fn test_segmentation_is_lossless() {
        let content = "preamble\r\n\
                       [10:48:42,953] one\n\
                       detail \t line\n\
                       [10:48:43,000] two\n\
                       tail without newline";
        let blocks = segment(content);
        let reassembled: String = blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .map(String::as_str)
            .collect();
        assert_eq!(reassembled, content);
    }

    #[test]
    fn test_crlf_marker_lines_are_recognised() {
        let content = "[10:48:42,953] one\r\n[10:48:43,000] two\r\n";
        let blocks = segment(content);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines[0], "[10:48:42,953] one\r\n");
    }

    /// Two segmenters over the same content produce identical sequences.
    #[test]
    fn test_restartable_per_file() {
        let content = "x\n[10:48:42,953] one\ny\n[10:48:43,000] two\n";
        assert_eq!(segment(content), segment(content));
    }

    #[test]
    fn test_custom_marker() {
        let marker = compile_marker(r"^---").unwrap();
        let path = PathBuf::from("notes.log");
        let content = "--- section one\nbody\n--- section two\n";
        let blocks: Vec<_> = BlockSegmenter::new(content, &path, &marker).collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines.len(), 2);
    }

    #[test]
    fn test_invalid_marker_is_rejected() {
        assert!(matches!(
            compile_marker("[unclosed"),
            Err(SegmentError::InvalidMarker { .. })
        ));
    }

    /// A mid-line timestamp must not open a block: the marker is anchored to
    /// line start.
    #[test]
    fn test_mid_line_timestamp_does_not_split() {
        let content = "[10:48:42,953] one\nsaw [10:48:43,000] in message\n";
        let blocks = segment(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 2);
    }
}
