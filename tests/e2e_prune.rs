// logcleave - tests/e2e_prune.rs
//
// End-to-end tests for the prune pipeline: real pattern file on disk, real
// input files, real cleaned copies in the output directory.

use logcleave::app::run::run_prune;
use logcleave::core::prune::PruneSet;
use logcleave::core::segment::compile_marker;
use logcleave::util::constants;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Helpers
// =============================================================================

fn marker() -> Regex {
    compile_marker(constants::DEFAULT_BLOCK_MARKER).unwrap()
}

fn load_pattern_file(dir: &Path, content: &str) -> PruneSet {
    let path = dir.join("prune-patterns.conf");
    fs::write(&path, content).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    PruneSet::parse(&text, &path).unwrap()
}

fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Pruning
// =============================================================================

const NOISY_INPUT: &str = concat!(
    "header before any marker\n",
    "[10:00:00,001] INFO startup complete\n",
    "[10:00:00,002] DEBUG heartbeat tick\n",
    "  heartbeat detail line\n",
    "[10:00:00,003] ERROR something real\n",
    "  at stack::frame\n",
    "[10:00:00,004] DEBUG heartbeat tick\n",
);

/// Blocks whose lines match a removal pattern are dropped whole, including
/// their continuation lines; everything else is copied verbatim and in
/// order.
#[test]
fn e2e_prune_drops_whole_matching_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "app.log", NOISY_INPUT);
    let patterns = load_pattern_file(
        dir.path(),
        "# drop the periodic noise\nheartbeat\n",
    );
    let out = dir.path().join("out");

    let summary = run_prune(&[input], &patterns, &marker(), &out);

    assert_eq!(summary.files_processed, 1);
    // 1 leading block + 4 marker blocks.
    assert_eq!(summary.blocks_processed, 5);
    assert_eq!(summary.blocks_removed, 2);
    assert_eq!(summary.lines_read, 7);
    assert_eq!(summary.lines_removed, 3);

    assert_eq!(
        fs::read_to_string(out.join("app.log")).unwrap(),
        concat!(
            "header before any marker\n",
            "[10:00:00,001] INFO startup complete\n",
            "[10:00:00,003] ERROR something real\n",
            "  at stack::frame\n",
        )
    );
}

/// Percentages in the summary agree with the removed/kept split.
#[test]
fn e2e_prune_percentages() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        "app.log",
        concat!(
            "[10:00:00,001] keep\n",
            "[10:00:00,002] drop this one\n",
            "[10:00:00,003] keep\n",
            "[10:00:00,004] keep\n",
        ),
    );
    let patterns = load_pattern_file(dir.path(), "drop this\n");
    let out = dir.path().join("out");

    let summary = run_prune(&[input], &patterns, &marker(), &out);

    assert_eq!(summary.blocks_processed, 4);
    assert_eq!(summary.blocks_removed, 1);
    assert!((summary.blocks_remaining_pct() - 75.0).abs() < f64::EPSILON);
    assert!((summary.lines_remaining_pct() - 75.0).abs() < f64::EPSILON);
}

/// An empty pattern file (comments only) removes nothing: the cleaned copy
/// is byte-identical to the input.
#[test]
fn e2e_prune_empty_pattern_set_copies_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "app.log", NOISY_INPUT);
    let patterns = load_pattern_file(dir.path(), "# nothing to remove\n\n");
    let out = dir.path().join("out");

    let summary = run_prune(&[input], &patterns, &marker(), &out);

    assert_eq!(summary.blocks_removed, 0);
    assert_eq!(
        fs::read_to_string(out.join("app.log")).unwrap(),
        NOISY_INPUT
    );
}

/// Each input file gets its own cleaned copy under the output directory.
#[test]
fn e2e_prune_copies_are_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let input_a = write_input(dir.path(), "a.log", "[10:00:00,001] drop me\n");
    let input_b = write_input(dir.path(), "b.log", "[10:00:00,002] keep me\n");
    let patterns = load_pattern_file(dir.path(), "drop me\n");
    let out = dir.path().join("out");

    let summary = run_prune(&[input_a, input_b], &patterns, &marker(), &out);

    assert_eq!(summary.files_processed, 2);
    assert_eq!(fs::read_to_string(out.join("a.log")).unwrap(), "");
    assert_eq!(
        fs::read_to_string(out.join("b.log")).unwrap(),
        "[10:00:00,002] keep me\n"
    );
}

/// Re-running prune overwrites the previous copy instead of appending to it.
#[test]
fn e2e_prune_rerun_overwrites_copy() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "app.log", "[10:00:00,001] keep me\n");
    let patterns = load_pattern_file(dir.path(), "nothing-matches\n");
    let out = dir.path().join("out");

    run_prune(&[input.clone()], &patterns, &marker(), &out);
    run_prune(&[input], &patterns, &marker(), &out);

    assert_eq!(
        fs::read_to_string(out.join("app.log")).unwrap(),
        "[10:00:00,001] keep me\n",
        "rerun must not duplicate content"
    );
}
