// logcleave - app/run.rs
//
// Run orchestration: drives input files through segmentation, classification,
// and writing, accumulating per-invocation counters.
//
// Error policy:
//   - A catalog or pattern-file problem never reaches this module; loading is
//     fatal upstream, before any input file is touched.
//   - An unreadable input file is skipped with a warning; the run continues.
//   - A failed destination write is counted and surfaced, and the affected
//     (category, block) write is NOT counted as extracted.

use crate::app::writer::OutputWriter;
use crate::core::classify::classify;
use crate::core::model::{Catalog, FileSummary, PruneSummary, RunSummary};
use crate::core::prune::PruneSet;
use crate::core::segment::BlockSegmenter;
use crate::platform::fs as pfs;
use rayon::prelude::*;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

// =============================================================================
// Split
// =============================================================================

/// Outcome of processing a single input file.
struct FileOutcome {
    /// Per-file counters; `None` when the file was skipped as unreadable.
    summary: Option<FileSummary>,
    warnings: Vec<String>,
    write_errors: usize,
}

/// Run the split pipeline over `inputs` (already sorted by the caller).
///
/// Sequential when `jobs <= 1` — the reproducibility baseline: identical
/// inputs into a fresh output directory give byte-identical files. With
/// `jobs > 1` the input files are processed in parallel; per-destination
/// locking in the writer keeps every block contiguous in its destinations.
pub fn run_split(
    inputs: &[PathBuf],
    catalog: &Catalog,
    marker: &Regex,
    output_dir: &Path,
    jobs: usize,
) -> RunSummary {
    let started = Instant::now();
    let writer = OutputWriter::new(output_dir.to_path_buf());

    tracing::info!(
        files = inputs.len(),
        categories = catalog.len(),
        jobs = jobs.max(1),
        output_dir = %output_dir.display(),
        "Split run starting"
    );

    let outcomes: Vec<FileOutcome> = if jobs > 1 {
        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(|| {
                inputs
                    .par_iter()
                    .map(|path| split_one_file(path, catalog, marker, &writer))
                    .collect()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Thread pool setup failed; running sequentially");
                inputs
                    .iter()
                    .map(|path| split_one_file(path, catalog, marker, &writer))
                    .collect()
            }
        }
    } else {
        inputs
            .iter()
            .map(|path| split_one_file(path, catalog, marker, &writer))
            .collect()
    };

    // Outcomes arrive in input order from both the sequential and the
    // parallel path, so the merged summary is deterministic either way.
    let mut summary = RunSummary::default();
    for outcome in outcomes {
        summary.write_errors += outcome.write_errors;
        summary.warnings.extend(outcome.warnings);
        match outcome.summary {
            Some(file_summary) => {
                summary.files_processed += 1;
                summary.blocks_read += file_summary.blocks_read;
                summary.blocks_extracted += file_summary.blocks_extracted;
                summary.blocks_unmatched += file_summary.blocks_unmatched;
                summary.file_summaries.push(file_summary);
            }
            None => summary.files_skipped += 1,
        }
    }
    summary.duration = started.elapsed();

    tracing::info!(
        files_processed = summary.files_processed,
        files_skipped = summary.files_skipped,
        blocks_read = summary.blocks_read,
        blocks_extracted = summary.blocks_extracted,
        blocks_unmatched = summary.blocks_unmatched,
        write_errors = summary.write_errors,
        "Split run complete"
    );

    summary
}

/// Process one input file: segment, classify, route.
fn split_one_file(
    path: &Path,
    catalog: &Catalog,
    marker: &Regex,
    writer: &OutputWriter,
) -> FileOutcome {
    let content = match pfs::read_file_lossy(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = format!("Cannot read '{}': {e}", path.display());
            tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable input");
            return FileOutcome {
                summary: None,
                warnings: vec![msg],
                write_errors: 0,
            };
        }
    };

    let unmatched_dest = OutputWriter::unmatched_destination(path);
    let mut blocks_read = 0usize;
    let mut blocks_extracted = 0usize;
    let mut blocks_unmatched = 0usize;
    let mut write_errors = 0usize;
    let mut warnings = Vec::new();

    for block in BlockSegmenter::new(&content, path, marker) {
        blocks_read += 1;
        let result = classify(&block, catalog);

        for category in &result.matched_categories {
            match writer.append_block(category, &block) {
                Ok(()) => blocks_extracted += 1,
                Err(e) => {
                    write_errors += 1;
                    tracing::warn!(
                        destination = %e.path().display(),
                        source = %path.display(),
                        error = %e,
                        "Block write failed"
                    );
                    warnings.push(e.to_string());
                }
            }
        }

        if result.retain_in_unmatched {
            match writer.append_block(&unmatched_dest, &block) {
                Ok(()) => blocks_unmatched += 1,
                Err(e) => {
                    write_errors += 1;
                    tracing::warn!(
                        destination = %e.path().display(),
                        source = %path.display(),
                        error = %e,
                        "Unmatched write failed"
                    );
                    warnings.push(e.to_string());
                }
            }
        }
    }

    tracing::info!(
        file = %path.display(),
        blocks_read,
        blocks_extracted,
        blocks_unmatched,
        "File processed"
    );

    FileOutcome {
        summary: Some(FileSummary {
            path: path.to_path_buf(),
            blocks_read,
            blocks_extracted,
            blocks_unmatched,
        }),
        warnings,
        write_errors,
    }
}

// =============================================================================
// Prune
// =============================================================================

/// Per-file prune counters, merged into the run summary only when the whole
/// file was written successfully.
#[derive(Default)]
struct PruneCounts {
    lines_read: usize,
    lines_removed: usize,
    blocks_processed: usize,
    blocks_removed: usize,
}

/// Run the prune pipeline over `inputs` (already sorted by the caller).
///
/// Each surviving block is copied, in order, to `<output_dir>/<file name>`;
/// blocks with any line matching the removal set are dropped whole.
pub fn run_prune(
    inputs: &[PathBuf],
    prune_set: &PruneSet,
    marker: &Regex,
    output_dir: &Path,
) -> PruneSummary {
    let started = Instant::now();
    let mut summary = PruneSummary::default();

    tracing::info!(
        files = inputs.len(),
        patterns = prune_set.len(),
        output_dir = %output_dir.display(),
        "Prune run starting"
    );

    for path in inputs {
        match prune_one_file(path, prune_set, marker, output_dir) {
            Ok(counts) => {
                summary.files_processed += 1;
                summary.lines_read += counts.lines_read;
                summary.lines_removed += counts.lines_removed;
                summary.blocks_processed += counts.blocks_processed;
                summary.blocks_removed += counts.blocks_removed;
                tracing::info!(
                    file = %path.display(),
                    lines_read = counts.lines_read,
                    lines_removed = counts.lines_removed,
                    blocks_removed = counts.blocks_removed,
                    "File pruned"
                );
            }
            Err(e) => {
                let msg = format!("Error processing '{}': {e}", path.display());
                tracing::warn!(file = %path.display(), error = %e, "Skipping file");
                summary.warnings.push(msg);
                summary.files_skipped += 1;
            }
        }
    }
    summary.duration = started.elapsed();

    tracing::info!(
        files_processed = summary.files_processed,
        files_skipped = summary.files_skipped,
        blocks_removed = summary.blocks_removed,
        lines_removed = summary.lines_removed,
        "Prune run complete"
    );

    summary
}

/// Prune one file into a fresh copy under the output directory.
fn prune_one_file(
    path: &Path,
    prune_set: &PruneSet,
    marker: &Regex,
    output_dir: &Path,
) -> std::io::Result<PruneCounts> {
    let content = pfs::read_file_lossy(path)?;

    std::fs::create_dir_all(output_dir)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());
    let out_path = output_dir.join(file_name);
    let mut out = std::fs::File::create(&out_path)?;

    let mut counts = PruneCounts::default();
    for block in BlockSegmenter::new(&content, path, marker) {
        counts.blocks_processed += 1;
        counts.lines_read += block.lines.len();

        if prune_set.should_remove(&block) {
            counts.blocks_removed += 1;
            counts.lines_removed += block.lines.len();
            continue;
        }

        // One contiguous write per surviving block.
        let mut buf = Vec::with_capacity(block.byte_len());
        for line in &block.lines {
            buf.extend_from_slice(line.as_bytes());
        }
        out.write_all(&buf)?;
    }
    out.flush()?;

    Ok(counts)
}

// =============================================================================
// Tests
// =============================================================================
