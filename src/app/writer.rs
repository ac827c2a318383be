// logcleave - app/writer.rs
//
// Block persistence. Appends whole blocks to category destinations and
// per-source unmatched files under the output directory.
//
// Atomicity contract: a block is committed to each destination as a single
// contiguous write of its joined lines, under that destination's lock, so a
// block never interleaves with another block's lines in the same file —
// including when input files are processed in parallel. The writer never
// flushes partial blocks; an interrupted run leaves only fully-written
// blocks behind.

use crate::core::model::LogBlock;
use crate::util::constants;
use crate::util::error::WriteError;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Append-mode writer over one output directory.
///
/// Destination files (and the directory itself) are created lazily on first
/// write; handles stay open and are reused for the rest of the run.
pub struct OutputWriter {
    output_dir: PathBuf,
    handles: Mutex<HashMap<PathBuf, Arc<Mutex<File>>>>,
}

impl OutputWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            handles: Mutex::new(HashMap::new()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Destination file name for a source file's unmatched residue.
    pub fn unmatched_destination(source_file: &Path) -> String {
        let name = source_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());
        format!("{name}{}", constants::UNMATCHED_SUFFIX)
    }

    /// Append one block to `destination` (a file name under the output
    /// directory), verbatim and in original line order.
    ///
    /// Errors are scoped to the destination; other destinations and the rest
    /// of the run are unaffected.
    pub fn append_block(&self, destination: &str, block: &LogBlock) -> Result<(), WriteError> {
        let handle = self.handle_for(destination)?;

        // Join the block's raw lines into one buffer so the commit below is
        // a single contiguous write under the destination lock.
        let mut buf = Vec::with_capacity(block.byte_len());
        for line in &block.lines {
            buf.extend_from_slice(line.as_bytes());
        }

        let mut file = handle.lock().expect("destination lock poisoned");
        file.write_all(&buf).map_err(|e| WriteError::Append {
            path: self.output_dir.join(destination),
            source: e,
        })
    }

    /// Fetch or lazily create the handle for a destination.
    fn handle_for(&self, destination: &str) -> Result<Arc<Mutex<File>>, WriteError> {
        let key = Path::new(destination);
        let mut handles = self.handles.lock().expect("handle map lock poisoned");
        if let Some(handle) = handles.get(key) {
            return Ok(Arc::clone(handle));
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|e| WriteError::CreateDir {
            path: self.output_dir.clone(),
            source: e,
        })?;

        let path = self.output_dir.join(destination);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| WriteError::Open {
                path: path.clone(),
                source: e,
            })?;

        tracing::debug!(destination = %path.display(), "Opened output destination");

        let handle = Arc::new(Mutex::new(file));
        handles.insert(key.to_path_buf(), Arc::clone(&handle));
        Ok(handle)
    }
}

// =============================================================================
// Tests
// =============================================================================
