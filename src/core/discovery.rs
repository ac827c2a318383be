// logcleave - core/discovery.rs
//
// Input file discovery: filename-regex selection over a directory.
//
// Architecture note: this module uses `walkdir` for traversal as an OS
// abstraction. It reads only directory entries and file types, never file
// contents — that boundary is owned by the app layer.
//
// Selection semantics: a file is included when the name pattern matches
// anywhere in its file name (regex search, not anchored), mirroring how the
// tool's name patterns are written (e.g. `\.log$` or `.*\.log\..*`).
// Results are sorted by path so processing order — and therefore output
// order — is deterministic.

use crate::util::constants;
use crate::util::error::DiscoveryError;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Options for a discovery pass.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Descend into subdirectories. Off by default: the tool historically
    /// operates on a flat directory of rotated logs.
    pub recursive: bool,

    /// Maximum recursion depth when `recursive` is set.
    pub max_depth: usize,

    /// Glob patterns: literal names prune directory descent, wildcard
    /// patterns filter file names.
    pub exclude_patterns: Vec<String>,

    /// Directories never descended into, regardless of patterns. Used to
    /// keep a run's own output directory out of its input set.
    pub exclude_dirs: Vec<PathBuf>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: constants::DEFAULT_MAX_DEPTH,
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude_dirs: Vec::new(),
        }
    }
}

/// Compile a filename pattern.
pub fn compile_name_pattern(pattern: &str) -> Result<Regex, DiscoveryError> {
    Regex::new(pattern).map_err(|e| DiscoveryError::InvalidNamePattern {
        pattern: pattern.to_string(),
        source: e,
    })
}

/// Discover input files under `root` whose names match `name_pattern`.
///
/// # Non-fatal errors
/// Entries that cannot be accessed are recorded as human-readable strings in
/// the returned warnings vector and do NOT cause the function to return
/// `Err`.
///
/// # Fatal errors
/// Returns `Err` only if the root path is invalid (`RootNotFound`,
/// `NotADirectory`).
pub fn discover_inputs(
    root: &Path,
    name_pattern: &Regex,
    options: &DiscoveryOptions,
) -> Result<(Vec<PathBuf>, Vec<String>), DiscoveryError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            })
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            })
        }
    }

    let max_depth = if options.recursive {
        options.max_depth.min(constants::ABSOLUTE_MAX_DEPTH)
    } else {
        1
    };

    tracing::debug!(
        root = %root.display(),
        pattern = %name_pattern,
        recursive = options.recursive,
        max_depth,
        "Discovery starting"
    );

    let exclude_pats = compile_globs(&options.exclude_patterns);
    let exclude_dirs = &options.exclude_dirs;

    let mut files: Vec<PathBuf> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let walker = walkdir::WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.file_type().is_dir() {
                if e.depth() == 0 {
                    return true; // always allow the root itself
                }
                if exclude_dirs.iter().any(|d| e.path() == d.as_path()) {
                    return false;
                }
                let name = e.file_name().to_str().unwrap_or("");
                return !is_excluded_component(name, &exclude_pats);
            }
            true
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                warnings.push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            }
        };

        if is_excluded_filename(file_name, &exclude_pats) {
            tracing::trace!(file = file_name, "Excluded by pattern");
            continue;
        }

        if !name_pattern.is_match(file_name) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort_unstable();

    tracing::debug!(
        files = files.len(),
        warnings = warnings.len(),
        "Discovery complete"
    );

    Ok((files, warnings))
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile a list of glob pattern strings, logging and skipping any that
/// fail compilation.
fn compile_globs(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

/// Returns true if `dir_name` matches any exclude pattern that contains no
/// wildcard characters. These are treated as directory component exclusions
/// (e.g. "node_modules", ".git") rather than filename glob patterns.
fn is_excluded_component(dir_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| {
        let s = p.as_str();
        !s.contains('*') && !s.contains('?') && !s.contains('[') && p.matches(dir_name)
    })
}

/// Returns true if `file_name` matches any exclude pattern (wildcard or
/// literal).
fn is_excluded_filename(file_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| p.matches(file_name))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_temp_tree() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();

        fs::write(root.join("b.log"), "two\n").expect("write b.log");
        fs::write(root.join("a.log"), "one\n").expect("write a.log");
        fs::write(root.join("notes.txt"), "not a log\n").expect("write notes.txt");
        fs::write(root.join("archive.log.gz"), "binary").expect("write .gz");

        let sub = root.join("subdir");
        fs::create_dir(&sub).expect("mkdir subdir");
        fs::write(sub.join("nested.log"), "three\n").expect("write nested.log");

        let node = root.join("node_modules");
        fs::create_dir(&node).expect("mkdir node_modules");
        fs::write(node.join("dep.log"), "dep\n").expect("write dep.log");

        dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_non_recursive_matches_sorted_root_files() {
        let dir = make_temp_tree();
        let pattern = compile_name_pattern(r"\.log$").unwrap();
        let (files, warnings) =
            discover_inputs(dir.path(), &pattern, &DiscoveryOptions::default()).unwrap();

        assert_eq!(names(&files), vec!["a.log", "b.log"], "sorted, root only");
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_pattern_is_search_not_anchored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("22_07.log.1"), "x\n").unwrap();
        fs::write(dir.path().join("other.txt"), "x\n").unwrap();

        let pattern = compile_name_pattern(r"\.log\.").unwrap();
        let (files, _) =
            discover_inputs(dir.path(), &pattern, &DiscoveryOptions::default()).unwrap();
        assert_eq!(names(&files), vec!["22_07.log.1"]);
    }

    #[test]
    fn test_recursive_descends_but_skips_excluded_dirs() {
        let dir = make_temp_tree();
        let pattern = compile_name_pattern(r"\.log$").unwrap();
        let options = DiscoveryOptions {
            recursive: true,
            ..Default::default()
        };
        let (files, _) = discover_inputs(dir.path(), &pattern, &options).unwrap();

        let found = names(&files);
        assert!(found.contains(&"nested.log".to_string()), "got {found:?}");
        assert!(
            !found.contains(&"dep.log".to_string()),
            "node_modules must be pruned"
        );
    }

    #[test]
    fn test_gz_archives_are_excluded() {
        let dir = make_temp_tree();
        let pattern = compile_name_pattern(r"\.log").unwrap();
        let (files, _) =
            discover_inputs(dir.path(), &pattern, &DiscoveryOptions::default()).unwrap();
        assert!(
            !names(&files).contains(&"archive.log.gz".to_string()),
            "gz should be excluded"
        );
    }

    #[test]
    fn test_output_dir_is_not_rediscovered() {
        let dir = make_temp_tree();
        let out = dir.path().join("processed");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("errors.log"), "previous run\n").unwrap();

        let pattern = compile_name_pattern(r"\.log$").unwrap();
        let options = DiscoveryOptions {
            recursive: true,
            exclude_dirs: vec![out],
            ..Default::default()
        };
        let (files, _) = discover_inputs(dir.path(), &pattern, &options).unwrap();
        assert!(
            !names(&files).contains(&"errors.log".to_string()),
            "a run must not consume its own output"
        );
    }

    #[test]
    fn test_root_not_found() {
        let pattern = compile_name_pattern(r"\.log$").unwrap();
        let result = discover_inputs(
            Path::new("/nonexistent/logcleave-test-path"),
            &pattern,
            &DiscoveryOptions::default(),
        );
        assert!(matches!(result, Err(DiscoveryError::RootNotFound { .. })));
    }

    #[test]
    fn test_root_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.log");
        fs::write(&file, "content").unwrap();
        let pattern = compile_name_pattern(r"\.log$").unwrap();
        let result = discover_inputs(&file, &pattern, &DiscoveryOptions::default());
        assert!(matches!(result, Err(DiscoveryError::NotADirectory { .. })));
    }

    #[test]
    fn test_invalid_name_pattern() {
        assert!(matches!(
            compile_name_pattern("[broken"),
            Err(DiscoveryError::InvalidNamePattern { .. })
        ));
    }
}
