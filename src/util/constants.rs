// logcleave - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "logcleave";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Block segmentation
// =============================================================================

/// Default block-boundary marker: a `[HH:MM:SS,mmm]` timestamp token at the
/// start of a line. Every line matching this regex opens a new block; all
/// following non-marker lines (stack traces, wrapped messages) belong to it.
pub const DEFAULT_BLOCK_MARKER: &str = r"^\[\d{2}:\d{2}:\d{2},\d{3}\]";

// =============================================================================
// Configuration
// =============================================================================

/// Default category configuration file for `split`.
pub const DEFAULT_CONFIG_FILE: &str = "logcleave.json";

/// Default removal-pattern file for `prune`.
pub const DEFAULT_PRUNE_PATTERNS_FILE: &str = "prune-patterns.conf";

/// Default output directory for `split`.
pub const DEFAULT_SPLIT_OUTPUT_DIR: &str = "processed";

/// Default output directory for `prune`.
pub const DEFAULT_PRUNE_OUTPUT_DIR: &str = "pruned";

/// Suffix appended to a source file name to form its unmatched residue file.
pub const UNMATCHED_SUFFIX: &str = "_unmatched.log";

/// Maximum regex pattern length to prevent ReDoS.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4_096;

// =============================================================================
// Discovery limits
// =============================================================================

/// Maximum directory recursion depth when `--recursive` is given.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Hard upper bound on recursion depth (prevents infinite traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 50;

/// Default exclude glob patterns for input discovery. Literal names prune
/// directory descent; wildcard patterns filter file names.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "*.gz",
    "*.zip",
    "*.bak",
    "*.tmp",
    "node_modules",
    ".git",
];

// =============================================================================
// I/O limits
// =============================================================================

/// File size (bytes) above which input files are read via memory mapping
/// instead of a heap buffer.
pub const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024; // 100 MB

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
