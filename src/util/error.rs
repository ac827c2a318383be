// logcleave - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; all errors preserve the causal chain
// for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all logcleave operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CleaveError {
    /// Category configuration loading or validation failed.
    Config(ConfigError),

    /// Removal-pattern file loading or validation failed.
    Patterns(PatternFileError),

    /// Input file discovery failed.
    Discovery(DiscoveryError),

    /// Block-boundary marker compilation failed.
    Segment(SegmentError),

    /// Writing a block to an output destination failed.
    Write(WriteError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for CleaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Patterns(e) => write!(f, "Pattern file error: {e}"),
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Segment(e) => write!(f, "Segmenter error: {e}"),
            Self::Write(e) => write!(f, "Write error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CleaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Patterns(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Segment(e) => Some(e),
            Self::Write(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors related to category configuration loading and validation.
///
/// Every validation variant names the offending category, and pattern-level
/// variants additionally carry the zero-based pattern index, so a broken
/// entry in a large configuration can be located without guesswork.
#[derive(Debug)]
pub enum ConfigError {
    /// JSON document could not be parsed.
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// TOML document could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The document root is not a mapping from category name to definition.
    NotAMapping { path: PathBuf },

    /// A category value has the wrong shape.
    InvalidCategory {
        category: String,
        reason: &'static str,
    },

    /// A category has no `patterns` list.
    MissingPatterns { category: String },

    /// A category has an empty `patterns` list.
    EmptyPatterns { category: String },

    /// A pattern entry is neither a string nor an object with a `pattern` key.
    InvalidPatternItem { category: String, index: usize },

    /// A pattern string failed to compile as a regular expression.
    InvalidRegex {
        category: String,
        index: usize,
        pattern: String,
        source: regex::Error,
    },

    /// A pattern string exceeds the maximum allowed length.
    RegexTooLong {
        category: String,
        index: usize,
        length: usize,
        max_length: usize,
    },

    /// I/O error reading the configuration file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonParse { path, source } => {
                write!(f, "Failed to parse JSON '{}': {source}", path.display())
            }
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse TOML '{}': {source}", path.display())
            }
            Self::NotAMapping { path } => write!(
                f,
                "'{}': document root must be a mapping from category name to \
                 definition",
                path.display()
            ),
            Self::InvalidCategory { category, reason } => {
                write!(f, "Category '{category}': {reason}")
            }
            Self::MissingPatterns { category } => {
                write!(f, "Category '{category}': missing 'patterns' list")
            }
            Self::EmptyPatterns { category } => {
                write!(f, "Category '{category}': 'patterns' list is empty")
            }
            Self::InvalidPatternItem { category, index } => write!(
                f,
                "Category '{category}': pattern #{index} must be a string \
                 or an object with a 'pattern' key"
            ),
            Self::InvalidRegex {
                category,
                index,
                pattern,
                source,
            } => write!(
                f,
                "Category '{category}': invalid regex in pattern #{index} \
                 ('{pattern}'): {source}"
            ),
            Self::RegexTooLong {
                category,
                index,
                length,
                max_length,
            } => write!(
                f,
                "Category '{category}': pattern #{index} is {length} chars, \
                 exceeds maximum of {max_length}"
            ),
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading configuration '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::JsonParse { source, .. } => Some(source),
            Self::TomlParse { source, .. } => Some(source),
            Self::InvalidRegex { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for CleaveError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Removal-pattern file errors
// ---------------------------------------------------------------------------

/// Errors related to the prune removal-pattern file.
#[derive(Debug)]
pub enum PatternFileError {
    /// A pattern failed to compile; `line` is the 1-based line number in the
    /// pattern file.
    InvalidRegex {
        path: PathBuf,
        line: usize,
        pattern: String,
        source: regex::Error,
    },

    /// A pattern exceeds the maximum allowed length.
    RegexTooLong {
        path: PathBuf,
        line: usize,
        length: usize,
        max_length: usize,
    },

    /// I/O error reading the pattern file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for PatternFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex {
                path,
                line,
                pattern,
                source,
            } => write!(
                f,
                "'{}' line {line}: invalid regex '{pattern}': {source}",
                path.display()
            ),
            Self::RegexTooLong {
                path,
                line,
                length,
                max_length,
            } => write!(
                f,
                "'{}' line {line}: pattern is {length} chars, exceeds maximum \
                 of {max_length}",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading pattern file '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for PatternFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<PatternFileError> for CleaveError {
    fn from(e: PatternFileError) -> Self {
        Self::Patterns(e)
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to input file discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The search root does not exist.
    RootNotFound { path: PathBuf },

    /// The search root is not a directory.
    NotADirectory { path: PathBuf },

    /// The filename pattern failed to compile.
    InvalidNamePattern {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Search path '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Search path '{}' is not a directory", path.display())
            }
            Self::InvalidNamePattern { pattern, source } => {
                write!(f, "Invalid file name pattern '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidNamePattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for CleaveError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Segmenter errors
// ---------------------------------------------------------------------------

/// Errors related to block segmentation setup.
#[derive(Debug)]
pub enum SegmentError {
    /// The block-boundary marker regex is invalid.
    InvalidMarker {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMarker { pattern, source } => {
                write!(f, "Invalid block marker '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for SegmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidMarker { source, .. } => Some(source),
        }
    }
}

impl From<SegmentError> for CleaveError {
    fn from(e: SegmentError) -> Self {
        Self::Segment(e)
    }
}

// ---------------------------------------------------------------------------
// Write errors
// ---------------------------------------------------------------------------

/// Errors related to writing blocks to output destinations.
///
/// Always scoped to a single destination so a failed write never aborts the
/// run, and so the orchestrator can avoid counting the affected block as
/// extracted.
#[derive(Debug)]
pub enum WriteError {
    /// The output directory could not be created.
    CreateDir { path: PathBuf, source: io::Error },

    /// The destination file could not be opened.
    Open { path: PathBuf, source: io::Error },

    /// Appending a block to the destination failed.
    Append { path: PathBuf, source: io::Error },
}

impl WriteError {
    /// The destination path this error is scoped to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::CreateDir { path, .. } | Self::Open { path, .. } | Self::Append { path, .. } => {
                path
            }
        }
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(
                    f,
                    "Cannot create output directory '{}': {source}",
                    path.display()
                )
            }
            Self::Open { path, source } => {
                write!(f, "Cannot open destination '{}': {source}", path.display())
            }
            Self::Append { path, source } => {
                write!(
                    f,
                    "Cannot append block to '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. }
            | Self::Open { source, .. }
            | Self::Append { source, .. } => Some(source),
        }
    }
}

impl From<WriteError> for CleaveError {
    fn from(e: WriteError) -> Self {
        Self::Write(e)
    }
}

/// Convenience type alias for logcleave results.
pub type Result<T> = std::result::Result<T, CleaveError>;
