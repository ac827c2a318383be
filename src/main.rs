// logcleave - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Logging initialisation (debug mode support)
// 3. Catalog / pattern-set loading (fatal before any file is touched)
// 4. Input discovery and run orchestration
// 5. Summary reporting

use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use logcleave::app::run;
use logcleave::core::discovery::{self, DiscoveryOptions};
use logcleave::core::model::{PruneSummary, RunSummary};
use logcleave::core::segment::compile_marker;
use logcleave::core::{catalog, prune};
use logcleave::util::error::{CleaveError, ConfigError, PatternFileError};
use logcleave::util::{constants, logging};

/// logcleave - pattern-driven log block extraction, routing, and pruning.
///
/// Splits log files into timestamp-delimited blocks and either routes each
/// block to the category files whose patterns it matches (`split`) or drops
/// blocks matching removal patterns (`prune`).
#[derive(Parser, Debug)]
#[command(name = "logcleave", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract blocks and route them to category files.
    Split(SplitArgs),

    /// Remove blocks matching removal patterns, writing cleaned copies.
    Prune(PruneArgs),

    /// Print an example configuration document and exit.
    SampleConfig,
}

/// Options shared by both processing commands.
#[derive(Args, Debug)]
struct InputArgs {
    /// Regular expression matched against input file names
    /// (e.g. '\.log$' or '.*\.log\..*').
    name_pattern: String,

    /// Directory searched for input files.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Block-boundary marker regex; a line matching it starts a new block.
    #[arg(long, default_value = constants::DEFAULT_BLOCK_MARKER)]
    marker: String,

    /// Descend into subdirectories.
    #[arg(long)]
    recursive: bool,
}

#[derive(Args, Debug)]
struct SplitArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Category configuration document (JSON, or TOML by extension).
    #[arg(long, default_value = constants::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory receiving category and unmatched files.
    #[arg(long, default_value = constants::DEFAULT_SPLIT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Worker threads for processing input files (1 = sequential).
    #[arg(long, default_value_t = 1)]
    jobs: usize,
}

#[derive(Args, Debug)]
struct PruneArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Removal-pattern file: one regex per line, '#' starts a comment.
    #[arg(long, default_value = constants::DEFAULT_PRUNE_PATTERNS_FILE)]
    patterns: PathBuf,

    /// Directory receiving the cleaned file copies.
    #[arg(long, default_value = constants::DEFAULT_PRUNE_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// List the matched files and ask for confirmation before processing.
    #[arg(long)]
    interactive: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug);

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "logcleave starting"
    );

    let result = match cli.command {
        Command::Split(args) => cmd_split(args),
        Command::Prune(args) => cmd_prune(args),
        Command::SampleConfig => {
            print!("{}", catalog::sample_config());
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Run aborted");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// =============================================================================
// split
// =============================================================================

fn cmd_split(args: SplitArgs) -> logcleave::util::error::Result<()> {
    // Catalog problems are fatal before any input file is touched: a partial
    // or ambiguous catalog is never used.
    let config_text =
        std::fs::read_to_string(&args.config).map_err(|e| ConfigError::Io {
            path: args.config.clone(),
            source: e,
        })?;
    let catalog = catalog::load(&config_text, &args.config)?;

    tracing::info!(
        config = %args.config.display(),
        categories = catalog.len(),
        "Catalog ready"
    );
    for category in catalog.iter() {
        tracing::debug!(
            category = %category.name,
            rules = category.rules.len(),
            keep_all_blocks = category.keep_all_blocks,
            "Category"
        );
    }

    let marker = compile_marker(&args.input.marker)?;
    let inputs = discover(&args.input, &args.output_dir)?;
    if inputs.is_empty() {
        println!(
            "No log files found matching '{}' in '{}'.",
            args.input.name_pattern,
            args.input.dir.display()
        );
        return Ok(());
    }

    let summary = run::run_split(&inputs, &catalog, &marker, &args.output_dir, args.jobs);
    print_split_summary(&summary, &args.output_dir);
    Ok(())
}

fn print_split_summary(summary: &RunSummary, output_dir: &PathBuf) {
    println!("--- Run Summary ---");
    println!("Files processed:  {}", summary.files_processed);
    println!("Files skipped:    {}", summary.files_skipped);
    println!("Blocks read:      {}", summary.blocks_read);
    println!("Blocks extracted: {}", summary.blocks_extracted);
    println!("Blocks unmatched: {}", summary.blocks_unmatched);
    if summary.write_errors > 0 {
        println!("Write errors:     {}", summary.write_errors);
    }
    for warning in &summary.warnings {
        eprintln!("warning: {warning}");
    }
    println!(
        "Extracted blocks are located in '{}/' ({:.1?}).",
        output_dir.display(),
        summary.duration
    );
}

// =============================================================================
// prune
// =============================================================================

fn cmd_prune(args: PruneArgs) -> logcleave::util::error::Result<()> {
    let pattern_text =
        std::fs::read_to_string(&args.patterns).map_err(|e| PatternFileError::Io {
            path: args.patterns.clone(),
            source: e,
        })?;
    let prune_set = prune::PruneSet::parse(&pattern_text, &args.patterns)?;

    if prune_set.is_empty() {
        tracing::warn!(
            file = %args.patterns.display(),
            "No removal patterns found; no blocks will be removed"
        );
    }
    for pattern in prune_set.pattern_strings() {
        tracing::debug!(pattern, "Removal pattern");
    }

    let marker = compile_marker(&args.input.marker)?;
    let inputs = discover(&args.input, &args.output_dir)?;
    if inputs.is_empty() {
        println!(
            "No log files found matching '{}' in '{}'.",
            args.input.name_pattern,
            args.input.dir.display()
        );
        return Ok(());
    }

    if args.interactive && !confirm_processing(&inputs) {
        println!("Processing cancelled.");
        return Ok(());
    }

    let summary = run::run_prune(&inputs, &prune_set, &marker, &args.output_dir);
    print_prune_summary(&summary, &args.output_dir);
    Ok(())
}

/// List the files about to be processed and ask for a y/n confirmation.
fn confirm_processing(inputs: &[PathBuf]) -> bool {
    println!("--- Files to be processed ---");
    for path in inputs {
        println!("- {}", path.display());
    }
    print!("Proceed with processing {} file(s)? (y/n): ", inputs.len());
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_prune_summary(summary: &PruneSummary, output_dir: &PathBuf) {
    println!("--- Run Summary ---");
    println!("Files processed:  {}", summary.files_processed);
    println!("Files skipped:    {}", summary.files_skipped);
    println!("Lines read:       {}", summary.lines_read);
    println!("Lines removed:    {}", summary.lines_removed);
    println!("Blocks processed: {}", summary.blocks_processed);
    println!("Blocks removed:   {}", summary.blocks_removed);
    println!("Blocks remained:  {:.2}%", summary.blocks_remaining_pct());
    println!("Lines remained:   {:.2}%", summary.lines_remaining_pct());
    for warning in &summary.warnings {
        eprintln!("warning: {warning}");
    }
    println!(
        "Cleaned files are located in '{}/' ({:.1?}).",
        output_dir.display(),
        summary.duration
    );
}

// =============================================================================
// Shared discovery wiring
// =============================================================================

fn discover(
    input: &InputArgs,
    output_dir: &PathBuf,
) -> Result<Vec<PathBuf>, CleaveError> {
    let name_pattern = discovery::compile_name_pattern(&input.name_pattern)?;

    let options = DiscoveryOptions {
        recursive: input.recursive,
        // Keep the run's own output out of its input set when it lives under
        // the scan root.
        exclude_dirs: vec![output_dir.clone(), input.dir.join(output_dir)],
        ..Default::default()
    };

    let (inputs, warnings) = discovery::discover_inputs(&input.dir, &name_pattern, &options)?;
    for warning in warnings {
        tracing::warn!(warning = %warning, "Discovery warning");
    }

    tracing::info!(files = inputs.len(), "Inputs discovered");
    Ok(inputs)
}
