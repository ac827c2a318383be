// logcleave - core/classify.rs
//
// Block classification against the category catalog.
// Core layer: pure logic, no I/O dependencies.
//
// Every category is evaluated independently — categories are never
// short-circuited against each other, so the set of (category, block) routes
// is a pure function of (block content, catalog) with no ordering
// dependency.

use crate::core::model::{Catalog, ClassificationResult, LogBlock};

/// Classify one block against the catalog.
///
/// A category matches when at least one line in the block matches at least
/// one of its rules (logical OR over lines × rules). Matching is
/// case-sensitive and applies to each line individually (terminator
/// stripped), never to the block as one string.
///
/// The block is retained in the per-source unmatched file when it matched no
/// category at all, when any matching rule of a matched category carries
/// `keep = true`, or when any matched category has `keep_all_blocks = true`.
pub fn classify(block: &LogBlock, catalog: &Catalog) -> ClassificationResult {
    let mut matched_categories = Vec::new();
    let mut keep_rule_hit = false;
    let mut keep_all_hit = false;

    for category in catalog.iter() {
        let mut matched = false;
        let mut keep = false;

        for rule in &category.rules {
            // Nothing left to learn from this rule once the category has
            // matched and the rule cannot raise the keep flag.
            if matched && (keep || !rule.keep) {
                continue;
            }
            if block.content_lines().any(|line| rule.regex.is_match(line)) {
                matched = true;
                keep |= rule.keep;
            }
            if matched && keep {
                break;
            }
        }

        if matched {
            matched_categories.push(category.name.clone());
            keep_rule_hit |= keep;
            keep_all_hit |= category.keep_all_blocks;
        }
    }

    let retain_in_unmatched = matched_categories.is_empty() || keep_rule_hit || keep_all_hit;

    ClassificationResult {
        matched_categories,
        retain_in_unmatched,
    }
}

// =============================================================================
// Tests
// =============================================================================
