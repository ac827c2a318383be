// logcleave - util/mod.rs
//
// Cross-cutting utilities: errors, logging, constants.

pub mod constants;
pub mod error;
pub mod logging;
