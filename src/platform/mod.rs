// logcleave - platform/mod.rs
//
// Platform/filesystem helper layer.

pub mod fs;
