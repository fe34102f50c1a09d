//! Run files: loading, `--set` overrides, and merging with command-line
//! arguments into the core configuration types.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
