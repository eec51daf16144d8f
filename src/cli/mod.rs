//! CLI module for rising-stars
//!
//! This module provides:
//! - Command implementations (run, stats, export)
//! - Output handlers (console, JSON, quiet)

pub mod commands;
pub mod output;

pub use commands::{RunOptions, export_store, run_digest, show_stats};
pub use output::{OutputMode, create_handler};
