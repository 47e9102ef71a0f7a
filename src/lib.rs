//! sms-merge library
//!
//! This crate provides the core functionality for the `sms-merge` binary.
//! Keep the crate root minimal; implementation and tests live in their modules.
//!
//! ## Overview
//!
//! The library turns call-log and SMS backup exports into one time-ordered JSON
//! dataset:
//!
//! - [`parser`] - Discovers exports, decompresses them and flattens each XML record
//!   into a [`models::Record`], in parallel
//! - [`snapshot`] - Binary intermediate format between the parse and merge stages
//! - [`merge`] - Content fingerprints, deduplication, timestamp resolution, stable
//!   sorting and JSON output
//! - [`cli`] - Command-line interface wiring the stages together
//! - [`config`] - Pipeline defaults and TOML configuration
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use sms_merge::{config::ResolvedConfig, merge, parser, errors::AppResult};
//! use std::path::Path;
//!
//! # fn example() -> AppResult<()> {
//! let config = ResolvedConfig::default();
//! let outcome = parser::parse_directory(Path::new("backups"), config.workers)?;
//!
//! let date_parser = merge::FormatDateParser::from_config(&config)?;
//! let merged = merge::merge_records(
//!     outcome.records,
//!     &merge::MergeOptions::from(&config),
//!     &date_parser,
//! )?;
//! merge::write_json(&config.output_json, &merged)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod merge;
pub mod models;
pub mod parser;
pub mod snapshot;
pub mod ui;
pub mod utils;
