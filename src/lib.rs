//! Sample Merge
//!
//! Merges a collection of sampling-profiler sample stores into one
//! cumulative store, summing per-address hit counts. Also decodes the
//! encoded sample filenames the sampling daemon produces back into the
//! profiled binary, dependent library, and event configuration.
//!
//! This crate provides the core implementation for the
//! `sample-merge` CLI tool.

pub mod commands;
pub mod fileset;
pub mod merge;
pub mod parser;
pub mod store;
pub mod utils;
