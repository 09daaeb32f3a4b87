//! orgtree: an organizational tree of positioned nodes
//!
//! Layers, innermost first:
//! - `domain`: node tree, record codec, hit testing and title search (no I/O)
//! - `application`: editing session and document service
//! - `infrastructure`: filesystem and command runner, service wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
