//! # loantrack
//!
//! Server and CLI around [`loantrack_core`]. The binary in `main.rs` is a
//! thin wrapper over [`cli::execute`]; the modules are public so that
//! integration tests can drive the router directly.

pub mod api;
pub mod cli;
pub mod config;
