//! Command line interface for powledger

pub mod commands;
pub mod demo;
pub mod inspect;

pub use commands::run_cli;
