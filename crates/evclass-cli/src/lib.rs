//! Event classification CLI library.
//!
//! This crate provides the CLI interface for the event classifier.

mod cli;
pub mod commands;
mod config;
pub mod series_file;

pub use cli::{Cli, Commands, SeriesArgs};
pub use config::Config;
