//! CLI subcommand implementations.

pub mod identities;
pub mod series;
pub mod session;
pub mod util;
