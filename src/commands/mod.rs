//! Command handlers module.
//!
//! - `split.rs`: Runs an export job and renders its progress
//! - `config.rs`: Configuration display command

mod config;
mod split;

pub use config::cmd_config;
pub use split::{SplitArgs, cmd_split};
