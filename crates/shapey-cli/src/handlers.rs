//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod combine;
mod completions;
mod config;
mod pipeline;
mod shape;
pub mod utils;

pub use combine::handle_combine;
pub use completions::handle_completions;
pub use config::handle_config;
pub use pipeline::handle_pipeline;
pub use shape::handle_shape;
