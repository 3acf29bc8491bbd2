//! Infrastructure layer
//!
//! This module contains external integrations and adapters.

mod config;
pub mod docker;
mod logging;

pub use config::RunOptions;
pub use docker::{DEFAULT_BUILDER, ImageBuilder};
pub use logging::init_logging;
