//! Execution layer
//!
//! This module contains the process executor, its output sinks and the
//! bounded-concurrency task runner.

mod errors;
mod process;
mod runner;
mod sink;
mod traits;

pub use errors::{ProcessError, RunError};
pub use process::LocalExecutor;
pub use runner::{RunSummary, TaskRunner};
pub use sink::{CollectingSink, ConsoleSink, Stream};
pub use traits::{Invocation, OutputSink, ProcessExecutor};
