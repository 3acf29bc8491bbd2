//! imagesmith - build and push container images from a build configuration
//!
//! Reads `build-config.json` from an image repository, expands it into one
//! image per base version and installer variant, then builds (and
//! optionally pushes) them with a docker-compatible CLI.
//!
//! ## Quick Start
//!
//! ```bash
//! # Build every image of ~/images/toolbox, two at a time
//! imagesmith --image-repositories-directory ~/images --parallelism 2 toolbox
//!
//! # Push previously built images without rebuilding
//! imagesmith --no-build-images --push-images toolbox
//!
//! # Show the commands without running them
//! imagesmith --dry-run toolbox
//! ```

use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if std::env::var("IMAGESMITH_VERBOSE").is_ok() {
                eprintln!("{:?}", e);
            }
            ExitCode::FAILURE
        }
    }
}
