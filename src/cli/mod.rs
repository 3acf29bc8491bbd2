//! Command-line interface for imagesmith
//!
//! Resolves the repository and its build configuration, expands it into
//! build tasks and runs them:
//!
//! ```bash
//! imagesmith --image-repositories-directory ~/images toolbox --parallelism 4 --push-images
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use imagesmith::build::{
    DEFAULT_CONFIG_FILE, ExpandOptions, OutputMode, RepositoryLocation, expand,
};
use imagesmith::executor::{LocalExecutor, TaskRunner};
use imagesmith::infrastructure::{DEFAULT_BUILDER, RunOptions, init_logging};
use std::path::PathBuf;

/// CLI arguments for imagesmith
#[derive(Parser, Debug)]
#[command(name = "imagesmith")]
#[command(author, version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Args {
    /// The directory holding all image repositories
    #[arg(long, default_value = ".")]
    image_repositories_directory: PathBuf,

    /// The name of the repository to build as an image
    #[arg(long)]
    repository: Option<String>,

    /// Repository name, when --repository is not given
    #[arg(value_name = "REPOSITORY")]
    repository_arg: Option<String>,

    /// The name of the build configuration file inside the repository
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,

    /// Skip the build step and only push
    #[arg(long)]
    no_build_images: bool,

    /// Push images after building them
    #[arg(long)]
    push_images: bool,

    /// Pass the quiet flag to the builder and skip the task listing
    #[arg(short, long)]
    quiet: bool,

    /// How many images are processed in parallel (values below 1 mean 1)
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    parallelism: i64,

    /// Image builder program
    #[arg(long, default_value = DEFAULT_BUILDER)]
    builder: String,

    /// Read builder output line by line instead of sharing the console
    #[arg(long)]
    capture_output: bool,

    /// Print the commands that would run and exit
    #[arg(long)]
    dry_run: bool,

    /// Log level for diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn repository_name(&self) -> Option<&str> {
        self.repository
            .as_deref()
            .or(self.repository_arg.as_deref())
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            do_build: !self.no_build_images,
            do_push: self.push_images,
            verbose: !self.quiet,
            builder: self.builder.clone(),
            output_mode: if self.capture_output {
                OutputMode::Capture
            } else {
                OutputMode::Inherit
            },
            ..RunOptions::default()
        }
        .with_parallelism(self.parallelism)
    }
}

/// Parse and execute CLI arguments
pub async fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let repository = args
        .repository_name()
        .context("Please specify a repository with the --repository flag")?;

    let location = RepositoryLocation::resolve(
        &args.image_repositories_directory,
        repository,
        &args.config_file,
    )?;
    let config = location.load()?;
    let options = args.run_options();

    let tasks = expand(
        &config,
        &ExpandOptions::new(&location.repository_path).with_output_mode(options.output_mode),
    );

    if options.verbose {
        let listing =
            serde_json::to_string_pretty(&tasks).context("Failed to render the task list")?;
        println!("{listing}");
    }

    let runner = TaskRunner::new(LocalExecutor::new(), options);

    if args.dry_run {
        for invocation in runner.plan(&tasks) {
            println!("{invocation}");
        }
        return Ok(());
    }

    if tasks.is_empty() {
        tracing::warn!(repository, "Configuration produced no build tasks");
    }

    let summary = runner.run(&tasks).await?;
    tracing::info!(
        admitted = summary.admitted,
        built = summary.built,
        pushed = summary.pushed,
        "All tasks completed"
    );

    println!("done");
    Ok(())
}
