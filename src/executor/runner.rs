//! Bounded-concurrency task runner
//!
//! [`TaskRunner::run`] admits tasks in the order given, keeps at most
//! `concurrency` of them in flight and drives each through its
//! build-then-push pipeline. A single coordinating future owns the in-flight
//! set; concurrency comes from the child processes the executor launches.
//!
//! Failure is fail-fast: after the first failed step no further task is
//! admitted, tasks already in flight run to completion, and the run reports
//! the first failure in completion order.
//!
//! Each step is announced on the runner's [`OutputSink`] as
//! `building <image>` or `pushing <image>` right before it starts.

use super::errors::RunError;
use super::sink::ConsoleSink;
use super::traits::{Invocation, OutputSink, ProcessExecutor};
use crate::build::{BuildStep, BuildTask, TaskState};
use crate::infrastructure::{ImageBuilder, RunOptions};
use futures::stream::{FuturesUnordered, StreamExt};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Counts for a run in which every admitted task succeeded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tasks admitted
    pub admitted: usize,
    /// Build steps run
    pub built: usize,
    /// Push steps run
    pub pushed: usize,
}

/// What one finished task actually did
#[derive(Debug, Clone, Copy, Default)]
struct TaskReport {
    built: bool,
    pushed: bool,
}

/// Runs build tasks through a [`ProcessExecutor`]
pub struct TaskRunner<E> {
    executor: E,
    builder: ImageBuilder,
    options: RunOptions,
    sink: Arc<dyn OutputSink>,
    states: Mutex<Vec<TaskState>>,
}

impl<E: ProcessExecutor> TaskRunner<E> {
    /// Creates a runner that announces steps on the console
    pub fn new(executor: E, options: RunOptions) -> Self {
        Self {
            executor,
            builder: ImageBuilder::new(options.builder.clone()),
            options,
            sink: Arc::new(ConsoleSink),
            states: Mutex::new(Vec::new()),
        }
    }

    /// Sets where `building`/`pushing` announcements go
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Options in use
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// The executor
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// State of each task of the latest run, by position in its task list
    pub fn task_states(&self) -> Vec<TaskState> {
        self.states.lock().clone()
    }

    /// Invocations a fully successful run would issue, in admission order
    pub fn plan(&self, tasks: &[BuildTask]) -> Vec<Invocation> {
        tasks
            .iter()
            .flat_map(|task| {
                let build = self
                    .options
                    .do_build
                    .then(|| self.builder.build_invocation(task, self.options.verbose));
                let push = self
                    .options
                    .do_push
                    .then(|| self.builder.push_invocation(task));
                build.into_iter().chain(push)
            })
            .collect()
    }

    /// Runs `tasks` and returns the first failure, if any
    ///
    /// # Errors
    ///
    /// Returns [`RunError::TaskFailed`] for the first step that failed.
    pub async fn run(&self, tasks: &[BuildTask]) -> Result<RunSummary, RunError> {
        let concurrency = self.options.effective_concurrency();
        let start = Instant::now();

        info!(
            tasks = tasks.len(),
            concurrency,
            build = self.options.do_build,
            push = self.options.do_push,
            "Starting run"
        );

        *self.states.lock() = vec![TaskState::Pending; tasks.len()];

        let mut pending = tasks.iter().enumerate();
        let mut in_flight = FuturesUnordered::new();
        let mut first_failure: Option<RunError> = None;
        let mut summary = RunSummary::default();

        loop {
            while first_failure.is_none() && in_flight.len() < concurrency {
                let Some((index, task)) = pending.next() else {
                    break;
                };
                debug!(index, image = %task.image(), in_flight = in_flight.len() + 1, "Admitting task");
                summary.admitted += 1;
                in_flight.push(self.run_task(index, task));
            }

            let Some((index, result)) = in_flight.next().await else {
                break;
            };
            let image = tasks[index].image();

            match result {
                Ok(_) if first_failure.is_some() => {
                    warn!(index, image, outcome = "succeeded", "In-flight task finished after failure");
                }
                Ok(report) => {
                    summary.built += usize::from(report.built);
                    summary.pushed += usize::from(report.pushed);
                    debug!(index, image, "Task finished");
                }
                Err(err) if first_failure.is_none() => {
                    error!(index, image, error = %err, "Task failed, no further tasks will be admitted");
                    first_failure = Some(err);
                }
                Err(err) => {
                    warn!(index, image, outcome = "failed", error = %err, "In-flight task finished after failure");
                }
            }
        }

        let duration_ms = start.elapsed().as_millis();
        match first_failure {
            Some(err) => {
                info!(admitted = summary.admitted, duration_ms, "Run failed");
                Err(err)
            }
            None => {
                info!(
                    admitted = summary.admitted,
                    built = summary.built,
                    pushed = summary.pushed,
                    duration_ms,
                    "Run completed"
                );
                Ok(summary)
            }
        }
    }

    /// Build then push one task; a failed build skips the push
    async fn run_task(
        &self,
        index: usize,
        task: &BuildTask,
    ) -> (usize, Result<TaskReport, RunError>) {
        let mut report = TaskReport::default();

        if self.options.do_build {
            if let Err(err) = self.run_step(index, task, BuildStep::Build).await {
                return (index, Err(err));
            }
            report.built = true;
        }

        if self.options.do_push {
            if let Err(err) = self.run_step(index, task, BuildStep::Push).await {
                return (index, Err(err));
            }
            report.pushed = true;
        }

        self.transition(index, task, TaskState::Done);
        (index, Ok(report))
    }

    async fn run_step(
        &self,
        index: usize,
        task: &BuildTask,
        step: BuildStep,
    ) -> Result<(), RunError> {
        let (invocation, announcement) = match step {
            BuildStep::Build => (
                self.builder.build_invocation(task, self.options.verbose),
                "building",
            ),
            BuildStep::Push => (self.builder.push_invocation(task), "pushing"),
        };

        self.sink.stdout_line(&format!("{announcement} {}", task.image()));
        self.transition(index, task, TaskState::running(step));
        info!(image = %task.image(), %step, "Step started");

        self.executor
            .execute(&invocation)
            .await
            .map_err(|source| {
                self.transition(index, task, TaskState::Failed);
                RunError::TaskFailed {
                    image: task.image().to_string(),
                    step,
                    source,
                }
            })
    }

    fn transition(&self, index: usize, task: &BuildTask, to: TaskState) {
        let mut states = self.states.lock();
        let Some(state) = states.get_mut(index) else {
            return;
        };
        debug_assert!(!state.is_terminal(), "task {index} left terminal state {state}");
        debug!(index, image = %task.image(), from = %state, %to, "State transition");
        *state = to;
    }
}

impl<E: fmt::Debug> fmt::Debug for TaskRunner<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRunner")
            .field("executor", &self.executor)
            .field("builder", &self.builder)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
