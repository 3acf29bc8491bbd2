//! Output sinks for captured child processes

use super::traits::OutputSink;
use parking_lot::Mutex;

/// Writes stdout lines to the console's stdout and stderr lines to its stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn stdout_line(&self, line: &str) {
        println!("{line}");
    }

    fn stderr_line(&self, line: &str) {
        eprintln!("{line}");
    }
}

/// Which stream a captured line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

/// Keeps every captured line in memory, in arrival order
#[derive(Debug, Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<(Stream, String)>>,
}

impl CollectingSink {
    /// Creates an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines seen so far
    #[must_use]
    pub fn lines(&self) -> Vec<(Stream, String)> {
        self.lines.lock().clone()
    }

    /// Lines from one stream only
    #[must_use]
    pub fn stream(&self, stream: Stream) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

impl OutputSink for CollectingSink {
    fn stdout_line(&self, line: &str) {
        self.lines.lock().push((Stream::Stdout, line.to_string()));
    }

    fn stderr_line(&self, line: &str) {
        self.lines.lock().push((Stream::Stderr, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_keeps_streams_apart() {
        let sink = CollectingSink::new();
        sink.stdout_line("one");
        sink.stderr_line("oops");
        sink.stdout_line("two");

        assert_eq!(sink.stream(Stream::Stdout), vec!["one", "two"]);
        assert_eq!(sink.stream(Stream::Stderr), vec!["oops"]);
        assert_eq!(sink.lines().len(), 3);
    }
}
