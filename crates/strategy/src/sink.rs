use common::LogTarget;
use tracing::info;

/// Destination for strategy lifecycle lines.
pub trait LogSink: Send {
    fn emit(&mut self, line: &str);
}

/// Emits each line as an `info` event on target `strategy::events`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&mut self, line: &str) {
        info!(target: "strategy::events", "{line}");
    }
}

/// Prints each line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        println!("{line}");
    }
}

/// In-memory capture.
impl LogSink for Vec<String> {
    fn emit(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

impl<L: LogSink + ?Sized> LogSink for Box<L> {
    fn emit(&mut self, line: &str) {
        (**self).emit(line)
    }
}

/// Sink matching the configured target.
pub fn sink_for(target: LogTarget) -> Box<dyn LogSink> {
    match target {
        LogTarget::Tracing => Box::new(TracingSink),
        LogTarget::Stdout => Box::new(StdoutSink),
    }
}
