//! Trace handler for store events.
//!
//! Every scalar or array-element store made by the interpreter is reported
//! as one line (`x = 3`, `a[2] = 7`). Where those lines go is up to the
//! host:
//! - Stdout: the command-line default
//! - Buffer: captured for tests and embedding hosts
//! - Silent: discarded
//!
//! Uses enum dispatch instead of trait objects since a line is reported on
//! every store.

use parking_lot::Mutex;

/// Writes each trace line to stdout.
#[derive(Default)]
pub struct StdoutTraceHandler;

impl StdoutTraceHandler {
    pub fn record(&self, line: &str) {
        println!("{line}");
    }

    /// Stdout does not capture.
    pub fn get_output(&self) -> String {
        String::new()
    }
}

/// Captures trace lines in memory, one per line.
pub struct BufferTraceHandler {
    buffer: Mutex<String>,
}

impl BufferTraceHandler {
    pub fn new() -> Self {
        BufferTraceHandler {
            buffer: Mutex::new(String::new()),
        }
    }

    pub fn record(&self, line: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(line);
        buf.push('\n');
    }

    /// All captured lines, newline-terminated.
    pub fn get_output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Default for BufferTraceHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Trace handler implementation using enum dispatch.
pub enum TraceHandlerImpl {
    /// Writes to stdout (default).
    Stdout(StdoutTraceHandler),
    /// Captures to a buffer.
    Buffer(BufferTraceHandler),
    /// Discards every line.
    Silent,
}

impl TraceHandlerImpl {
    /// Report one store event.
    pub fn record(&self, line: &str) {
        match self {
            Self::Stdout(h) => h.record(line),
            Self::Buffer(h) => h.record(line),
            Self::Silent => {}
        }
    }

    /// Captured output. Empty for handlers that don't capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Stdout(h) => h.get_output(),
            Self::Buffer(h) => h.get_output(),
            Self::Silent => String::new(),
        }
    }

    /// Captured output split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.get_output().lines().map(str::to_owned).collect()
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }

    /// Whether recorded lines go anywhere at all.
    ///
    /// Lets the interpreter skip formatting when nobody listens.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Silent)
    }
}

/// Trace handler shared between the interpreter and its host.
pub type SharedTraceHandler = std::sync::Arc<TraceHandlerImpl>;

/// Create a stdout trace handler.
pub fn stdout_handler() -> SharedTraceHandler {
    std::sync::Arc::new(TraceHandlerImpl::Stdout(StdoutTraceHandler))
}

/// Create a buffer trace handler for capturing store lines.
pub fn buffer_handler() -> SharedTraceHandler {
    std::sync::Arc::new(TraceHandlerImpl::Buffer(BufferTraceHandler::new()))
}

/// Create a trace handler that discards everything.
pub fn silent_handler() -> SharedTraceHandler {
    std::sync::Arc::new(TraceHandlerImpl::Silent)
}
