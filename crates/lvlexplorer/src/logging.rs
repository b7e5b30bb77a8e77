//! Log setup: stderr output plus an in-memory copy for the log panel.
use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
struct Lines {
    lines: VecDeque<String>,
    capacity: usize,
}

/// Shared ring of formatted log lines.
#[derive(Clone, Debug)]
pub struct LogBuffer {
    inner: Arc<Mutex<Lines>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Lines {
                lines: VecDeque::new(),
                capacity: capacity.max(1),
            })),
        }
    }

    pub fn set_capacity(&self, capacity: usize) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.capacity = capacity.max(1);
            while inner.lines.len() > inner.capacity {
                inner.lines.pop_front();
            }
        }
    }

    pub fn push(&self, line: String) {
        if let Ok(mut inner) = self.inner.lock() {
            if inner.lines.len() == inner.capacity {
                inner.lines.pop_front();
            }
            inner.lines.push_back(line);
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.lines.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for LogBuffer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        self.push(format!(
            "{:>5} {}{}",
            event.metadata().level().as_str(),
            visitor.message,
            visitor.fields
        ));
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init(buffer: LogBuffer) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(buffer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_captured_with_level() {
        let buffer = LogBuffer::new(8);
        let subscriber = tracing_subscriber::registry().with(buffer.clone());
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(chunk = "tex_", "cannot decode texture");
        });
        assert_eq!(buffer.lines(), vec![" WARN cannot decode texture chunk=tex_"]);
    }

    #[test]
    fn oldest_lines_drop_past_capacity() {
        let buffer = LogBuffer::new(2);
        for i in 0..4 {
            buffer.push(format!("line {}", i));
        }
        assert_eq!(buffer.lines(), vec!["line 2", "line 3"]);
        buffer.set_capacity(1);
        assert_eq!(buffer.lines(), vec!["line 3"]);
    }
}
