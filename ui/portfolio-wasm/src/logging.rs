//! `tracing` output for the browser console.

use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// Forwards every event to the matching `console` method.
pub struct ConsoleLayer;

#[derive(Default)]
struct Line {
    message: String,
    fields: String,
}

impl Visit for Line {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = Line::default();
        event.record(&mut line);
        let meta = event.metadata();
        let text = format!("{} {}: {}{}", meta.level(), meta.target(), line.message, line.fields);

        match *meta.level() {
            Level::ERROR => gloo_console::error!(text),
            Level::WARN => gloo_console::warn!(text),
            Level::INFO => gloo_console::info!(text),
            _ => gloo_console::debug!(text),
        }
    }
}

pub fn init() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    // A second start on the same page keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(level)
        .with(ConsoleLayer)
        .try_init();
}
