use crate::library::logger::interface::Logger;
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;

const TIME_FORMAT: &str = "%Y-%m-%d %I:%M:%S%.3f %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Warn,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
        }
    }
}

fn format_line(
    at: DateTime<FixedOffset>,
    level: Level,
    namespace: Option<&str>,
    message: &str,
) -> String {
    let stamp = at.format(TIME_FORMAT);
    match namespace {
        Some(namespace) => format!("[{}] {} {}: {}", stamp, level.tag(), namespace, message),
        None => format!("[{}] {} {}", stamp, level.tag(), message),
    }
}

/// Prints to stdout, warnings to stderr, stamped in a fixed UTC offset.
#[derive(Debug, Clone)]
pub struct LoggerConsole {
    namespace: Option<String>,
    timezone: FixedOffset,
}

impl LoggerConsole {
    pub fn new(timezone: FixedOffset) -> Self {
        Self {
            namespace: None,
            timezone,
        }
    }

    fn emit(&self, level: Level, message: &str) {
        let line = format_line(
            Utc::now().with_timezone(&self.timezone),
            level,
            self.namespace.as_deref(),
            message,
        );
        match level {
            Level::Info => println!("{}", line),
            Level::Warn => eprintln!("{}", line),
        }
    }
}

impl Logger for LoggerConsole {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.emit(Level::Info, message);
        Ok(())
    }

    fn warn(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.emit(Level::Warn, message);
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        let namespace = match &self.namespace {
            Some(current) => format!("{}:{}", current, namespace),
            None => namespace.to_string(),
        };
        Arc::new(LoggerConsole {
            namespace: Some(namespace),
            timezone: self.timezone,
        })
    }
}
