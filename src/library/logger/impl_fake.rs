use crate::library::logger::interface::Logger;
use std::sync::{Arc, Mutex, PoisonError};

/// Keeps every line in memory so tests can assert on what was logged.
#[derive(Debug, Clone, Default)]
pub struct LoggerFake {
    namespace: Option<String>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl LoggerFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    fn push(&self, level: &str, message: &str) {
        let line = match &self.namespace {
            Some(namespace) => format!("{} {}: {}", level, namespace, message),
            None => format!("{} {}", level, message),
        };
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}

impl Logger for LoggerFake {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.push("INFO", message);
        Ok(())
    }

    fn warn(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.push("WARN", message);
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        let namespace = match &self.namespace {
            Some(current) => format!("{}:{}", current, namespace),
            None => namespace.to_string(),
        };
        Arc::new(LoggerFake {
            namespace: Some(namespace),
            lines: Arc::clone(&self.lines),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabError;

    #[test]
    fn test_namespaces_share_lines() {
        let logger = LoggerFake::new();
        let child = logger.with_namespace("camera").with_namespace("fake");

        child.info("Camera opened").unwrap();
        logger.warn("root").unwrap();

        assert_eq!(
            logger.lines(),
            vec!["INFO camera:fake: Camera opened", "WARN root"]
        );
    }

    #[test]
    fn test_failure_is_a_warning() {
        let logger = LoggerFake::new();

        logger.failure(
            "Opening camera",
            &LabError::CameraDenied("permission denied".to_string()),
        );

        assert_eq!(
            logger.lines(),
            vec!["WARN Opening camera failed: Camera unavailable: permission denied"]
        );
    }
}
