use crate::error::LabError;
use std::sync::Arc;

/// Logging sink shared by the shell, the lab and every device.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn warn(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync>;

    /// Warns about a camera or model call that came back with an error.
    fn failure(&self, action: &str, error: &LabError) {
        let _ = self.warn(&format!("{} failed: {}", action, error));
    }
}
