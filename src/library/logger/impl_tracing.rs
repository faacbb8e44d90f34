use crate::library::logger::interface::Logger;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Installs a global stdout subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init(default_filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    let subscriber = Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stdout));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct LoggerTracing {
    namespace: String,
}

impl LoggerTracing {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Logger for LoggerTracing {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!(namespace = %self.namespace, "{}", message);
        Ok(())
    }

    fn warn(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::warn!(namespace = %self.namespace, "{}", message);
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        let namespace = if self.namespace.is_empty() {
            namespace.to_string()
        } else {
            format!("{}:{}", self.namespace, namespace)
        };
        Arc::new(LoggerTracing { namespace })
    }
}
