//! Remote source abstraction and the simulated implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Descriptor for one remote call: a label plus a simulated latency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSpec {
    /// Label identifying the call.
    pub label: String,
    /// Simulated latency before the source answers.
    pub latency: Duration,
}

impl CallSpec {
    /// Create a new call descriptor.
    pub fn new(label: impl Into<String>, latency: Duration) -> Self {
        Self {
            label: label.into(),
            latency,
        }
    }
}

/// Value returned by the remote source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Label of the call that produced this value.
    pub label: String,
    /// Latency the source simulated, in milliseconds.
    pub latency_ms: u64,
}

/// A remote endpoint the fetch patterns pull data from.
///
/// Passed explicitly to each entry point so tests can substitute
/// recording or failing sources.
#[async_trait]
pub trait RemoteSource: Send + Sync + 'static {
    /// Fetch the value described by `spec`.
    async fn get_data(&self, spec: CallSpec) -> anyhow::Result<Payload>;
}

/// Source that sleeps for the simulated latency, then echoes the descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSource;

#[async_trait]
impl RemoteSource for SimulatedSource {
    async fn get_data(&self, spec: CallSpec) -> anyhow::Result<Payload> {
        tokio::time::sleep(spec.latency).await;
        Ok(Payload {
            label: spec.label,
            latency_ms: spec.latency.as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_source_echoes_spec() {
        let spec = CallSpec::new("first call", Duration::from_millis(3000));
        let start = tokio::time::Instant::now();
        let payload = SimulatedSource.get_data(spec).await.unwrap();

        assert_eq!(payload.label, "first call");
        assert_eq!(payload.latency_ms, 3000);
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }
}
