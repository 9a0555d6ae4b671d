use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Extension trait to add timeout functionality to futures
#[allow(async_fn_in_trait)]
pub trait TimeoutExt<T> {
    /// Add timeout to a future with custom duration
    async fn with_timeout_duration(self, duration: Duration) -> Result<T>;
}

impl<F, T> TimeoutExt<T> for F
where
    F: Future<Output = T>,
{
    async fn with_timeout_duration(self, duration: Duration) -> Result<T> {
        match timeout(duration, self).await {
            Ok(result) => Ok(result),
            Err(_) => {
                warn!("Operation timed out after {:?}", duration);
                Err(Error::Timeout { timeout: duration })
            }
        }
    }
}
