use crate::domain_port::RevocationStore;
use chrono::{TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Periodically drops blacklist entries that can no longer match a live
/// token: anything revoked more than `retention` ago has expired anyway.
pub struct RevocationPurger {
    revocation_store: Arc<dyn RevocationStore>,
    retention: TimeDelta,
    interval: Duration,
    cancellation_token: CancellationToken,
}

impl RevocationPurger {
    pub fn new(
        revocation_store: Arc<dyn RevocationStore>,
        retention: TimeDelta,
        interval: Duration,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            revocation_store,
            retention,
            interval,
            cancellation_token,
        }
    }

    pub async fn tick_once(&self) -> anyhow::Result<u64> {
        let cutoff = Utc::now() - self.retention;
        let purged = self.revocation_store.purge_revoked_before(cutoff).await?;
        if purged > 0 {
            tracing::info!(purged, %cutoff, "purged revoked tokens");
        }
        Ok(purged)
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("RevocationPurger shutting down...");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick_once().await {
                        tracing::error!("RevocationPurger error: {:#}", e);
                    }
                }
            }
        }
        Ok(())
    }
}
