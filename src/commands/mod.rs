//! Sync Commands
//!
//! Operations exposed on `WishSync`, organized by concern. Every mutation
//! refetches the bound scope once it has landed on the server.

mod wish_cmd;
mod order_cmd;
mod check_cmd;


use log::warn;

use crate::WishSync;

impl WishSync {
    /// Refetch after a successful mutation. A failed refetch leaves the
    /// snapshot stale, so the next read retries and reports it.
    pub(crate) async fn refresh_after(&self, action: &str) {
        if let Err(e) = self.cache.refresh(self.scope()).await {
            warn!("Refresh after {} failed for {}: {}", action, self.scope(), e);
        }
    }
}
