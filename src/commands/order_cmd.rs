//! Commands for Reordering
//!
//! Keys are written verbatim; siblings are never shifted. A batch fans out
//! one PATCH per entry and keeps whatever succeeded.

use futures::future::join_all;
use log::{info, warn};
use std::collections::HashSet;

use crate::domain::{ordering, BatchFailure, OrderUpdate, SyncError, SyncResult, WishId};
use crate::WishSync;

impl WishSync {
    /// Set exactly one wish's `order_no`
    pub async fn reorder(&self, id: &WishId, order_no: i64) -> SyncResult<()> {
        self.repo.update_order(id, order_no).await?;
        self.refresh_after("reorder").await;
        Ok(())
    }

    /// Apply every update concurrently. Failed entries are reported together
    /// in `SyncError::Batch`; succeeded ones are not rolled back.
    pub async fn reorder_batch(&self, updates: &[OrderUpdate]) -> SyncResult<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut seen = HashSet::new();
        if let Some(dup) = updates.iter().find(|u| !seen.insert(&u.id)) {
            return Err(SyncError::InvalidInput(format!(
                "wish {} appears more than once in the batch",
                dup.id
            )));
        }

        let results = join_all(updates.iter().map(|update| async move {
            let result = self.repo.update_order(&update.id, update.order_no).await;
            (update, result)
        }))
        .await;

        let mut failures = Vec::new();
        for (update, result) in results {
            if let Err(error) = result {
                failures.push(BatchFailure {
                    id: update.id.clone(),
                    error,
                });
            }
        }

        if failures.len() < updates.len() {
            self.refresh_after("batch reorder").await;
        }

        if failures.is_empty() {
            info!("Reordered {} wishes", updates.len());
            Ok(())
        } else {
            warn!(
                "Batch reorder: {} of {} updates failed",
                failures.len(),
                updates.len()
            );
            Err(SyncError::Batch(failures))
        }
    }

    /// Rewrite keys to `1..=n` in the current display order. Returns how many
    /// wishes actually changed.
    pub async fn renumber(&self) -> SyncResult<usize> {
        let snapshot = self.cache.snapshot(self.scope()).await?;
        let updates = ordering::renumber(&snapshot.active);
        self.reorder_batch(&updates).await?;
        Ok(updates.len())
    }
}
