//! Commands for the Local Check-State Overlay

use crate::domain::{Checked, SyncResult, Wish, WishId};
use crate::WishSync;

impl WishSync {
    /// Flip the local check state and return the new value
    pub async fn toggle(&self, id: &WishId) -> bool {
        self.checks.lock().await.toggle(id)
    }

    pub async fn is_checked(&self, id: &WishId) -> bool {
        self.checks.lock().await.is_checked(id)
    }

    pub async fn set_checked(&self, id: &WishId, checked: bool) {
        self.checks.lock().await.set(id, checked);
    }

    pub async fn checked_ids(&self) -> Vec<WishId> {
        self.checks.lock().await.checked_ids().cloned().collect()
    }

    pub async fn clear_checks(&self) {
        self.checks.lock().await.clear();
    }

    /// Active list decorated with check state. Membership comes from the
    /// fetch alone.
    pub async fn render(&self) -> SyncResult<Vec<Checked<Wish>>> {
        let wishes = self.list().await?;
        Ok(self.checks.lock().await.apply(&wishes))
    }

    /// Same as `render` over the last committed snapshot, without fetching
    pub async fn render_cached(&self) -> Vec<Checked<Wish>> {
        match self.cache.cached(self.scope()).await {
            Some(snapshot) => self.checks.lock().await.apply(&snapshot.active),
            None => Vec::new(),
        }
    }
}
