//! Commands for Wish CRUD
//!
//! Reads go through the cache; writes go straight to the repository and then
//! refresh the scope.

use log::{debug, info};

use crate::domain::{ordering, validate_title, NewWish, SyncError, SyncResult, Wish, WishId, WishPatch};
use crate::WishSync;

impl WishSync {
    /// Active wishes in display order
    pub async fn list(&self) -> SyncResult<Vec<Wish>> {
        self.cache.list(self.scope()).await
    }

    /// Force a refetch and return the new active list
    pub async fn refresh(&self) -> SyncResult<Vec<Wish>> {
        Ok(self.cache.refresh(self.scope()).await?.active.clone())
    }

    /// Soft-deleted wishes the server returned alongside the list
    pub async fn trash(&self) -> SyncResult<Vec<Wish>> {
        self.cache.trash(self.scope()).await
    }

    /// Single wish straight from the server, soft-deleted or not
    pub async fn get(&self, id: &WishId) -> SyncResult<Wish> {
        self.repo.find_by_id(id).await
    }

    /// Create a wish. Without `order_no` it goes after the current last one.
    pub async fn create(
        &self,
        title: &str,
        note: &str,
        order_no: Option<i64>,
    ) -> SyncResult<Wish> {
        validate_title(title)?;

        let order_no = match order_no {
            Some(order_no) => order_no,
            None => {
                let snapshot = self.cache.snapshot(self.scope()).await?;
                ordering::next_order_no(&snapshot.active)
            }
        };

        let wish = NewWish {
            organization_id: self.scope().organization_id().map(str::to_string),
            title: title.trim().to_string(),
            note: note.to_string(),
            order_no,
        };
        let created = self.repo.create(&wish).await?;
        self.refresh_after("create").await;
        Ok(created)
    }

    /// Partial update; unset fields keep their server value
    pub async fn update(&self, id: &WishId, patch: WishPatch) -> SyncResult<Wish> {
        if patch.is_empty() {
            return Err(SyncError::InvalidInput("nothing to update".to_string()));
        }
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }

        let updated = self.repo.update(id, &patch).await?;
        info!("Updated wish {}", id);
        self.refresh_after("update").await;
        Ok(updated)
    }

    pub async fn soft_delete(&self, id: &WishId) -> SyncResult<()> {
        self.repo.soft_delete(id).await?;
        info!("Soft-deleted wish {}", id);
        self.refresh_after("soft delete").await;
        Ok(())
    }

    /// Bring a soft-deleted wish back at `order_no`, or after the current
    /// last active wish when none is given. A wish that was already active
    /// keeps its position unless `order_no` is given.
    pub async fn restore(&self, id: &WishId, order_no: Option<i64>) -> SyncResult<()> {
        let was_active = match order_no {
            Some(_) => false,
            None => self.was_active(id).await,
        };

        self.repo.restore(id).await?;

        let placement = match order_no {
            Some(order_no) => Some(order_no),
            None if was_active => None,
            None => {
                let snapshot = self.cache.refresh(self.scope()).await?;
                Some(ordering::next_order_no(
                    snapshot.active.iter().filter(|w| &w.id != id),
                ))
            }
        };

        let placed = match placement {
            Some(order_no) => self.repo.update_order(id, order_no).await,
            None => Ok(()),
        };
        self.refresh_after("restore").await;
        placed?;

        info!("Restored wish {} at order {:?}", id, placement);
        Ok(())
    }

    /// Server-side state before a restore. A failed lookup counts as deleted
    /// so the restore itself is still attempted.
    async fn was_active(&self, id: &WishId) -> bool {
        match self.repo.find_by_id(id).await {
            Ok(wish) => wish.is_active(),
            Err(e) => {
                debug!("Could not look up wish {} before restore: {}", id, e);
                false
            }
        }
    }

    /// Permanent removal. Also forgets the local check state for `id`.
    pub async fn hard_delete(&self, id: &WishId) -> SyncResult<()> {
        self.repo.delete(id).await?;
        self.checks.lock().await.set(id, false);
        self.refresh_after("delete").await;
        Ok(())
    }
}
