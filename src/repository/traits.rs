//! Repository Layer - Core Traits
//!
//! Abstract interface to the authoritative wish store. The remote
//! implementation maps each call onto one HTTP route.

use async_trait::async_trait;

use crate::api::Scope;
use crate::domain::{NewWish, SyncResult, Wish, WishId, WishPatch};

#[async_trait]
pub trait WishRepository: Send + Sync {
    /// Every wish the server returns for `scope`, unsorted
    async fn list(&self, scope: &Scope) -> SyncResult<Vec<Wish>>;

    /// Single wish, soft-deleted ones included
    async fn find_by_id(&self, id: &WishId) -> SyncResult<Wish>;

    async fn create(&self, wish: &NewWish) -> SyncResult<Wish>;

    /// Partial update of an active wish
    async fn update(&self, id: &WishId, patch: &WishPatch) -> SyncResult<Wish>;

    /// Permanent removal
    async fn delete(&self, id: &WishId) -> SyncResult<()>;

    /// Idempotent: deleting an already soft-deleted wish succeeds
    async fn soft_delete(&self, id: &WishId) -> SyncResult<()>;

    /// Fails with `Conflict` when the wish was hard-deleted
    async fn restore(&self, id: &WishId) -> SyncResult<()>;

    /// Write one `order_no` verbatim
    async fn update_order(&self, id: &WishId, order_no: i64) -> SyncResult<()>;
}
