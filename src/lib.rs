//! Wish Sync
//!
//! Client core for an ordered, soft-deletable wish list kept on a remote
//! REST API.
//!
//! Layered architecture:
//! - domain: Entities, ordering policy, check-state overlay, errors
//! - transport: Async HTTP abstraction (reqwest in production)
//! - auth: Bearer token supplier boundary
//! - api: Route table and the authenticated request issuer
//! - repository: Remote data access
//! - cache: Per-scope snapshots with coalesced refetch
//! - commands: Mutations, reordering and overlay operations on `WishSync`

use std::sync::Arc;
use tokio::sync::Mutex;

pub mod api;
pub mod auth;
pub mod cache;
pub mod commands;
pub mod config;
pub mod domain;
pub mod repository;
pub mod transport;

pub use api::Scope;
pub use auth::{StaticTokenProvider, TokenProvider};
pub use cache::{Snapshot, WishCache};
pub use config::ClientConfig;
pub use domain::{CheckState, Checked, NewWish, OrderUpdate, SyncError, SyncResult, Wish, WishId, WishPatch};
pub use repository::{RemoteWishRepository, WishRepository};
pub use transport::{HttpTransport, ReqwestTransport};

/// Handle bound to one scope, shared across the caller's tasks
pub struct WishSync {
    scope: Scope,
    pub(crate) repo: Arc<dyn WishRepository>,
    pub(crate) cache: WishCache,
    pub(crate) checks: Mutex<CheckState<Wish>>,
}

impl WishSync {
    pub fn new(scope: Scope, repo: Arc<dyn WishRepository>, cache: WishCache) -> Self {
        Self {
            scope,
            repo,
            cache,
            checks: Mutex::new(CheckState::new()),
        }
    }

    /// Wire the remote repository and a fresh cache from configuration
    pub fn connect(
        config: &ClientConfig,
        scope: Scope,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        let issuer = api::RequestIssuer::new(config, transport, tokens);
        let repo: Arc<dyn WishRepository> = Arc::new(RemoteWishRepository::new(issuer, config));
        let cache = WishCache::new(repo.clone());
        Self::new(scope, repo, cache)
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn cache(&self) -> &WishCache {
        &self.cache
    }
}
