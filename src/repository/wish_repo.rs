//! Remote Wish Repository
//!
//! REST-backed implementation of `WishRepository`. Status codes that carry a
//! domain meaning on id-addressed routes are mapped here.

use async_trait::async_trait;
use log::{debug, info};
use serde_json::json;

use super::traits::WishRepository;
use crate::api::routes::{self, Scope};
use crate::api::{ApiRequest, AuthRequirement, ListPayload, RequestIssuer};
use crate::config::{ClientConfig, CreateRoute};
use crate::domain::{NewWish, SyncError, SyncResult, Wish, WishId, WishPatch};

pub struct RemoteWishRepository {
    issuer: RequestIssuer,
    create_route: CreateRoute,
    read_auth: AuthRequirement,
}

impl RemoteWishRepository {
    pub fn new(issuer: RequestIssuer, config: &ClientConfig) -> Self {
        let read_auth = if config.allow_anonymous_reads {
            AuthRequirement::Optional
        } else {
            AuthRequirement::Required
        };
        Self {
            issuer,
            create_route: config.create_route,
            read_auth,
        }
    }
}

/// 404 on an id-addressed route means the wish does not exist
fn not_found(id: &WishId) -> impl FnOnce(SyncError) -> SyncError + '_ {
    move |err| match err {
        SyncError::Request { status: 404, .. } => SyncError::NotFound(format!("wish {}", id)),
        other => other,
    }
}

#[async_trait]
impl WishRepository for RemoteWishRepository {
    async fn list(&self, scope: &Scope) -> SyncResult<Vec<Wish>> {
        let response = self
            .issuer
            .issue(ApiRequest::get(scope.list_path()).auth(self.read_auth))
            .await?;
        let payload = ListPayload::decode(&response.body)?;
        let wishes = payload.into_wishes();
        debug!("Fetched {} wishes for {}", wishes.len(), scope);
        Ok(wishes)
    }

    async fn find_by_id(&self, id: &WishId) -> SyncResult<Wish> {
        self.issuer
            .issue_json(ApiRequest::get(routes::wish_path(id)).auth(self.read_auth))
            .await
            .map_err(not_found(id))
    }

    async fn create(&self, wish: &NewWish) -> SyncResult<Wish> {
        let request = ApiRequest::post(routes::create_path(self.create_route)).json(wish)?;
        let created: Wish = self.issuer.issue_json(request).await?;
        info!("Created wish {} at order {}", created.id, created.order_no);
        Ok(created)
    }

    async fn update(&self, id: &WishId, patch: &WishPatch) -> SyncResult<Wish> {
        let request = ApiRequest::put(routes::wish_path(id)).json(patch)?;
        let updated: Wish = self.issuer.issue_json(request).await.map_err(not_found(id))?;
        if !updated.is_active() {
            return Err(SyncError::NotFound(format!("wish {} is soft-deleted", id)));
        }
        Ok(updated)
    }

    async fn delete(&self, id: &WishId) -> SyncResult<()> {
        self.issuer
            .issue_empty(ApiRequest::delete(routes::wish_path(id)))
            .await
            .map_err(not_found(id))?;
        info!("Hard-deleted wish {}", id);
        Ok(())
    }

    async fn soft_delete(&self, id: &WishId) -> SyncResult<()> {
        match self
            .issuer
            .issue_empty(ApiRequest::post(routes::soft_delete_path(id)))
            .await
        {
            Ok(()) => Ok(()),
            Err(SyncError::Request { status: 409, .. }) => {
                debug!("Wish {} was already soft-deleted", id);
                Ok(())
            }
            Err(err) => Err(not_found(id)(err)),
        }
    }

    async fn restore(&self, id: &WishId) -> SyncResult<()> {
        self.issuer
            .issue_empty(ApiRequest::post(routes::restore_path(id)))
            .await
            .map_err(|err| match err {
                SyncError::Request {
                    status: 404 | 410,
                    ..
                } => SyncError::Conflict(format!("wish {} was permanently deleted", id)),
                other => other,
            })
    }

    async fn update_order(&self, id: &WishId, order_no: i64) -> SyncResult<()> {
        let request = ApiRequest::patch(routes::order_path(id)).json(&json!({ "order_no": order_no }))?;
        self.issuer.issue_empty(request).await.map_err(not_found(id))
    }
}
