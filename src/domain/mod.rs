//! Domain Layer
//!
//! Entities, the error taxonomy, the ordering policy and the local
//! check-state overlay. No I/O lives here.

mod entity;
mod error;
mod wish;
mod check_state;
pub mod ordering;

pub use entity::Entity;
pub use error::{BatchFailure, SyncError, SyncResult};
pub use wish::{validate_title, NewWish, OrderUpdate, Wish, WishId, WishPatch};
pub use check_state::{CheckState, Checked};
