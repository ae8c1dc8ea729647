//! Repository Layer
//!
//! Data access abstraction over the remote wish API.

mod traits;
mod wish_repo;


pub use traits::WishRepository;
pub use wish_repo::RemoteWishRepository;
