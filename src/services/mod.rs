// Service exports
pub mod auth;
pub mod memory;
pub mod postgres;
pub mod store;

pub use auth::{AuthError, AuthenticatedProfile, TokenKind, TokenService};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{ProfileStore, ProfileTx, StoreError, StoreResult};
