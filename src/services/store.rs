use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Location, Profile, ProfileId, RelationSet, RelationView};

/// Errors that can occur when interacting with the profile store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Profile {0} not found")]
    NotFound(ProfileId),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Handle to durable profile storage
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Start a unit of work. Dropping the transaction without
    /// committing discards its writes.
    async fn begin(&self) -> StoreResult<Box<dyn ProfileTx>>;

    /// Health check for the underlying storage
    async fn ping(&self) -> StoreResult<()>;
}

/// Reads and writes performed inside one store transaction
#[async_trait]
pub trait ProfileTx: Send {
    /// Take row locks on the given profiles in ascending id order.
    /// Missing ids are skipped.
    async fn lock(&mut self, ids: &[ProfileId]) -> StoreResult<()>;

    async fn get(&mut self, id: ProfileId) -> StoreResult<Profile>;

    /// Insert a profile for an existing account.
    /// Fails with `Conflict` if the account already owns a profile.
    async fn create(&mut self, profile: &Profile) -> StoreResult<Profile>;

    async fn update_location(&mut self, id: ProfileId, location: Location) -> StoreResult<()>;

    /// Idempotent: adding an existing member is a no-op
    async fn add_to_set(&mut self, owner: ProfileId, set: RelationSet, target: ProfileId) -> StoreResult<()>;

    /// Idempotent: removing an absent member is a no-op
    async fn remove_from_set(&mut self, owner: ProfileId, set: RelationSet, target: ProfileId) -> StoreResult<()>;

    async fn contains(&mut self, owner: ProfileId, set: RelationSet, target: ProfileId) -> StoreResult<bool>;

    /// Every profile except `excluding`
    async fn list_all(&mut self, excluding: ProfileId) -> StoreResult<Vec<Profile>>;

    /// Profiles found in either view of `owner`'s relations, deduplicated by id
    async fn list_union(&mut self, owner: ProfileId, a: RelationView, b: RelationView) -> StoreResult<Vec<Profile>>;

    /// Create an account and return its id.
    /// Fails with `Conflict` if the username is taken.
    async fn create_account(&mut self, username: &str) -> StoreResult<ProfileId>;

    /// Delete an account together with its profile and relations
    async fn delete_account(&mut self, id: ProfileId) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
