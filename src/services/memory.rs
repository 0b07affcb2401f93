use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::{Location, Profile, ProfileId, RelationSet, RelationView};
use crate::services::store::{ProfileStore, ProfileTx, StoreError, StoreResult};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    next_account_id: i64,
    accounts: BTreeMap<ProfileId, String>,
    profiles: BTreeMap<ProfileId, Profile>,
    /// Directed edges as (owner, set, target)
    relations: BTreeSet<(ProfileId, RelationSet, ProfileId)>,
}

/// In-process profile store
///
/// Every transaction holds one global lock for its whole lifetime, so
/// transactions are fully serialized. Writes go to a private copy that
/// replaces the shared state on commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn ProfileTx>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

impl MemoryTx {
    fn require(&self, id: ProfileId) -> StoreResult<()> {
        if self.working.profiles.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }

    fn members(&self, owner: ProfileId, view: RelationView) -> BTreeSet<ProfileId> {
        match view {
            RelationView::Outgoing(set) => self
                .working
                .relations
                .iter()
                .filter(|(o, s, _)| *o == owner && *s == set)
                .map(|(_, _, target)| *target)
                .collect(),
            RelationView::Incoming(set) => self
                .working
                .relations
                .iter()
                .filter(|(_, s, t)| *t == owner && *s == set)
                .map(|(o, _, _)| *o)
                .collect(),
        }
    }
}

#[async_trait]
impl ProfileTx for MemoryTx {
    async fn lock(&mut self, _ids: &[ProfileId]) -> StoreResult<()> {
        // The transaction already holds the store-wide lock
        Ok(())
    }

    async fn get(&mut self, id: ProfileId) -> StoreResult<Profile> {
        self.working
            .profiles
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn create(&mut self, profile: &Profile) -> StoreResult<Profile> {
        if !self.working.accounts.contains_key(&profile.id) {
            return Err(StoreError::Conflict(format!("account {} does not exist", profile.id)));
        }
        if self.working.profiles.contains_key(&profile.id) {
            return Err(StoreError::Conflict(format!("account {} already has a profile", profile.id)));
        }
        self.working.profiles.insert(profile.id, profile.clone());
        Ok(profile.clone())
    }

    async fn update_location(&mut self, id: ProfileId, location: Location) -> StoreResult<()> {
        let profile = self
            .working
            .profiles
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        profile.location = location;
        Ok(())
    }

    async fn add_to_set(&mut self, owner: ProfileId, set: RelationSet, target: ProfileId) -> StoreResult<()> {
        if owner == target {
            return Err(StoreError::Conflict(format!("profile {} cannot relate to itself", owner)));
        }
        self.require(owner)?;
        self.require(target)?;
        self.working.relations.insert((owner, set, target));
        Ok(())
    }

    async fn remove_from_set(&mut self, owner: ProfileId, set: RelationSet, target: ProfileId) -> StoreResult<()> {
        self.working.relations.remove(&(owner, set, target));
        Ok(())
    }

    async fn contains(&mut self, owner: ProfileId, set: RelationSet, target: ProfileId) -> StoreResult<bool> {
        Ok(self.working.relations.contains(&(owner, set, target)))
    }

    async fn list_all(&mut self, excluding: ProfileId) -> StoreResult<Vec<Profile>> {
        Ok(self
            .working
            .profiles
            .values()
            .filter(|profile| profile.id != excluding)
            .cloned()
            .collect())
    }

    async fn list_union(&mut self, owner: ProfileId, a: RelationView, b: RelationView) -> StoreResult<Vec<Profile>> {
        let mut ids = self.members(owner, a);
        ids.extend(self.members(owner, b));

        Ok(ids
            .into_iter()
            .filter_map(|id| self.working.profiles.get(&id).cloned())
            .collect())
    }

    async fn create_account(&mut self, username: &str) -> StoreResult<ProfileId> {
        if self.working.accounts.values().any(|existing| existing == username) {
            return Err(StoreError::Conflict(format!("username {} is already taken", username)));
        }
        self.working.next_account_id += 1;
        let id = ProfileId(self.working.next_account_id);
        self.working.accounts.insert(id, username.to_string());
        Ok(id)
    }

    async fn delete_account(&mut self, id: ProfileId) -> StoreResult<()> {
        self.working.accounts.remove(&id);
        self.working.profiles.remove(&id);
        self.working
            .relations
            .retain(|(owner, _, target)| *owner != id && *target != id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
