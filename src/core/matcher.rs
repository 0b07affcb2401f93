use std::sync::Arc;

use crate::core::CoreError;
use crate::models::{ProfileId, RelationSet};
use crate::services::ProfileStore;

/// Outcome of a like action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// True when this like completed a mutual match
    pub matched: bool,
}

/// Applies like/dislike actions and records mutual matches
///
/// Each action runs in its own store transaction with both profiles
/// locked, so two reciprocal likes racing each other are serialized and
/// the second one always sees the first.
///
/// Only the second party to like records the match, in its own `matched`
/// set. Readers combine both directions (see `ProfileDirectory::matches`).
#[derive(Clone)]
pub struct MatchEngine {
    store: Arc<dyn ProfileStore>,
}

impl MatchEngine {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Like `target` on behalf of `actor`
    ///
    /// Clears any earlier dislike, adds `target` to `actor.liked` and, if
    /// `target` already likes `actor`, records the match on `actor`.
    pub async fn like(&self, actor: ProfileId, target: ProfileId) -> Result<LikeOutcome, CoreError> {
        if actor == target {
            return Err(CoreError::SelfAction);
        }

        let mut tx = self.store.begin().await?;
        tx.lock(&[actor, target]).await?;
        tx.get(actor).await?;
        tx.get(target).await?;

        tx.remove_from_set(actor, RelationSet::Disliked, target).await?;
        tx.add_to_set(actor, RelationSet::Liked, target).await?;

        let matched = tx.contains(target, RelationSet::Liked, actor).await?;
        if matched {
            tx.add_to_set(actor, RelationSet::Matched, target).await?;
        }

        tx.commit().await?;

        tracing::info!("Profile {} liked {} (matched: {})", actor, target, matched);

        Ok(LikeOutcome { matched })
    }

    /// Dislike `target` on behalf of `actor`
    ///
    /// Removes `target` from the actor's `matched` and `liked` sets and adds
    /// it to `disliked`. A match recorded by `target` is left in place.
    pub async fn dislike(&self, actor: ProfileId, target: ProfileId) -> Result<(), CoreError> {
        if actor == target {
            return Err(CoreError::SelfAction);
        }

        let mut tx = self.store.begin().await?;
        tx.lock(&[actor, target]).await?;
        tx.get(actor).await?;
        tx.get(target).await?;

        tx.remove_from_set(actor, RelationSet::Matched, target).await?;
        tx.remove_from_set(actor, RelationSet::Liked, target).await?;
        tx.add_to_set(actor, RelationSet::Disliked, target).await?;

        tx.commit().await?;

        tracing::info!("Profile {} disliked {}", actor, target);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, Profile};
    use crate::services::MemoryStore;

    async fn setup(count: usize) -> (Arc<MemoryStore>, Vec<ProfileId>) {
        let store = Arc::new(MemoryStore::new());
        let mut tx = store.begin().await.unwrap();
        let mut ids = Vec::new();
        for i in 0..count {
            let id = tx.create_account(&format!("user{}", i)).await.unwrap();
            tx.create(&Profile {
                id,
                name: format!("User {}", i),
                avatar: "https://img.example/a.png".to_string(),
                contact: "@user".to_string(),
                about: String::new(),
                location: Location::default(),
            })
            .await
            .unwrap();
            ids.push(id);
        }
        tx.commit().await.unwrap();
        (store, ids)
    }

    async fn member(store: &MemoryStore, owner: ProfileId, set: RelationSet, target: ProfileId) -> bool {
        let mut tx = store.begin().await.unwrap();
        tx.contains(owner, set, target).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_like_does_not_match() {
        let (store, ids) = setup(2).await;
        let engine = MatchEngine::new(store.clone());

        let outcome = engine.like(ids[0], ids[1]).await.unwrap();

        assert!(!outcome.matched);
        assert!(member(&store, ids[0], RelationSet::Liked, ids[1]).await);
        assert!(!member(&store, ids[0], RelationSet::Matched, ids[1]).await);
    }

    #[tokio::test]
    async fn test_second_like_records_match_on_second_liker_only() {
        let (store, ids) = setup(2).await;
        let engine = MatchEngine::new(store.clone());

        engine.like(ids[0], ids[1]).await.unwrap();
        let outcome = engine.like(ids[1], ids[0]).await.unwrap();

        assert!(outcome.matched);
        assert!(member(&store, ids[1], RelationSet::Matched, ids[0]).await);
        assert!(!member(&store, ids[0], RelationSet::Matched, ids[1]).await);
    }

    #[tokio::test]
    async fn test_like_clears_dislike() {
        let (store, ids) = setup(2).await;
        let engine = MatchEngine::new(store.clone());

        engine.dislike(ids[0], ids[1]).await.unwrap();
        engine.like(ids[0], ids[1]).await.unwrap();

        assert!(member(&store, ids[0], RelationSet::Liked, ids[1]).await);
        assert!(!member(&store, ids[0], RelationSet::Disliked, ids[1]).await);
    }

    #[tokio::test]
    async fn test_dislike_clears_like_and_own_match() {
        let (store, ids) = setup(2).await;
        let engine = MatchEngine::new(store.clone());

        engine.like(ids[0], ids[1]).await.unwrap();
        engine.like(ids[1], ids[0]).await.unwrap();
        engine.dislike(ids[1], ids[0]).await.unwrap();

        assert!(!member(&store, ids[1], RelationSet::Liked, ids[0]).await);
        assert!(!member(&store, ids[1], RelationSet::Matched, ids[0]).await);
        assert!(member(&store, ids[1], RelationSet::Disliked, ids[0]).await);
    }

    #[tokio::test]
    async fn test_dislike_leaves_other_partys_match() {
        let (store, ids) = setup(2).await;
        let engine = MatchEngine::new(store.clone());

        engine.like(ids[0], ids[1]).await.unwrap();
        engine.like(ids[1], ids[0]).await.unwrap();
        engine.dislike(ids[0], ids[1]).await.unwrap();

        assert!(member(&store, ids[1], RelationSet::Matched, ids[0]).await);
    }

    #[tokio::test]
    async fn test_self_actions_rejected_without_state_change() {
        let (store, ids) = setup(1).await;
        let engine = MatchEngine::new(store.clone());

        assert!(matches!(engine.like(ids[0], ids[0]).await, Err(CoreError::SelfAction)));
        assert!(matches!(engine.dislike(ids[0], ids[0]).await, Err(CoreError::SelfAction)));

        for set in [RelationSet::Liked, RelationSet::Disliked, RelationSet::Matched] {
            assert!(!member(&store, ids[0], set, ids[0]).await);
        }
    }

    #[tokio::test]
    async fn test_unknown_target_is_not_found() {
        let (store, ids) = setup(1).await;
        let engine = MatchEngine::new(store);

        let missing = ProfileId(999);
        assert!(matches!(engine.like(ids[0], missing).await, Err(CoreError::NotFound(id)) if id == missing));
        assert!(matches!(engine.dislike(ids[0], missing).await, Err(CoreError::NotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn test_concurrent_reciprocal_likes_always_match() {
        let (store, ids) = setup(2).await;
        let engine = MatchEngine::new(store.clone());

        let (a, b) = tokio::join!(engine.like(ids[0], ids[1]), engine.like(ids[1], ids[0]));
        let matched = a.unwrap().matched as u8 + b.unwrap().matched as u8;

        assert_eq!(matched, 1);
    }
}
