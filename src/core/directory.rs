use std::sync::Arc;

use crate::core::distance::rank_by_distance;
use crate::core::CoreError;
use crate::models::{Location, ProfileId, RankedProfile, RelationSet, RelationView};
use crate::services::ProfileStore;

/// Read-side queries over the profile directory
#[derive(Clone)]
pub struct ProfileDirectory {
    store: Arc<dyn ProfileStore>,
}

impl ProfileDirectory {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Every other profile, nearest first
    pub async fn browse(&self, viewer: ProfileId) -> Result<Vec<RankedProfile>, CoreError> {
        let mut tx = self.store.begin().await?;
        let origin = tx.get(viewer).await?.location;
        let candidates = tx.list_all(viewer).await?;
        tx.commit().await?;

        tracing::debug!("Ranking {} candidates for {}", candidates.len(), viewer);

        Ok(rank_by_distance(origin, candidates))
    }

    /// Profiles matched with `viewer` in either direction, nearest first
    pub async fn matches(&self, viewer: ProfileId) -> Result<Vec<RankedProfile>, CoreError> {
        let mut tx = self.store.begin().await?;
        let origin = tx.get(viewer).await?.location;
        let matched = tx
            .list_union(
                viewer,
                RelationView::Outgoing(RelationSet::Matched),
                RelationView::Incoming(RelationSet::Matched),
            )
            .await?;
        tx.commit().await?;

        Ok(rank_by_distance(origin, matched))
    }

    /// Move `viewer` to a new location
    pub async fn update_location(
        &self,
        viewer: ProfileId,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), CoreError> {
        self.patch_location(viewer, Some(latitude), Some(longitude)).await?;
        Ok(())
    }

    /// Update one or both coordinates of `viewer`, keeping the stored value
    /// for any that is `None`
    pub async fn patch_location(
        &self,
        viewer: ProfileId,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Location, CoreError> {
        let mut tx = self.store.begin().await?;
        tx.lock(&[viewer]).await?;
        let current = tx.get(viewer).await?.location;

        let location = Location::new(
            latitude.unwrap_or_else(|| current.latitude.degrees()),
            longitude.unwrap_or_else(|| current.longitude.degrees()),
        )?;
        tx.update_location(viewer, location).await?;
        tx.commit().await?;

        tracing::info!(
            "Profile {} moved to ({}, {})",
            viewer,
            location.latitude.degrees(),
            location.longitude.degrees()
        );

        Ok(location)
    }
}
