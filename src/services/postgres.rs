use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::models::{Coordinate, Location, Profile, ProfileId, RelationSet, RelationView};
use crate::services::store::{ProfileStore, ProfileTx, StoreError, StoreResult};

/// Postgres error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Relation kinds as stored in the `relation_kind` enum
#[derive(Debug, Clone, Copy, sqlx::Type)]
#[sqlx(type_name = "relation_kind", rename_all = "lowercase")]
pub enum RelationKind {
    Liked,
    Disliked,
    Matched,
}

impl From<RelationSet> for RelationKind {
    fn from(value: RelationSet) -> Self {
        match value {
            RelationSet::Liked => RelationKind::Liked,
            RelationSet::Disliked => RelationKind::Disliked,
            RelationSet::Matched => RelationKind::Matched,
        }
    }
}

const PROFILE_COLUMNS: &str = "id, full_name, avatar, contact, about, latitude_e7, longitude_e7";

fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx::Error> {
    Ok(Profile {
        id: ProfileId(row.try_get("id")?),
        name: row.try_get("full_name")?,
        avatar: row.try_get("avatar")?,
        contact: row.try_get("contact")?,
        about: row.try_get("about")?,
        location: Location {
            latitude: Coordinate::from_units(row.try_get("latitude_e7")?),
            longitude: Coordinate::from_units(row.try_get("longitude_e7")?),
        },
    })
}

/// Turn unique violations into `Conflict`, pass everything else through
fn conflict_or(err: sqlx::Error, message: impl FnOnce() -> String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            StoreError::Conflict(message())
        }
        _ => StoreError::SqlxError(err),
    }
}

/// PostgreSQL-backed profile store
///
/// Profiles live in `profiles`, all three relationship sets share the
/// `profile_relations` edge table keyed by (owner, kind, target).
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("PostgreSQL pool ready (max: {} connections)", max_connections);

        Ok(Self { pool })
    }
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn begin(&self) -> StoreResult<Box<dyn ProfileTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresTx { tx }))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

struct PostgresTx {
    tx: Transaction<'static, Postgres>,
}

impl PostgresTx {
    async fn member_ids(&mut self, owner: ProfileId, view: RelationView) -> StoreResult<Vec<i64>> {
        let (query, kind) = match view {
            RelationView::Outgoing(set) => (
                "SELECT target_id AS member FROM profile_relations WHERE owner_id = $1 AND kind = $2",
                RelationKind::from(set),
            ),
            RelationView::Incoming(set) => (
                "SELECT owner_id AS member FROM profile_relations WHERE target_id = $1 AND kind = $2",
                RelationKind::from(set),
            ),
        };

        let rows = sqlx::query(query)
            .bind(owner.0)
            .bind(kind)
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter()
            .map(|row| row.try_get("member").map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl ProfileTx for PostgresTx {
    async fn lock(&mut self, ids: &[ProfileId]) -> StoreResult<()> {
        let mut sorted: Vec<i64> = ids.iter().map(|id| id.0).collect();
        sorted.sort_unstable();
        sorted.dedup();

        sqlx::query("SELECT id FROM profiles WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(&sorted)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn get(&mut self, id: ProfileId) -> StoreResult<Profile> {
        let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id.0)
            .fetch_optional(&mut *self.tx)
            .await?;

        match row {
            Some(row) => Ok(profile_from_row(&row)?),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn create(&mut self, profile: &Profile) -> StoreResult<Profile> {
        let query = r#"
            INSERT INTO profiles (id, full_name, avatar, contact, about, latitude_e7, longitude_e7)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;

        sqlx::query(query)
            .bind(profile.id.0)
            .bind(&profile.name)
            .bind(&profile.avatar)
            .bind(&profile.contact)
            .bind(&profile.about)
            .bind(profile.location.latitude.units())
            .bind(profile.location.longitude.units())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| conflict_or(e, || format!("account {} already has a profile", profile.id)))?;

        tracing::debug!("Created profile {}", profile.id);

        Ok(profile.clone())
    }

    async fn update_location(&mut self, id: ProfileId, location: Location) -> StoreResult<()> {
        let result = sqlx::query("UPDATE profiles SET latitude_e7 = $2, longitude_e7 = $3 WHERE id = $1")
            .bind(id.0)
            .bind(location.latitude.units())
            .bind(location.longitude.units())
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn add_to_set(&mut self, owner: ProfileId, set: RelationSet, target: ProfileId) -> StoreResult<()> {
        if owner == target {
            return Err(StoreError::Conflict(format!("profile {} cannot relate to itself", owner)));
        }

        let query = r#"
            INSERT INTO profile_relations (owner_id, kind, target_id, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (owner_id, kind, target_id) DO NOTHING
        "#;

        sqlx::query(query)
            .bind(owner.0)
            .bind(RelationKind::from(set))
            .bind(target.0)
            .execute(&mut *self.tx)
            .await?;

        tracing::debug!("Added {} to {:?} of {}", target, set, owner);

        Ok(())
    }

    async fn remove_from_set(&mut self, owner: ProfileId, set: RelationSet, target: ProfileId) -> StoreResult<()> {
        sqlx::query("DELETE FROM profile_relations WHERE owner_id = $1 AND kind = $2 AND target_id = $3")
            .bind(owner.0)
            .bind(RelationKind::from(set))
            .bind(target.0)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn contains(&mut self, owner: ProfileId, set: RelationSet, target: ProfileId) -> StoreResult<bool> {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM profile_relations WHERE owner_id = $1 AND kind = $2 AND target_id = $3) AS present",
        )
        .bind(owner.0)
        .bind(RelationKind::from(set))
        .bind(target.0)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row.try_get("present")?)
    }

    async fn list_all(&mut self, excluding: ProfileId) -> StoreResult<Vec<Profile>> {
        let query = format!("SELECT {} FROM profiles WHERE id <> $1", PROFILE_COLUMNS);
        let rows = sqlx::query(&query)
            .bind(excluding.0)
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter()
            .map(|row| profile_from_row(row).map_err(StoreError::from))
            .collect()
    }

    async fn list_union(&mut self, owner: ProfileId, a: RelationView, b: RelationView) -> StoreResult<Vec<Profile>> {
        let mut ids: BTreeSet<i64> = self.member_ids(owner, a).await?.into_iter().collect();
        ids.extend(self.member_ids(owner, b).await?);

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = ids.into_iter().collect();
        let query = format!("SELECT {} FROM profiles WHERE id = ANY($1) ORDER BY id", PROFILE_COLUMNS);
        let rows = sqlx::query(&query)
            .bind(&ids)
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter()
            .map(|row| profile_from_row(row).map_err(StoreError::from))
            .collect()
    }

    async fn create_account(&mut self, username: &str) -> StoreResult<ProfileId> {
        let row = sqlx::query("INSERT INTO accounts (username, created_at) VALUES ($1, NOW()) RETURNING id")
            .bind(username)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| conflict_or(e, || format!("username {} is already taken", username)))?;

        Ok(ProfileId(row.try_get("id")?))
    }

    async fn delete_account(&mut self, id: ProfileId) -> StoreResult<()> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.0)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
