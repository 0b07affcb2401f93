use std::sync::Arc;
use validator::Validate;

use crate::core::CoreError;
use crate::models::{NewAccount, NewProfile, Profile};
use crate::services::ProfileStore;

/// Creates an account together with its profile
#[derive(Clone)]
pub struct Registrar {
    store: Arc<dyn ProfileStore>,
}

impl Registrar {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Register a new account and its profile
    ///
    /// The account is created first. If the profile data then fails
    /// validation the account is deleted again, so no account is left
    /// without a profile.
    pub async fn register(&self, account: NewAccount, new_profile: NewProfile) -> Result<Profile, CoreError> {
        account.validate()?;

        let mut tx = self.store.begin().await?;
        let id = tx.create_account(&account.username).await?;

        let profile = match new_profile.into_profile(id) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("Profile for account {} rejected, removing account: {}", id, e);
                tx.delete_account(id).await?;
                tx.commit().await?;
                return Err(e);
            }
        };

        let profile = tx.create(&profile).await?;
        tx.commit().await?;

        tracing::info!("Registered account {} ({})", id, account.username);

        Ok(profile)
    }
}
