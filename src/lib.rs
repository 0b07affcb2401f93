//! Spark Match - matching and distance ranking service for a location-aware dating app
//!
//! Profiles carry coordinates and three directed relationship sets
//! (liked, disliked, matched). The match engine applies like/dislike
//! actions and records mutual matches; the directory ranks profiles by
//! great-circle distance from the viewer.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    great_circle_distance, rank_by_distance, CoreError, LikeOutcome, MatchEngine, ProfileDirectory,
    Registrar,
};
pub use models::{Location, NewAccount, NewProfile, Profile, ProfileId, RankedProfile, RelationSet};
pub use services::{MemoryStore, PostgresStore, ProfileStore, TokenService};
