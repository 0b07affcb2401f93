// Core algorithm exports
pub mod directory;
pub mod distance;
pub mod error;
pub mod matcher;
pub mod registration;

pub use directory::ProfileDirectory;
pub use distance::{distance_between, great_circle_distance, rank_by_distance, round_to_tenth};
pub use error::CoreError;
pub use matcher::{LikeOutcome, MatchEngine};
pub use registration::Registrar;
