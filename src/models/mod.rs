// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Coordinate, Location, NewAccount, NewProfile, Profile, ProfileId, RankedProfile, RelationSet,
    RelationView,
};
pub use requests::{LocationRequest, RefreshRequest, RegisterRequest};
pub use responses::{
    AccessTokenResponse, ErrorResponse, HealthResponse, LikeResponse, ProfileView, ThinProfileView,
    TokenPairResponse,
};
