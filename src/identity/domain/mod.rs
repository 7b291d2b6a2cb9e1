//! Domain types for the identity reference.

mod ids;
mod profile;

pub use ids::UserId;
pub use profile::{ParseRoleError, Role, UserProfile};
