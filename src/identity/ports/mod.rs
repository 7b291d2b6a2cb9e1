//! Port contracts for the identity reference.

pub mod directory;

pub use directory::{IdentityDirectory, IdentityError, IdentityResult};
