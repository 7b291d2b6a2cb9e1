//! Job post store and application engine.
//!
//! Requesters publish job posts, providers apply, and the owner accepts a
//! single application. Accepting confirms the post, assigns the applicant,
//! and rejects every competing pending application in one atomic unit. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
