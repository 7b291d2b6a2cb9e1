//! Conversation directory and message log.
//!
//! Every conversation joins exactly two users. Its identity is the
//! canonical (ordered) pair of participants, so first contact from either
//! side resolves to the same record. Messages are appended in a
//! storage-assigned order and marked read when the recipient fetches them.
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
