//! Hirelink: matching and messaging core for a services marketplace.
//!
//! Requesters publish job posts, providers (individual helpers or
//! businesses) apply to them, and the owner of a post accepts exactly one
//! application. Once matched, either party can message the other through a
//! single canonical conversation per pair of participants.
//!
//! # Architecture
//!
//! Hirelink follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business rules with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and collaborators
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//! - **Services**: Orchestration of domain rules across ports
//!
//! # Modules
//!
//! - [`job`]: Job posts and the application engine with its accept cascade
//! - [`messaging`]: Conversation directory and message log with read tracking
//! - [`notification`]: Event fan-out to the external notification sink
//! - [`identity`]: Identity reference collaborator (user ids and roles)
//! - [`config`]: Runtime limits and notification templates
//! - [`error`]: Stable machine-readable error codes

pub mod config;
pub mod error;
pub mod identity;
pub mod job;
pub mod messaging;
pub mod notification;
