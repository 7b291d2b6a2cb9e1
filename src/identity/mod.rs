//! Identity reference collaborator.
//!
//! User storage and authentication live outside this crate. The core only
//! needs opaque user identifiers, role membership, and a display name for
//! denormalised notification payloads. The module follows the same
//! hexagonal split as the rest of the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
