//! Adapters for the identity reference.

pub mod memory;
