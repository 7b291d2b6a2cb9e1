//! Adapter implementations for the messaging repository ports.

pub mod memory;
pub mod postgres;
