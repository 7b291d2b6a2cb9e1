//! Adapter implementations for the job board repository port.

pub mod memory;
pub mod postgres;
