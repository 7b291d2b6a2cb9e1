//! Step definitions for the marketplace behaviour scenarios.

pub mod world;

mod given;
mod then;
mod when;
