//! Boundary between the rules engine and its clients.

pub mod wire;
