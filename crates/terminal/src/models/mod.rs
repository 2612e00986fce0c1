//! Domain models for the terminal layer.

pub mod session;
