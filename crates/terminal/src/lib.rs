//! Tillside terminal library.
//!
//! This crate provides the point-of-sale terminal as a library, allowing it
//! to be tested and reused by the companion CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod cart;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
