//! BBS Entertainment storefront library.
//!
//! The storefront, the admin console and everything they share, kept as a
//! library so the binary stays thin and the integration tests can build the
//! full router against in-memory backends.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ai;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;
