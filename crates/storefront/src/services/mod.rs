//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Sign-up, sign-in and sign-out over the document store
pub mod auth;
