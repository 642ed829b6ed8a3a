//! BBS Core - Shared domain types.
//!
//! This crate provides the records and pure logic shared by every BBS
//! Entertainment component:
//! - `storefront` - Public shop and the gated admin console
//! - `cli` - Migrations, catalog seeding and admin management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! document store access, no HTTP clients. Everything here can be unit tested
//! without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and order status
//! - [`catalog`] - Products, categories, filtering and star ratings
//! - [`cart`] - Cart lines and totals
//! - [`order`] - Customer orders
//! - [`user`] - Customer profiles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod types;
pub mod user;

pub use cart::{Cart, CartItem, CartLine, CartTotals};
pub use catalog::{Category, NewProduct, Product, ProductFilter, StarRating};
pub use order::{NewOrder, Order};
pub use types::*;
pub use user::User;
