//! GearShop Core - Shared domain types.
//!
//! This crate provides the common types used across all GearShop components:
//! - `api` - Storefront + admin JSON API
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the VND money type, and status enums
//! - [`messages`] - Vietnamese user-facing message catalog
//! - [`pcbuild`] - PC-builder compatibility rule engine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod messages;
pub mod pcbuild;
pub mod types;

pub use types::*;
