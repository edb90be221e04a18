//! Business logic that spans more than one repository call.

pub mod auth;
pub mod cart;
pub mod pc_builder;
