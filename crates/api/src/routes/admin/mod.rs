//! Admin-only route handlers under `/api/admin`.

pub mod orders;
pub mod statistics;
pub mod users;
