//! Social Module
//! Mission: Follow graph and the feed it produces

pub mod api;
pub mod follows;

pub use follows::FollowStore;
