//! Quill Backend Library
//!
//! Exposes the stores, the auth gate and the router for the server binary
//! and integration tests.

pub mod api;
pub mod auth;
pub mod blog;
pub mod config;
pub mod db;
pub mod middleware;
pub mod social;
