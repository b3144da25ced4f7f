//! Authentication Module
//! Mission: Password credentials, signed session tokens and the request gate

pub mod api;
pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use credentials::{CredentialError, CredentialStore};
pub use jwt::{TokenError, TokenService};
pub use middleware::{auth_middleware, AuthenticatedUser, SESSION_COOKIE};
