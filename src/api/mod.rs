//! HTTP Surface
//! Mission: Shared state, error mapping and the route table

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, MessageResponse};
pub use routes::build_router;
pub use state::AppState;
