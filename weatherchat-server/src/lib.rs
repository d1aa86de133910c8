//! HTTP surface of the `weatherchat` service.
//!
//! Exposed as a library so the router can be driven in-process by tests.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
