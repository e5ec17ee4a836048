//! HTTP API layer: request/response types, handlers, and server assembly.

pub mod handlers;
pub mod server;
pub mod types;

pub use handlers::AppState;
pub use server::{build_router, build_state, serve};
