//! API Module
//!
//! HTTP gateway in front of the shared cache. The gateway runs in a worker
//! process and reaches the store only through client proxies.
//!
//! # Endpoints
//! - `PUT /ns/:namespace/:key` - Store a value
//! - `GET /ns/:namespace/:key` - Retrieve a value
//! - `DELETE /ns/:namespace/:key` - Delete a key
//! - `DELETE /ns/:namespace` - Clear a namespace
//! - `GET /stats` - Coordinator statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
