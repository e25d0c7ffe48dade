//! Request and Response models for the gateway API
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

pub use requests::{validate_namespace, KeyPath, SetRequest, MAX_KEY_LENGTH};
pub use responses::{AckResponse, GetResponse, HealthResponse, StatsResponse};
