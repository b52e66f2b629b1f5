//! DTOs exposed by the HTTP endpoints.

pub mod api;
