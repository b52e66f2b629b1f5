//! Use cases over the client record store.

pub mod client;
pub mod errors;

pub use errors::{ServiceError, ServiceResult};
