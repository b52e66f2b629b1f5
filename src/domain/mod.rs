//! Domain values exposed by the client records service layer.

pub mod birthday;
pub mod client;
pub mod types;
