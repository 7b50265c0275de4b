//! Data shapes shared between the uniform backend and its clients.

pub mod model;
pub mod requests;
pub mod responses;
