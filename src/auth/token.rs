//! Access token value object plus the token endpoint request/response shapes.

pub mod access;
pub mod request;
pub mod response;
