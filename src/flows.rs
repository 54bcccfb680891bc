//! Token lifecycle orchestration: request context, repository, and authentication façades.

pub mod authentication;
pub mod context;
pub mod repository;

pub use authentication::*;
pub use context::*;
pub use repository::*;
