//! Shared domain types and collaborator ports for the task handler.

pub mod domain;
pub mod error;
pub mod ports;

pub use domain::*;
pub use error::CoreError;
pub use ports::{CodeGenerator, PagesActivator, RepositoryPublisher};

pub type Result<T> = std::result::Result<T, CoreError>;
