//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod govbr_identity_gateway;
mod in_memory_user_repository;
mod postgres_auth_event_repository;
mod postgres_user_repository;

pub use govbr_identity_gateway::{GovBrConfig, GovBrIdentityGateway};
pub use in_memory_user_repository::InMemoryUserRepository;
pub use postgres_auth_event_repository::PostgresAuthEventRepository;
pub use postgres_user_repository::PostgresUserRepository;
