//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_event_service;
mod sign_in_service;

pub use auth_event_service::{AuthEvent, AuthEventRepository, AuthEventService};
pub use sign_in_service::{
    ExchangeError, IdentityGateway, SignInDenial, SignInOutcome, SignInService, UserRepository,
};
