//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod claims;
mod token;
mod trust;
mod user;

pub use claims::IdentityClaims;
pub use token::{InvalidIdentityToken, decode_identity_token};
pub use trust::{TrustLevel, is_admissible};
pub use user::{NewUser, User, UserId};
