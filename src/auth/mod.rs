pub mod authorization;
pub mod error;
pub mod jwks;
pub mod jwt;
pub mod middleware;

pub use error::AuthError;
