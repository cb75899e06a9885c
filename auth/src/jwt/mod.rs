pub mod claims;
pub mod errors;
pub mod service;

pub use claims::AccountClaims;
pub use errors::JwtError;
pub use service::JwtTokenService;
