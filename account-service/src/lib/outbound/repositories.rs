pub mod account;
pub mod session_token;
pub mod verification_token;

pub use account::PostgresAccountRepository;
pub use session_token::PostgresSessionTokenRepository;
pub use verification_token::PostgresVerificationTokenRepository;
