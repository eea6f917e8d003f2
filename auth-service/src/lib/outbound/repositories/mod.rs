pub mod credential;
pub mod memory;
pub mod refresh_token;

pub use credential::PostgresCredentialRepository;
pub use memory::InMemoryRepository;
pub use refresh_token::PostgresRefreshTokenRepository;
