//! Auth adapters: Argon2 credential hashing and JWT session tokens.

mod password;

#[cfg(feature = "auth-jwt")]
mod jwt;

pub use password::Argon2PasswordHasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtTokenService;
