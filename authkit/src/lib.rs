//! Authentication primitives library
//!
//! Provides the cryptographic building blocks for credential handling:
//! - Password hashing (Argon2id, PHC string format)
//! - Signed claims tokens (JWT, HS256) for sessions and short-lived challenges
//!
//! The service defines its own claims types and wiring on top of these
//! primitives, so this crate stays free of domain logic.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use authkit::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Signed Tokens
//! ```
//! use authkit::TokenSigner;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Claims {
//!     sub: String,
//!     exp: i64,
//! }
//!
//! let signer = TokenSigner::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims {
//!     sub: "account123".to_string(),
//!     exp: chrono::Utc::now().timestamp() + 3600,
//! };
//! let token = signer.encode(&claims).unwrap();
//! let decoded: Claims = signer.decode(&token).unwrap();
//! assert_eq!(decoded.sub, "account123");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenError;
pub use token::TokenSigner;
