//! Authentication Module
//!
//! JWT token lifecycle, password hashing, and the request authentication
//! middleware.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, TokenPair};
pub use middleware::require_auth;
pub use password::{hash_password, verify_password};
