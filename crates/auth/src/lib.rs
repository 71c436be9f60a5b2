// Authentication boundary: verifies bearer tokens and exposes the
// authenticated principal, including the customer (tenant) it belongs to.

pub mod error;
pub mod jwt;

pub use error::{AuthError, Result};
pub use jwt::{Claims, JwtService, TokenType};
