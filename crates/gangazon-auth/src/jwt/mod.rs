//! JWT claims, encoding, and issuer-checked decoding.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{AccessClaims, RefreshClaims, TokenType};
pub use decoder::{JwtDecoder, TokenRejection};
pub use encoder::JwtEncoder;
