//! JWT token encoding, decoding, and claims management.
//!
//! Access and refresh tokens are signed with two distinct HMAC secrets so
//! that a token of one kind never verifies as the other.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{AccessClaims, RefreshClaims};
pub use decoder::{JwtDecoder, verify};
pub use encoder::JwtEncoder;
