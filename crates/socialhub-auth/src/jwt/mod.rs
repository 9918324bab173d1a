//! Bearer token claims, signing, and validation.

pub mod authenticator;
pub mod claims;
pub mod decoder;
pub mod encoder;

pub use authenticator::TokenAuthenticator;
pub use claims::Claims;
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
