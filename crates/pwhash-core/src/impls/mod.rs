//! Implementations of the ports.

pub mod sha512;

pub use self::sha512::Sha512Base64;
