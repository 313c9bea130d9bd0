//! Site-specific provider implementations.

pub mod a111477;

pub use a111477::A111477Provider;
