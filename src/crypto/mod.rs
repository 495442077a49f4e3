//! Cryptographic primitives for powledger

pub mod hash;

pub use hash::{Hash256, Hashable};
