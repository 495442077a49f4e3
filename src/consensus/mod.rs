//! Chain integrity validation and replica conflict resolution

pub mod validation;
pub mod resolver;

pub use validation::{ChainValidator, ValidationFailure, ValidationMode};
pub use resolver::ConsensusResolver;
