use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Block {index} does not link to the chain tip: expected previous hash {expected}, got {found}")]
    BrokenLink {
        index: u64,
        expected: String,
        found: String,
    },

    #[error("Block index mismatch: expected {expected}, got {found}")]
    IndexMismatch { expected: u64, found: u64 },

    #[error("Block {0} has not been mined")]
    Unmined(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
