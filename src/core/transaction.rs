use crate::core::clock::canonical_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Sender used for mining rewards and genesis allocations.
pub const SYSTEM_SENDER: &str = "system";

/// A transfer record. Amounts are not checked; negative values are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
            timestamp,
        }
    }

    pub fn new_reward(recipient: impl Into<String>, amount: f64, timestamp: DateTime<Utc>) -> Self {
        Self::new(SYSTEM_SENDER, recipient, amount, timestamp)
    }

    pub fn is_reward(&self) -> bool {
        self.sender == SYSTEM_SENDER
    }

    /// Canonical JSON object: keys sorted, compact, fixed timestamp precision.
    pub fn canonical_value(&self) -> Value {
        json!({
            "amount": canonical_amount(self.amount),
            "recipient": self.recipient,
            "sender": self.sender,
            "timestamp": canonical_timestamp(&self.timestamp),
        })
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Txn| {} -> {}: {:.2} | Time: {}",
            self.sender,
            self.recipient,
            self.amount,
            self.timestamp.format("%H:%M:%S")
        )
    }
}

/// JSON has no non-finite numbers; those are spelled out so each one
/// still hashes differently.
fn canonical_amount(amount: f64) -> Value {
    if amount.is_finite() {
        json!(amount)
    } else if amount.is_nan() {
        json!("NaN")
    } else if amount > 0.0 {
        json!("inf")
    } else {
        json!("-inf")
    }
}

/// Encodes an ordered batch as a compact JSON array of canonical objects.
pub fn canonical_batch(transactions: &[Transaction]) -> String {
    Value::Array(transactions.iter().map(Transaction::canonical_value).collect()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::{Clock, FixedClock};

    fn at() -> DateTime<Utc> {
        FixedClock::from_unix(1_700_000_000).now()
    }

    #[test]
    fn test_transaction_creation() {
        let tx = Transaction::new("Alice", "Bob", 10.5, at());

        assert_eq!(tx.sender, "Alice");
        assert_eq!(tx.recipient, "Bob");
        assert_eq!(tx.amount, 10.5);
        assert!(!tx.is_reward());
        assert!(Transaction::new_reward("Miner-A", 50.0, at()).is_reward());
    }

    #[test]
    fn test_canonical_encoding_is_stable() {
        let tx = Transaction::new("Alice", "Bob", 10.5, at());
        assert_eq!(
            canonical_batch(&[tx]),
            r#"[{"amount":10.5,"recipient":"Bob","sender":"Alice","timestamp":"2023-11-14T22:13:20.000000Z"}]"#
        );
    }

    #[test]
    fn test_canonical_encoding_preserves_order() {
        let a = Transaction::new("Alice", "Bob", 1.0, at());
        let b = Transaction::new("Bob", "Charlie", 2.0, at());

        let forward = canonical_batch(&[a.clone(), b.clone()]);
        let reversed = canonical_batch(&[b, a]);
        assert_ne!(forward, reversed);
        assert_eq!(canonical_batch(&[]), "[]");
    }

    #[test]
    fn test_permissive_amounts() {
        let tx = Transaction::new("", "", -3.0, at());
        assert_eq!(tx.amount, -3.0);
        assert!(canonical_batch(&[tx]).contains(r#""amount":-3.0"#));
    }

    #[test]
    fn test_non_finite_amounts_encode_distinctly() {
        let encode = |amount| canonical_batch(&[Transaction::new("A", "B", amount, at())]);

        let encodings = [
            encode(f64::INFINITY),
            encode(f64::NEG_INFINITY),
            encode(f64::NAN),
            encode(0.0),
        ];
        assert!(encodings[0].contains(r#""amount":"inf""#));
        assert!(encodings[1].contains(r#""amount":"-inf""#));
        assert!(encodings[2].contains(r#""amount":"NaN""#));
        for (i, a) in encodings.iter().enumerate() {
            for b in &encodings[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_display() {
        let tx = Transaction::new("Alice", "Bob", 10.5, at());
        assert_eq!(tx.to_string(), "Txn| Alice -> Bob: 10.50 | Time: 22:13:20");
    }
}
