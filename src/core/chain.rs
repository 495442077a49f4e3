use crate::core::Block;
use crate::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// Ordered, append-only block sequence. Index 0 is always the genesis block.
///
/// `append` enforces linkage against the current tip. Proof-of-work and
/// content hashes are not re-checked here; see
/// [`ChainValidator`](crate::consensus::ChainValidator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Block>", into = "Vec<Block>")]
pub struct Chain {
    blocks: Vec<Block>,
}

impl TryFrom<Vec<Block>> for Chain {
    type Error = LedgerError;

    fn try_from(blocks: Vec<Block>) -> Result<Self> {
        match blocks.first() {
            Some(genesis) if genesis.is_genesis() => Ok(Self { blocks }),
            Some(_) => Err(LedgerError::InvalidInput(
                "chain must start with a genesis block".to_string(),
            )),
            None => Err(LedgerError::InvalidInput("chain has no blocks".to_string())),
        }
    }
}

impl From<Chain> for Vec<Block> {
    fn from(chain: Chain) -> Self {
        chain.blocks
    }
}

impl Chain {
    pub(crate) fn with_genesis(genesis: Block) -> Self {
        Self {
            blocks: vec![genesis],
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn tip(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Index the next appended block must carry.
    pub fn next_index(&self) -> u64 {
        self.blocks.len() as u64
    }

    pub(crate) fn append(&mut self, block: Block) -> Result<&Block> {
        if !block.is_mined() {
            return Err(LedgerError::Unmined(block.index));
        }

        let expected = self.next_index();
        if block.index != expected {
            return Err(LedgerError::IndexMismatch {
                expected,
                found: block.index,
            });
        }

        let tip = self.tip();
        if block.previous_hash != tip.hash {
            return Err(LedgerError::BrokenLink {
                index: block.index,
                expected: tip.hash.clone(),
                found: block.previous_hash,
            });
        }

        self.blocks.push(block);
        Ok(self.tip())
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
