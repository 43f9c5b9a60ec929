//! The replicated ledger itself: genesis, append, and full-chain
//! validation (spec §4.5).

use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint::BigUint;

use crate::block::Block;
use crate::consensus::difficulty::{initial_target, parse_target};
use crate::consensus::pow::satisfies_target;

#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Builds a fresh chain containing only the genesis block.
    pub fn new() -> Self {
        Chain { blocks: vec![genesis_block()] }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn tip(&self) -> &Block {
        self.blocks.last().expect("chain always has a genesis block")
    }

    /// Appends `block` after verifying it extends the current tip. This
    /// is the single choke point every mined or peer-received block must
    /// pass through.
    pub fn append(&mut self, mut block: Block) -> Result<(), String> {
        let tip = self.tip();
        if block.index() != tip.index() + 1 {
            return Err(format!(
                "block index {} does not extend tip {}",
                block.index(),
                tip.index()
            ));
        }
        if block.header.previous_hash != tip.hash() {
            return Err("previous_hash does not match current tip".to_string());
        }
        if !satisfies_target(&block.header) {
            return Err("block does not satisfy its own target".to_string());
        }
        for tx in &block.transactions {
            if !tx.verify() {
                return Err("block contains a transaction with an invalid signature".to_string());
            }
        }
        block.hash = block.header.hash();
        self.blocks.push(block);
        Ok(())
    }

    /// Replaces this chain wholesale with `candidate`, used by consensus
    /// after a longer valid chain is found. Caller is responsible for
    /// having already checked `candidate.len() > self.len()`. Each
    /// block's `hash` is recomputed from its header rather than trusting
    /// whatever the donating peer sent.
    pub fn replace(&mut self, mut candidate: Vec<Block>) {
        for block in &mut candidate {
            block.hash = block.header.hash();
        }
        self.blocks = candidate;
    }

    /// The target embedded in the chain's current tip, i.e. the target
    /// the next mined block should use absent a fresh retarget.
    pub fn current_target(&self) -> BigUint {
        parse_target(&self.tip().header.target)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

fn genesis_block() -> Block {
    use crate::block::Header;
    Block::new(
        Header {
            index: 0,
            timestamp: now_secs(),
            previous_hash: "0".to_string(),
            proof: 1,
            target: initial_target().to_string(),
        },
        vec![],
    )
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_secs_f64()
}

/// Validates an entire candidate chain independently of any local state
/// (spec §4.5): genesis shape, linkage, per-block proof, and every
/// non-coinbase transaction's signature.
pub fn valid_chain(candidate: &[Block]) -> bool {
    let Some(genesis) = candidate.first() else {
        return false;
    };
    if genesis.header.index != 0 || genesis.header.previous_hash != "0" {
        return false;
    }
    if !satisfies_target(&genesis.header) {
        return false;
    }

    for window in candidate.windows(2) {
        let (prev, current) = (&window[0], &window[1]);
        if current.header.previous_hash != prev.hash() {
            return false;
        }
        if !satisfies_target(&current.header) {
            return false;
        }
        for tx in &current.transactions {
            if !tx.verify() {
                return false;
            }
        }
    }

    for tx in &genesis.transactions {
        if !tx.verify() {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Header, Transaction, COINBASE_REWARD, COINBASE_SENDER, COINBASE_SIGNATURE};
    use crate::consensus::pow::mine;

    #[test]
    fn fresh_chain_has_only_genesis() {
        let chain = Chain::new();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.tip().index(), 0);
    }

    #[test]
    fn genesis_only_chain_is_valid() {
        let chain = Chain::new();
        assert!(valid_chain(chain.blocks()));
    }

    #[test]
    fn append_rejects_index_gap() {
        let mut chain = Chain::new();
        let bogus = Block::new(
            Header {
                index: 5,
                timestamp: 1.0,
                previous_hash: chain.tip().hash(),
                proof: 0,
                target: chain.current_target().to_string(),
            },
            vec![],
        );
        assert!(chain.append(bogus).is_err());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn append_accepts_mined_successor() {
        let mut chain = Chain::new();
        let target = chain.current_target();
        let solution = mine(chain.tip().index() + 1, &chain.tip().hash(), &target);
        let reward = Transaction {
            sender_public_key: COINBASE_SENDER.to_string(),
            recipient: "miner".to_string(),
            amount: COINBASE_REWARD,
            timestamp: solution.header.timestamp,
            signature: COINBASE_SIGNATURE.to_string(),
        };
        let block = Block::new(solution.header, vec![reward]);
        assert!(chain.append(block).is_ok());
        assert_eq!(chain.len(), 2);
    }
}
