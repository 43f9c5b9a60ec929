//! Local mining: sweep the mempool, mint a coinbase, search for proof,
//! append, and clear (spec §4.3).

use crate::block::{Block, Transaction, COINBASE_REWARD, COINBASE_SENDER, COINBASE_SIGNATURE};
use crate::chain::Chain;
use crate::consensus::difficulty::retarget;
use crate::consensus::pow::mine as pow_mine;
use crate::error::NodeError;
use crate::mempool::Mempool;
use crate::wallet::Wallet;
use num_bigint::BigUint;

/// Mines one block on top of `chain` using the pending contents of
/// `mempool`, credits `wallet`'s public key with the coinbase reward,
/// appends the result to `chain`, and empties `mempool`. Returns the
/// mined block so the caller can broadcast it.
pub fn mine_block(
    wallet: &Wallet,
    chain: &mut Chain,
    mempool: &mut Mempool,
    current_target: &BigUint,
) -> Result<Block, NodeError> {
    let index = chain.tip().index() + 1;
    let previous_hash = chain.tip().hash();

    let solution = pow_mine(index, &previous_hash, current_target);

    let mut transactions: Vec<Transaction> = mempool.pending().to_vec();
    let reward = Transaction {
        sender_public_key: COINBASE_SENDER.to_string(),
        recipient: wallet.public_key_pem(),
        amount: COINBASE_REWARD,
        timestamp: solution.header.timestamp,
        signature: COINBASE_SIGNATURE.to_string(),
    };
    transactions.push(reward);

    let block = Block::new(solution.header, transactions);

    chain
        .append(block.clone())
        .map_err(|e| NodeError::Invariant(format!("mined block rejected by own chain: {e}")))?;
    mempool.clear();

    Ok(block)
}

/// Recomputes the mining target for the next block, if the chain has
/// grown enough since the last retarget to warrant it. Returns the
/// unchanged target otherwise (spec §4.4 edge cases).
pub fn next_target(chain: &Chain, current_target: &BigUint) -> BigUint {
    retarget(chain.blocks(), current_target).unwrap_or_else(|| current_target.clone())
}
