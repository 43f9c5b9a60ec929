//! Pending transactions awaiting inclusion in a mined block (spec §3/§4.6).

use crate::block::Transaction;

#[derive(Debug, Clone, Default)]
pub struct Mempool {
    pending: Vec<Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Mempool::default()
    }

    pub fn insert(&mut self, tx: Transaction) {
        self.pending.push(tx);
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Empties the pool after a local mine has swept everything into a
    /// block.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Removes every pending transaction whose signature appears in
    /// `block`, used after accepting a peer-mined block.
    pub fn prune_included(&mut self, block_transactions: &[Transaction]) {
        self.pending
            .retain(|tx| !block_transactions.iter().any(|included| included.signature == tx.signature));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(signature: &str) -> Transaction {
        Transaction {
            sender_public_key: "pk".to_string(),
            recipient: "addr".to_string(),
            amount: 1.0,
            timestamp: 1.0,
            signature: signature.to_string(),
        }
    }

    #[test]
    fn insert_then_clear_empties_pool() {
        let mut pool = Mempool::new();
        pool.insert(tx("a"));
        pool.clear();
        assert!(pool.pending().is_empty());
    }

    #[test]
    fn prune_included_removes_only_matching_signatures() {
        let mut pool = Mempool::new();
        pool.insert(tx("a"));
        pool.insert(tx("b"));
        pool.prune_included(&[tx("a")]);
        assert_eq!(pool.pending().len(), 1);
        assert_eq!(pool.pending()[0].signature, "b");
    }
}
