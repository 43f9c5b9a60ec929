//! A wallet owns a key pair, signs outgoing transactions, and reports a
//! balance by scanning the chain and mempool (spec §4.2).

pub mod keystore;

use std::time::{SystemTime, UNIX_EPOCH};

use crate::block::Transaction;
use crate::chain::Chain;
use crate::crypto::KeyPair;
use crate::error::NodeError;
use crate::mempool::Mempool;

pub struct Wallet {
    keys: KeyPair,
}

impl Wallet {
    pub fn new(keys: KeyPair) -> Self {
        Wallet { keys }
    }

    pub fn public_key_pem(&self) -> String {
        self.keys.public_key_pem()
    }

    /// Builds and signs a transfer of `amount` to `recipient`, timestamped
    /// at the moment of signing.
    pub fn sign(&self, recipient: &str, amount: f64) -> Result<Transaction, NodeError> {
        let timestamp = now_secs();
        let mut tx = Transaction {
            sender_public_key: self.public_key_pem(),
            recipient: recipient.to_string(),
            amount,
            timestamp,
            signature: String::new(),
        };
        tx.signature = self.keys.sign_prehash(&tx.digest())?;
        Ok(tx)
    }

    /// Scans every transaction in `chain` and `mempool`: adds `amount`
    /// when we are the recipient, subtracts it when we are the sender.
    /// Mempool contributions are included even though a transaction
    /// pending there may later be mined, briefly double-counting it —
    /// this matches the reference wallet's behavior and is documented in
    /// the design notes rather than silently "fixed".
    pub fn balance(&self, chain: &Chain, mempool: &Mempool) -> f64 {
        let our_key = self.public_key_pem();
        let mut balance = 0.0;
        for block in chain.blocks() {
            balance += scan(&our_key, &block.transactions);
        }
        balance += scan(&our_key, mempool.pending());
        balance
    }
}

fn scan(our_key: &str, transactions: &[Transaction]) -> f64 {
    let mut delta = 0.0;
    for tx in transactions {
        if tx.recipient == our_key {
            delta += tx.amount;
        }
        if tx.sender_public_key == our_key {
            delta -= tx.amount;
        }
    }
    delta
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_secs_f64()
}
