//! Shared node state behind a single exclusive lock (spec §5): the
//! chain, mempool, peer set, and current mining target are mutated
//! together so no handler can observe or act on a half-updated view.

use std::sync::Arc;
use std::time::Duration;

use num_bigint::BigUint;
use parking_lot::Mutex;

use crate::chain::Chain;
use crate::config::NodeConfig;
use crate::mempool::Mempool;
use crate::peers::PeerSet;
use crate::wallet::Wallet;

/// Everything that mutates together. Held behind one [`Mutex`] rather
/// than one lock per field, per spec §5's explicit serialization
/// requirement.
pub struct Ledger {
    pub chain: Chain,
    pub mempool: Mempool,
    pub peers: PeerSet,
    pub current_target: BigUint,
}

impl Ledger {
    pub fn new() -> Self {
        let chain = Chain::new();
        let current_target = chain.current_target();
        Ledger { chain, mempool: Mempool::new(), peers: PeerSet::new(), current_target }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

pub struct NodeState {
    pub wallet: Wallet,
    pub ledger: Mutex<Ledger>,
    pub http: reqwest::Client,
    pub config: NodeConfig,
}

impl NodeState {
    pub fn new(wallet: Wallet, config: NodeConfig) -> Arc<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("reqwest client always builds with a static config");
        Arc::new(NodeState { wallet, ledger: Mutex::new(Ledger::new()), http, config })
    }
}

pub type SharedState = Arc<NodeState>;
