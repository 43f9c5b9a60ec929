//! Outbound peer networking: transaction/block broadcast and full-chain
//! pull for consensus resolution (spec §4.6/§5). A slow or dead peer
//! must never block delivery to the others, so each request carries its
//! own timeout and errors are logged and swallowed per-peer.

use crate::block::{Block, Transaction};
use crate::config::{BLOCK_BROADCAST_TIMEOUT, CHAIN_PULL_TIMEOUT, TRANSACTION_BROADCAST_TIMEOUT};

fn peer_url(peer: &str, path: &str) -> String {
    format!("http://{peer}{path}")
}

pub async fn broadcast_transaction(client: &reqwest::Client, peers: &[String], tx: &Transaction) {
    for peer in peers {
        let result = client
            .post(peer_url(peer, "/transactions/receive"))
            .timeout(TRANSACTION_BROADCAST_TIMEOUT)
            .json(tx)
            .send()
            .await;
        if let Err(e) = result {
            log::warn!("failed to broadcast transaction to {peer}: {e}");
        }
    }
}

pub async fn broadcast_block(client: &reqwest::Client, peers: &[String], block: &Block) {
    for peer in peers {
        let result = client
            .post(peer_url(peer, "/blocks/receive"))
            .timeout(BLOCK_BROADCAST_TIMEOUT)
            .json(block)
            .send()
            .await;
        match result {
            Ok(resp) if !resp.status().is_success() => {
                log::warn!("peer {peer} rejected broadcast block: {}", resp.status());
            }
            Err(e) => log::warn!("failed to broadcast block to {peer}: {e}"),
            Ok(_) => {}
        }
    }
}

#[derive(serde::Deserialize)]
struct ChainResponse {
    chain: Vec<Block>,
    #[allow(dead_code)]
    length: usize,
}

/// Fetches `peer`'s full chain, returning `None` on any failure
/// (unreachable, timeout, malformed body) so the caller can simply skip
/// that peer rather than aborting consensus resolution entirely.
pub async fn pull_chain(client: &reqwest::Client, peer: &str) -> Option<Vec<Block>> {
    let response = client
        .get(peer_url(peer, "/chain"))
        .timeout(CHAIN_PULL_TIMEOUT)
        .send()
        .await
        .inspect_err(|e| log::warn!("failed to pull chain from {peer}: {e}"))
        .ok()?;

    if !response.status().is_success() {
        log::warn!("peer {peer} returned {} for /chain", response.status());
        return None;
    }

    response
        .json::<ChainResponse>()
        .await
        .inspect_err(|e| log::warn!("malformed chain response from {peer}: {e}"))
        .ok()
        .map(|body| body.chain)
}
