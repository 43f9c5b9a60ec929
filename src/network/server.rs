//! HTTP wire surface (spec §6): eight routes plus a plain-text liveness
//! diagnostic carried over from the reference node's bare `GET /` route.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::block::{Block, Transaction};
use crate::chain::valid_chain;
use crate::error::{NodeError, NodeResult};
use crate::mining::{mine_block, next_target};
use crate::network::broadcast::{broadcast_block, broadcast_transaction, pull_chain};
use crate::network::state::SharedState;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chain", get(get_chain))
        .route("/transactions/new", post(new_transaction))
        .route("/transactions/receive", post(receive_transaction))
        .route("/mine", get(mine))
        .route("/blocks/receive", post(receive_block))
        .route("/nodes/register", post(register_nodes))
        .route("/nodes/resolve", get(resolve_nodes))
        .route("/wallet/balance", get(wallet_balance))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index(State(state): State<SharedState>) -> Json<Value> {
    let ledger = state.ledger.lock();
    Json(json!({
        "public_key": state.wallet.public_key_pem(),
        "peers": ledger.peers.iter().collect::<Vec<_>>(),
    }))
}

async fn get_chain(State(state): State<SharedState>) -> Json<Value> {
    let ledger = state.ledger.lock();
    Json(json!({
        "chain": ledger.chain.blocks(),
        "length": ledger.chain.len(),
    }))
}

async fn new_transaction(
    State(state): State<SharedState>,
    Json(tx): Json<Transaction>,
) -> NodeResult<(StatusCode, Json<Value>)> {
    if !tx.verify() {
        return Err(NodeError::CryptoFailure("transaction signature does not verify".to_string()));
    }

    let peers: Vec<String> = {
        let mut ledger = state.ledger.lock();
        ledger.mempool.insert(tx.clone());
        ledger.peers.iter().cloned().collect()
    };

    broadcast_transaction(&state.http, &peers, &tx).await;

    Ok((StatusCode::CREATED, Json(json!({ "message": "transaction added to mempool" }))))
}

async fn receive_transaction(
    State(state): State<SharedState>,
    Json(tx): Json<Transaction>,
) -> NodeResult<(StatusCode, Json<Value>)> {
    if !tx.verify() {
        return Err(NodeError::CryptoFailure("transaction signature does not verify".to_string()));
    }
    state.ledger.lock().mempool.insert(tx);
    Ok((StatusCode::CREATED, Json(json!({ "message": "transaction accepted" }))))
}

async fn mine(State(state): State<SharedState>) -> NodeResult<Json<Value>> {
    let (block, peers) = {
        let mut ledger = state.ledger.lock();
        let target = ledger.current_target.clone();
        let block = mine_block(&state.wallet, &mut ledger.chain, &mut ledger.mempool, &target)?;
        ledger.current_target = next_target(&ledger.chain, &target);
        (block, ledger.peers.iter().cloned().collect::<Vec<_>>())
    };

    broadcast_block(&state.http, &peers, &block).await;

    let mut body = serde_json::to_value(&block).expect("block always serializes");
    body["message"] = json!("New Block Forged");
    Ok(Json(body))
}

async fn receive_block(
    State(state): State<SharedState>,
    Json(block): Json<Block>,
) -> NodeResult<(StatusCode, Json<Value>)> {
    let mut ledger = state.ledger.lock();
    let transactions = block.transactions.clone();
    ledger.chain.append(block).map_err(NodeError::ChainIntegrity)?;
    ledger.mempool.prune_included(&transactions);

    Ok((StatusCode::CREATED, Json(json!({ "message": "block accepted" }))))
}

#[derive(Deserialize)]
struct RegisterNodesRequest {
    nodes: Vec<String>,
}

async fn register_nodes(
    State(state): State<SharedState>,
    Json(request): Json<RegisterNodesRequest>,
) -> Json<Value> {
    let mut added = 0usize;
    let mut failed = Vec::new();
    let mut ledger = state.ledger.lock();
    for node in &request.nodes {
        match ledger.peers.add(node) {
            Ok(()) => added += 1,
            Err(_) => failed.push(node.clone()),
        }
    }

    Json(json!({
        "nodes_added": added,
        "nodes_failed": failed,
        "total_nodes": ledger.peers.len(),
    }))
}

async fn resolve_nodes(State(state): State<SharedState>) -> Json<Value> {
    let peers: Vec<String> = state.ledger.lock().peers.iter().cloned().collect();

    let mut best: Option<Vec<Block>> = None;
    for peer in &peers {
        if let Some(candidate) = pull_chain(&state.http, peer).await {
            let current_len = state.ledger.lock().chain.len();
            if candidate.len() > current_len && valid_chain(&candidate) {
                let replace = best.as_ref().map(|b| candidate.len() > b.len()).unwrap_or(true);
                if replace {
                    best = Some(candidate);
                }
            }
        }
    }

    let mut ledger = state.ledger.lock();
    // Key name flips on outcome (spec §6): `new_chain` when a longer
    // valid chain replaced ours, `chain` when ours stayed authoritative
    // — matching the reference's own `resolve_conflicts` response shape.
    let body = match best {
        Some(new_chain) => {
            let new_target = new_chain.last().expect("validated non-empty").header.target.clone();
            ledger.chain.replace(new_chain);
            ledger.current_target = crate::consensus::difficulty::parse_target(&new_target);
            json!({
                "message": "our chain was replaced",
                "new_chain": ledger.chain.blocks(),
            })
        }
        None => json!({
            "message": "our chain is authoritative",
            "chain": ledger.chain.blocks(),
        }),
    };

    Json(body)
}

async fn wallet_balance(State(state): State<SharedState>) -> Json<Value> {
    let ledger = state.ledger.lock();
    let balance = state.wallet.balance(&ledger.chain, &ledger.mempool);
    Json(json!({
        "public_key": state.wallet.public_key_pem(),
        "balance": balance,
    }))
}
