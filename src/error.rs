use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// All failure modes of the node, from malformed wire input up to local
/// invariant violations. Handlers map each variant onto an HTTP status;
/// library code never panics on attacker-controlled input.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("cryptographic failure: {0}")]
    CryptoFailure(String),

    #[error("chain integrity violation: {0}")]
    ChainIntegrity(String),

    #[error("peer unreachable: {0}")]
    PeerUnreachable(String),

    #[error("local invariant violation: {0}")]
    Invariant(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let status = match self {
            NodeError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            NodeError::CryptoFailure(_) => StatusCode::BAD_REQUEST,
            NodeError::ChainIntegrity(_) => StatusCode::BAD_REQUEST,
            NodeError::PeerUnreachable(_) => StatusCode::BAD_GATEWAY,
            NodeError::Invariant(_) => StatusCode::INTERNAL_SERVER_ERROR,
            NodeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

pub type NodeResult<T> = Result<T, NodeError>;
