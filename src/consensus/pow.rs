//! Sequential proof-of-work search (spec §4.3). Single-threaded,
//! CPU-bound, and run to completion once started — there is no
//! cancellation path.

use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint::BigUint;

use crate::block::Header;
use crate::consensus::difficulty::parse_target;

/// Result of a successful search: the header that satisfies its own
/// target, with the winning `timestamp` recorded exactly as sampled on
/// the successful attempt (never resampled afterward).
pub struct PowSolution {
    pub header: Header,
}

/// Searches for a `proof` such that `int(header_hash, 16) < target`,
/// resampling `timestamp` on every attempt (matching the reference
/// implementation's `time.time()` call inside the search loop).
pub fn mine(index: u64, previous_hash: &str, target: &BigUint) -> PowSolution {
    let target_str = target.to_string();
    let mut proof: u64 = 0;
    loop {
        let timestamp = now_secs();
        let header = Header {
            index,
            timestamp,
            previous_hash: previous_hash.to_string(),
            proof,
            target: target_str.clone(),
        };
        if satisfies_target(&header) {
            return PowSolution { header };
        }
        proof = proof.wrapping_add(1);
    }
}

/// Checks whether a header's own hash, interpreted as a big-endian
/// integer, is strictly less than its own stored target.
pub fn satisfies_target(header: &Header) -> bool {
    let hash = header.hash();
    let Ok(hash_bytes) = hex::decode(&hash) else {
        return false;
    };
    let hash_int = BigUint::from_bytes_be(&hash_bytes);
    let target = parse_target(&header.target);
    hash_int < target
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::difficulty::max_target;

    #[test]
    fn mined_header_satisfies_its_own_target() {
        let solution = mine(1, "0", &max_target());
        assert!(satisfies_target(&solution.header));
    }

    #[test]
    fn tiny_target_is_rejected_by_a_trivial_header() {
        let header = Header {
            index: 0,
            timestamp: 0.0,
            previous_hash: "0".to_string(),
            proof: 0,
            target: "1".to_string(),
        };
        assert!(!satisfies_target(&header));
    }
}
