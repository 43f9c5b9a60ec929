//! Difficulty retargeting (spec §4.4). Constants are pinned, not
//! configurable, because hash/target agreement across nodes depends on
//! every node retargeting by the same rule.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::block::Block;

pub const TARGET_BLOCK_TIME: f64 = 15.0;
pub const RECALCULATION_INTERVAL: usize = 5;
pub const BOUND_DIVISOR: f64 = 4.0;

/// `MAX_TARGET`, the ceiling every target is clamped to and the genesis
/// block's starting target: 252 low bits set (`0x000fffff…ff`).
pub fn max_target() -> BigUint {
    (BigUint::one() << 252u32) - BigUint::one()
}

pub fn initial_target() -> BigUint {
    max_target()
}

/// Recomputes the mining target from the most recent
/// [`RECALCULATION_INTERVAL`] blocks of `chain`. Returns `None` when
/// retargeting does not apply (chain too short, or the expected window
/// degenerates to zero) — the caller should keep `current_target`
/// unchanged in that case.
pub fn retarget(chain: &[Block], current_target: &BigUint) -> Option<BigUint> {
    if chain.len() < RECALCULATION_INTERVAL {
        return None;
    }

    let first = &chain[chain.len() - RECALCULATION_INTERVAL];
    let last = chain.last().expect("checked non-empty above");

    let expected = RECALCULATION_INTERVAL as f64 * TARGET_BLOCK_TIME;
    if expected == 0.0 {
        return None;
    }

    let mut actual = last.header.timestamp - first.header.timestamp;
    if actual <= 0.0 {
        actual = expected;
    }

    let factor = (actual / expected).clamp(1.0 / BOUND_DIVISOR, BOUND_DIVISOR);

    let scaled = (current_target.clone() * scale_numerator(factor)) / scale_denominator();
    let new_target = scaled.max(BigUint::one()).min(max_target());
    Some(new_target)
}

/// Fixed-point scaling for `current_target * factor` using integer math:
/// `factor` is expressed as `numerator / DENOM` at a precision sufficient
/// for the clamp range `[1/BOUND_DIVISOR, BOUND_DIVISOR]`.
const FACTOR_DENOM: u64 = 1_000_000;

fn scale_numerator(factor: f64) -> BigUint {
    BigUint::from((factor * FACTOR_DENOM as f64).round() as u64)
}

fn scale_denominator() -> BigUint {
    BigUint::from(FACTOR_DENOM)
}

/// Parses a block's stored decimal target string into a [`BigUint`],
/// defaulting to zero (which no hash can satisfy) on malformed input so
/// a corrupt block is rejected rather than panicking.
pub fn parse_target(target: &str) -> BigUint {
    target.parse().unwrap_or_else(|_| BigUint::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Header;

    fn block_at(index: u64, timestamp: f64) -> Block {
        Block::new(
            Header {
                index,
                timestamp,
                previous_hash: "0".to_string(),
                proof: 0,
                target: initial_target().to_string(),
            },
            vec![],
        )
    }

    #[test]
    fn retarget_skipped_when_chain_too_short() {
        let chain = vec![block_at(0, 0.0), block_at(1, 15.0)];
        assert!(retarget(&chain, &initial_target()).is_none());
    }

    #[test]
    fn slower_than_expected_raises_target_within_bound() {
        // actual = 2x expected -> factor = 2 -> target doubles (difficulty halves).
        let chain: Vec<Block> = (0..=5)
            .map(|i| block_at(i, i as f64 * (2.0 * TARGET_BLOCK_TIME)))
            .collect();
        let current = initial_target() / BigUint::from(4u32);
        let new_target = retarget(&chain, &current).unwrap();
        assert!(new_target > current);
        assert!(new_target <= &current * BigUint::from(2u32) + BigUint::from(1u32));
    }

    #[test]
    fn non_positive_actual_is_treated_as_expected() {
        let chain: Vec<Block> = (0..=5).map(|i| block_at(i, 0.0)).collect();
        let current = initial_target() / BigUint::from(2u32);
        let new_target = retarget(&chain, &current).unwrap();
        // factor == 1, target unchanged (modulo integer rounding).
        let diff = if new_target > current { &new_target - &current } else { &current - &new_target };
        assert!(diff < BigUint::from(1000u32));
    }

    #[test]
    fn new_target_never_exceeds_max_target() {
        let chain: Vec<Block> = (0..=5)
            .map(|i| block_at(i, i as f64 * (8.0 * TARGET_BLOCK_TIME)))
            .collect();
        let new_target = retarget(&chain, &max_target()).unwrap();
        assert!(new_target <= max_target());
    }
}
