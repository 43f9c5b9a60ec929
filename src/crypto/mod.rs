pub mod canonical;
pub mod keys;

pub use keys::{verify_prehash, KeyPair};
