//! Demonstration key persistence. Private keys are written to disk in
//! cleartext PEM — exactly as the reference node's `save_keys()` does —
//! which is fine for a local demo and not appropriate for anything that
//! holds real value. A production node should encrypt this file (e.g.
//! with an OS keychain or a passphrase-derived key) before shipping it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto::KeyPair;
use crate::error::NodeError;

pub struct FileKeystore {
    key_path: PathBuf,
    pub_path: PathBuf,
}

impl FileKeystore {
    /// Resolves the key file pair for an optional node id under
    /// `data_dir`, e.g. `wallet_alice.key` / `wallet_alice.pub`.
    pub fn new(data_dir: &Path, node_id: Option<&str>) -> Self {
        let suffix = node_id.map(|id| format!("_{id}")).unwrap_or_default();
        FileKeystore {
            key_path: data_dir.join(format!("wallet{suffix}.key")),
            pub_path: data_dir.join(format!("wallet{suffix}.pub")),
        }
    }

    /// Loads an existing key pair from disk, generating and persisting a
    /// fresh one if none exists yet — mirrors the reference's
    /// `load_keys()`-falls-back-to-`generate_keys()` bootstrap so a node
    /// always starts with a usable wallet.
    pub fn load_or_generate(&self) -> Result<KeyPair, NodeError> {
        if self.key_path.exists() {
            let pem = fs::read_to_string(&self.key_path)?;
            return KeyPair::from_private_pem(&pem);
        }

        let keys = KeyPair::generate();
        self.save(&keys)?;
        Ok(keys)
    }

    fn save(&self, keys: &KeyPair) -> Result<(), NodeError> {
        if let Some(parent) = self.key_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let private_pem = keys.private_key_pem()?;
        fs::write(&self.key_path, &private_pem)?;
        fs::write(&self.pub_path, keys.public_key_pem())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn generates_and_persists_on_first_load() {
        let dir = tempdir().unwrap();
        let store = FileKeystore::new(dir.path(), Some("alice"));
        let keys = store.load_or_generate().unwrap();
        assert!(dir.path().join("wallet_alice.key").exists());
        assert!(dir.path().join("wallet_alice.pub").exists());

        let reloaded = store.load_or_generate().unwrap();
        assert_eq!(keys.public_key_pem(), reloaded.public_key_pem());
    }

    #[test]
    fn defaults_to_unsuffixed_filenames_without_a_node_id() {
        let dir = tempdir().unwrap();
        let store = FileKeystore::new(dir.path(), None);
        store.load_or_generate().unwrap();
        assert!(dir.path().join("wallet.key").exists());
    }
}
