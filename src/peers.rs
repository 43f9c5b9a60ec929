//! The set of known peer node addresses (spec §3/§6).

use std::collections::HashSet;

use url::Url;

#[derive(Debug, Clone, Default)]
pub struct PeerSet {
    peers: HashSet<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        PeerSet::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.peers.iter()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Registers a peer address, accepting either `scheme://host:port` or
    /// bare `host:port` and normalizing to `host:port`. Mirrors the
    /// reference's `urlparse(...).netloc` with a fallback to `.path` when
    /// no scheme is present.
    pub fn add(&mut self, address: &str) -> Result<(), String> {
        let normalized = normalize_address(address)?;
        self.peers.insert(normalized);
        Ok(())
    }
}

fn normalize_address(address: &str) -> Result<String, String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err("empty peer address".to_string());
    }

    if let Ok(url) = Url::parse(trimmed) {
        if let Some(host) = url.host_str() {
            return match url.port() {
                Some(port) => Ok(format!("{host}:{port}")),
                None => Ok(host.to_string()),
            };
        }
    }

    // No scheme: treat the whole string as `host:port`.
    if trimmed.contains("://") {
        return Err(format!("could not parse peer address: {address}"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_host_port() {
        let mut peers = PeerSet::new();
        peers.add("192.168.0.5:5001").unwrap();
        assert!(peers.iter().any(|p| p == "192.168.0.5:5001"));
    }

    #[test]
    fn accepts_scheme_prefixed_address() {
        let mut peers = PeerSet::new();
        peers.add("http://192.168.0.5:5001").unwrap();
        assert!(peers.iter().any(|p| p == "192.168.0.5:5001"));
    }

    #[test]
    fn deduplicates_equivalent_addresses() {
        let mut peers = PeerSet::new();
        peers.add("http://host:5001").unwrap();
        peers.add("host:5001").unwrap();
        assert_eq!(peers.len(), 1);
    }
}
