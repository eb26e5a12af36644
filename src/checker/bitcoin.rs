// src/checker/bitcoin.rs
// =============================================================================
// Checksum validation for Bitcoin addresses (bitcoin: links).
//
// A legacy address is 25 bytes written in base-58:
//
//   [ version (1) | payload (20) | checksum (4) ]
//
// The checksum is the first 4 bytes of SHA-256(SHA-256(version + payload)).
// Checking it catches typos without touching the network, so `verify_exists`
// is ignored.
// =============================================================================

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::parts::UrlParts;
use super::router::SchemeValidator;

const CHECKSUM_LEN: usize = 4;

/// Returns true if `address` decodes from base-58 and carries a valid
/// double-SHA-256 checksum.
pub fn validate_bitcoin(address: &str, _verify_exists: bool) -> bool {
    // bs58 rejects characters outside the alphabet (0, O, I, l, ...)
    let bytes = match bs58::decode(address).into_vec() {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    if bytes.len() <= CHECKSUM_LEN {
        return false;
    }

    let (body, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let digest = Sha256::digest(Sha256::digest(body));
    digest[..CHECKSUM_LEN] == *checksum
}

/// Validator registered for the `bitcoin` scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitcoinValidator;

#[async_trait]
impl SchemeValidator for BitcoinValidator {
    async fn validate(&self, parts: &UrlParts, verify_exists: bool) -> bool {
        // bitcoin:1BoatSLRHtKNngkdXEeobR76b53LETtpyT?amount=1 -> the address
        validate_bitcoin(&parts.path, verify_exists)
    }
}
