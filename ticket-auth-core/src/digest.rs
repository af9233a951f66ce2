//! Keyed digest over ticket payloads

use crate::TicketError;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use std::fmt;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// HMAC construction used to authenticate ticket payloads.
///
/// Both sides of a deployment must agree on the algorithm; it is not
/// recorded in the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    /// HMAC-SHA256, 32-byte digest
    #[default]
    Sha256,
    /// HMAC-SHA512, 64-byte digest
    Sha512,
}

impl DigestAlgorithm {
    /// Length in bytes of the digest that prefixes every ticket
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    /// Compute the keyed digest of `payload`.
    pub fn compute(&self, secret: &[u8], payload: &[u8]) -> Result<Vec<u8>, TicketError> {
        match self {
            DigestAlgorithm::Sha256 => {
                let mut mac = HmacSha256::new_from_slice(secret)
                    .map_err(|e| TicketError::internal(format!("invalid HMAC key: {e}")))?;
                mac.update(payload);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            DigestAlgorithm::Sha512 => {
                let mut mac = HmacSha512::new_from_slice(secret)
                    .map_err(|e| TicketError::internal(format!("invalid HMAC key: {e}")))?;
                mac.update(payload);
                Ok(mac.finalize().into_bytes().to_vec())
            }
        }
    }

    /// Recompute the digest of `payload` and compare it with `digest` in
    /// constant time.
    pub fn verify(&self, secret: &[u8], payload: &[u8], digest: &[u8]) -> Result<(), TicketError> {
        let expected = self.compute(secret, payload)?;
        if digests_match(&expected, digest) {
            Ok(())
        } else {
            Err(TicketError::DigestMismatch)
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Sha256 => write!(f, "hmac-sha256"),
            DigestAlgorithm::Sha512 => write!(f, "hmac-sha512"),
        }
    }
}

/// Constant-time equality; the length check is not secret.
pub fn digests_match(expected: &[u8], actual: &[u8]) -> bool {
    if expected.len() != actual.len() {
        return false;
    }
    expected.ct_eq(actual).into()
}
