use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::{DigestAlgorithm, TicketError};

/// Text encoding applied to `digest || payload` so tickets fit in cookies
/// and headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicketEncoding {
    /// URL-safe base64 without padding
    #[default]
    Base64Url,
    /// Lowercase hexadecimal
    Hex,
}

/// Encode raw ticket bytes to transport text
pub fn encode_ticket(raw: &[u8], encoding: TicketEncoding) -> String {
    match encoding {
        TicketEncoding::Base64Url => URL_SAFE_NO_PAD.encode(raw),
        TicketEncoding::Hex => hex::encode(raw),
    }
}

/// Decode transport text back to raw ticket bytes
pub fn decode_ticket(ticket: &str, encoding: TicketEncoding) -> Result<Vec<u8>, TicketError> {
    let ticket = ticket.trim();
    let raw = match encoding {
        TicketEncoding::Base64Url => URL_SAFE_NO_PAD.decode(ticket)?,
        TicketEncoding::Hex => hex::decode(ticket)?,
    };
    Ok(raw)
}

/// Split raw ticket bytes into `(digest, payload)`.
pub fn split_ticket(raw: &[u8], algorithm: DigestAlgorithm) -> Result<(&[u8], &[u8]), TicketError> {
    let digest_len = algorithm.output_len();
    if raw.len() < digest_len {
        return Err(TicketError::malformed(format!(
            "ticket too short: {} bytes, digest alone is {digest_len}",
            raw.len()
        )));
    }
    Ok(raw.split_at(digest_len))
}

/// Concatenate digest and payload into raw ticket bytes
pub fn join_ticket(digest: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut raw = Vec::with_capacity(digest.len() + payload.len());
    raw.extend_from_slice(digest);
    raw.extend_from_slice(payload);
    raw
}
