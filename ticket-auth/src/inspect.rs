use std::net::IpAddr;

use ticket_auth_core::codec;
use ticket_auth_core::{
    DigestAlgorithm, TicketEncoding, TicketError, decode_ticket, split_ticket, time,
};

/// Result of inspecting a ticket without its secret.
///
/// None of these fields are authenticated; use them for diagnostics and
/// logging only, never for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectResult {
    pub user_id: String,
    /// Unix timestamp when the ticket expires
    pub valid_until: i64,
    pub tokens: Vec<String>,
    /// Bound client address, if any
    pub client_ip: Option<IpAddr>,
    pub user_data: Option<Vec<u8>>,
    /// Whether the ticket is expired according to the wall clock
    pub is_expired: bool,
}

/// Decodes a ticket's fields without checking its digest.
///
/// The caller must name the encoding and algorithm the ticket was issued
/// with, since the digest length determines where the payload starts.
pub fn inspect_ticket(
    ticket: &str,
    encoding: TicketEncoding,
    algorithm: DigestAlgorithm,
) -> Result<InspectResult, TicketError> {
    let raw = decode_ticket(ticket, encoding)?;
    let (_, payload) = split_ticket(&raw, algorithm)?;
    let fields = codec::decode(payload)?;

    Ok(InspectResult {
        is_expired: time::now() >= fields.valid_until,
        client_ip: fields.client_ip.map(|addr| addr.to_ip()),
        user_id: fields.user_id,
        valid_until: fields.valid_until,
        tokens: fields.tokens,
        user_data: fields.user_data,
    })
}
