use std::net::IpAddr;

use ticket_auth_core::{ClientAddress, TicketFields};

/// Fields of a ticket that passed validation.
///
/// Only produced by a successful [`crate::TicketVerifier::verify`], so
/// holding one means the digest, binding and expiration checks all passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketInfo {
    user_id: String,
    valid_until: i64,
    tokens: Vec<String>,
    client_ip: Option<ClientAddress>,
    user_data: Option<Vec<u8>>,
}

impl TicketInfo {
    pub(crate) fn from_fields(fields: TicketFields) -> Self {
        Self {
            user_id: fields.user_id,
            valid_until: fields.valid_until,
            tokens: fields.tokens,
            client_ip: fields.client_ip,
            user_data: fields.user_data,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Expiration as a Unix timestamp (exclusive)
    pub fn valid_until(&self) -> i64 {
        self.valid_until
    }

    /// Authorization tokens in issue order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether `token` is among the ticket's authorization tokens
    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// The address the ticket is bound to, if any
    pub fn client_ip(&self) -> Option<IpAddr> {
        self.client_ip.map(|addr| addr.to_ip())
    }

    pub fn user_data(&self) -> Option<&[u8]> {
        self.user_data.as_deref()
    }
}
