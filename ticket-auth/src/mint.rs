use ticket_auth_core::codec::{self, TicketFields};
use ticket_auth_core::{ClientIp, TicketError, encode_ticket, join_ticket};
use tracing::debug;

use crate::factory::TicketFactory;

/// Builder for a single ticket, obtained from [`TicketFactory::ticket`].
///
/// Nothing is validated until [`TicketBuilder::issue`]; user ids, tokens and
/// user data may hold any content, including the empty string.
///
/// # Example
/// ```rust
/// use std::net::Ipv4Addr;
/// use ticket_auth::TicketFactory;
///
/// let factory = TicketFactory::new(b"secret");
/// let ticket = factory
///     .ticket("user")
///     .token("admin")
///     .client_ip(Ipv4Addr::LOCALHOST)
///     .user_data(b"opaque".to_vec())
///     .issue()
///     .expect("Failed to issue ticket");
/// assert!(!ticket.is_empty());
/// ```
#[must_use = "a ticket builder does nothing until `issue` is called"]
pub struct TicketBuilder<'a> {
    factory: &'a TicketFactory,
    user_id: String,
    valid_until: Option<i64>,
    tokens: Vec<String>,
    client_ip: Option<ClientIp>,
    user_data: Option<Vec<u8>>,
}

impl<'a> TicketBuilder<'a> {
    pub(crate) fn new(factory: &'a TicketFactory, user_id: String) -> Self {
        Self {
            factory,
            user_id,
            valid_until: None,
            tokens: Vec::new(),
            client_ip: None,
            user_data: None,
        }
    }

    /// Sets the absolute expiration (Unix timestamp, exclusive).
    ///
    /// Defaults to the factory's time configuration.
    pub fn valid_until(mut self, valid_until: i64) -> Self {
        self.valid_until = Some(valid_until);
        self
    }

    /// Replaces the authorization tokens, preserving order.
    pub fn tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one authorization token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.tokens.push(token.into());
        self
    }

    /// Binds the ticket to a client address, structured or textual.
    pub fn client_ip(mut self, client_ip: impl Into<ClientIp>) -> Self {
        self.client_ip = Some(client_ip.into());
        self
    }

    /// Attaches opaque user data. It is authenticated, not encrypted.
    pub fn user_data(mut self, user_data: impl Into<Vec<u8>>) -> Self {
        self.user_data = Some(user_data.into());
        self
    }

    /// Issues (encodes and digests) the ticket.
    ///
    /// # Returns
    /// Transport-encoded `digest || payload`
    pub fn issue(self) -> Result<String, TicketError> {
        let client_ip = self.client_ip.as_ref().map(ClientIp::normalize).transpose()?;
        let valid_until = self
            .valid_until
            .unwrap_or_else(|| self.factory.time_config().expiration());

        let fields = TicketFields {
            user_id: self.user_id,
            valid_until,
            tokens: self.tokens,
            client_ip,
            user_data: self.user_data,
        };

        let payload = codec::encode(&fields)?;
        let digest = self
            .factory
            .algorithm()
            .compute(self.factory.secret(), &payload)?;
        let ticket = encode_ticket(&join_ticket(&digest, &payload), self.factory.encoding());

        debug!(
            valid_until,
            token_count = fields.tokens.len(),
            bound = fields.client_ip.is_some(),
            algorithm = %self.factory.algorithm(),
            "issued ticket"
        );

        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_auth_core::{ClientAddress, decode_ticket, split_ticket};

    fn payload_of(factory: &TicketFactory, ticket: &str) -> TicketFields {
        let raw = decode_ticket(ticket, factory.encoding()).unwrap();
        let (_, payload) = split_ticket(&raw, factory.algorithm()).unwrap();
        codec::decode(payload).unwrap()
    }

    #[test]
    fn test_builder_fields_reach_payload() {
        let factory = TicketFactory::new(b"secret");
        let ticket = factory
            .ticket("user")
            .valid_until(500)
            .tokens(["a", "b"])
            .token("c")
            .client_ip("127.0.0.1")
            .user_data(vec![1, 2, 3])
            .issue()
            .expect("Failed to issue ticket");

        let fields = payload_of(&factory, &ticket);
        assert_eq!(fields.user_id, "user");
        assert_eq!(fields.valid_until, 500);
        assert_eq!(fields.tokens, vec!["a", "b", "c"]);
        assert_eq!(fields.client_ip, Some(ClientAddress::V4([127, 0, 0, 1])));
        assert_eq!(fields.user_data, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_tokens_replaces_previous() {
        let factory = TicketFactory::new(b"secret");
        let ticket = factory
            .ticket("user")
            .token("dropped")
            .tokens(vec!["kept".to_string()])
            .issue()
            .unwrap();
        assert_eq!(payload_of(&factory, &ticket).tokens, vec!["kept"]);
    }

    #[test]
    fn test_invalid_client_ip_fails_issue() {
        let factory = TicketFactory::new(b"secret");
        let err = factory
            .ticket("user")
            .client_ip("300.1.1.1")
            .issue()
            .expect_err("invalid address should not be accepted");
        assert!(matches!(err, TicketError::InvalidClientAddress { .. }));
    }

    #[test]
    fn test_issuing_is_deterministic() {
        let factory = TicketFactory::new(b"secret");
        let a = factory.ticket("user").valid_until(10).issue().unwrap();
        let b = factory.ticket("user").valid_until(10).issue().unwrap();
        assert_eq!(a, b);
    }
}
