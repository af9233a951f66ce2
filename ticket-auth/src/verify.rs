use ticket_auth_core::codec;
use ticket_auth_core::{ClientAddress, ClientIp, TicketError, decode_ticket, split_ticket, time};
use tracing::debug;

use crate::factory::TicketFactory;
use crate::info::TicketInfo;

/// Builder for validating a ticket, obtained from [`TicketFactory::verifier`].
///
/// Checks run in a fixed order and stop at the first failure:
///
/// 1. transport decoding and digest/payload split (`Malformed`)
/// 2. constant-time digest comparison (`DigestMismatch`)
/// 3. payload decoding (`Malformed`)
/// 4. client binding (`DigestMismatch`)
/// 5. expiration (`Expired`)
///
/// A binding mismatch is reported exactly like tampering, and it is checked
/// before expiration so a ticket replayed from the wrong address never
/// reveals whether it has also expired.
///
/// # Example
/// ```rust
/// use ticket_auth::TicketFactory;
///
/// let factory = TicketFactory::new(b"secret");
/// let ticket = factory.ticket("user").valid_until(500).issue().unwrap();
///
/// assert!(factory.verifier(&ticket).at(499).verify().is_ok());
/// assert!(factory.verifier(&ticket).at(500).verify().unwrap_err().is_expired());
/// ```
#[must_use = "a ticket verifier does nothing until `verify` is called"]
pub struct TicketVerifier<'a> {
    factory: &'a TicketFactory,
    ticket: &'a str,
    now: Option<i64>,
    client_ip: Option<ClientIp>,
}

impl<'a> TicketVerifier<'a> {
    pub(crate) fn new(factory: &'a TicketFactory, ticket: &'a str) -> Self {
        Self {
            factory,
            ticket,
            now: None,
            client_ip: None,
        }
    }

    /// Validates as of `now` (Unix timestamp) instead of the wall clock.
    pub fn at(mut self, now: i64) -> Self {
        self.now = Some(now);
        self
    }

    /// Supplies the presenting client's address, structured or textual.
    ///
    /// Required for tickets that were issued with a binding; ignored for
    /// tickets that were not.
    pub fn client_ip(mut self, client_ip: impl Into<ClientIp>) -> Self {
        self.client_ip = Some(client_ip.into());
        self
    }

    /// Performs the validation.
    ///
    /// # Returns
    /// * `Ok(TicketInfo)` - If every check passed
    /// * `Err(TicketError)` - The first check that failed
    pub fn verify(self) -> Result<TicketInfo, TicketError> {
        let result = self.check();
        match &result {
            Ok(info) => debug!(
                valid_until = info.valid_until(),
                token_count = info.tokens().len(),
                "ticket accepted"
            ),
            Err(e) => debug!(reason = e.kind(), "ticket rejected"),
        }
        result
    }

    fn check(&self) -> Result<TicketInfo, TicketError> {
        let presented = self
            .client_ip
            .as_ref()
            .map(ClientIp::normalize)
            .transpose()?;

        let raw = decode_ticket(self.ticket, self.factory.encoding())?;
        let algorithm = self.factory.algorithm();
        let (digest, payload) = split_ticket(&raw, algorithm)?;

        algorithm.verify(self.factory.secret(), payload, digest)?;

        let fields = codec::decode(payload)?;

        check_binding(fields.client_ip, presented)?;

        let now = self.now.unwrap_or_else(time::now);
        if now >= fields.valid_until {
            return Err(TicketError::Expired {
                expired_at: fields.valid_until,
                current_time: now,
            });
        }

        Ok(TicketInfo::from_fields(fields))
    }
}

fn check_binding(
    bound: Option<ClientAddress>,
    presented: Option<ClientAddress>,
) -> Result<(), TicketError> {
    match bound {
        None => Ok(()),
        Some(bound) if presented == Some(bound) => Ok(()),
        Some(_) => Err(TicketError::DigestMismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
    use ticket_auth_core::{TicketEncoding, encode_ticket};

    #[test]
    fn test_verify_valid_ticket() {
        let factory = TicketFactory::new(b"secret");
        let ticket = factory
            .ticket("user")
            .tokens(["read"])
            .issue()
            .expect("Failed to issue ticket");

        let info = factory
            .verifier(&ticket)
            .verify()
            .expect("Should verify valid ticket");
        assert_eq!(info.user_id(), "user");
        assert!(info.has_token("read"));
        assert!(!info.has_token("write"));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let factory = TicketFactory::new(b"secret");
        let other = TicketFactory::new(b"secret2");
        let ticket = factory.issue("user").unwrap();

        assert_eq!(
            other.validate(&ticket).unwrap_err(),
            TicketError::DigestMismatch
        );
    }

    #[test]
    fn test_digest_checked_before_expiration() {
        let factory = TicketFactory::new(b"secret");
        let other = TicketFactory::new(b"other");
        let ticket = factory.ticket("user").valid_until(10).issue().unwrap();

        assert!(factory.verifier(&ticket).at(20).verify().unwrap_err().is_expired());
        assert!(
            other
                .verifier(&ticket)
                .at(20)
                .verify()
                .unwrap_err()
                .is_digest_error()
        );
    }

    #[test]
    fn test_binding_checked_before_expiration() {
        let factory = TicketFactory::new(b"secret");
        let ticket = factory
            .ticket("user")
            .valid_until(10)
            .client_ip(Ipv4Addr::new(127, 0, 0, 1))
            .issue()
            .unwrap();

        let err = factory
            .verifier(&ticket)
            .at(20)
            .client_ip("127.0.0.2")
            .verify()
            .unwrap_err();
        assert_eq!(err, TicketError::DigestMismatch);

        let err = factory
            .verifier(&ticket)
            .at(20)
            .client_ip("127.0.0.1")
            .verify()
            .unwrap_err();
        assert!(err.is_expired());
    }

    #[test]
    fn test_ipv6_binding() {
        let factory = TicketFactory::new(b"secret");
        let addr = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x42);
        let ticket = factory.ticket("user").client_ip(addr).issue().unwrap();

        let info = factory
            .verifier(&ticket)
            .client_ip("2001:db8::42")
            .verify()
            .expect("textual IPv6 should match structured IPv6");
        assert_eq!(info.client_ip(), Some(IpAddr::V6(addr)));

        assert!(
            factory
                .verifier(&ticket)
                .client_ip(Ipv4Addr::new(127, 0, 0, 1))
                .verify()
                .unwrap_err()
                .is_digest_error()
        );
    }

    #[test]
    fn test_unbound_ticket_ignores_presented_address() {
        let factory = TicketFactory::new(b"secret");
        let ticket = factory.issue("user").unwrap();
        let info = factory
            .verifier(&ticket)
            .client_ip("10.0.0.1")
            .verify()
            .expect("unbound ticket should accept any client");
        assert_eq!(info.client_ip(), None);
    }

    #[test]
    fn test_invalid_presented_address() {
        let factory = TicketFactory::new(b"secret");
        let ticket = factory.issue("user").unwrap();
        let err = factory
            .verifier(&ticket)
            .client_ip("localhost")
            .verify()
            .unwrap_err();
        assert!(matches!(err, TicketError::InvalidClientAddress { .. }));
    }

    #[test]
    fn test_truncated_ticket_is_malformed() {
        let factory = TicketFactory::new(b"secret");
        let short = encode_ticket(&[0u8; 16], TicketEncoding::Base64Url);
        assert!(factory.validate(&short).unwrap_err().is_malformed());
        assert!(factory.validate("").unwrap_err().is_malformed());
        assert!(factory.validate("***").unwrap_err().is_malformed());
    }

    #[test]
    fn test_authentic_but_undecodable_payload_is_malformed() {
        let factory = TicketFactory::new(b"secret");
        let payload = b"not a payload";
        let digest = factory
            .algorithm()
            .compute(b"secret", payload)
            .unwrap();
        let ticket = encode_ticket(
            &ticket_auth_core::join_ticket(&digest, payload),
            factory.encoding(),
        );

        let err = factory.validate(&ticket).unwrap_err();
        assert!(err.is_malformed(), "got {err:?}");
    }
}
