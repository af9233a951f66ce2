use std::fmt;

use ticket_auth_core::{DigestAlgorithm, TicketEncoding, TicketError, TicketTimeConfig};
use zeroize::Zeroizing;

use crate::info::TicketInfo;
use crate::mint::TicketBuilder;
use crate::verify::TicketVerifier;

/// Issues and validates tickets under one shared secret.
///
/// The factory is immutable once configured and can be shared freely across
/// threads (clone it, or put it behind an `Arc`). Issuing and validating
/// sides must use the same secret, digest algorithm and transport encoding.
///
/// # Example
/// ```rust
/// use ticket_auth::TicketFactory;
///
/// let factory = TicketFactory::new(b"secret");
/// let ticket = factory
///     .ticket("alice")
///     .valid_until(2_000_000_000)
///     .tokens(["read", "write"])
///     .client_ip("10.0.0.7")
///     .issue()
///     .expect("Failed to issue ticket");
///
/// let info = factory
///     .verifier(&ticket)
///     .at(1_900_000_000)
///     .client_ip("10.0.0.7")
///     .verify()
///     .expect("Failed to validate ticket");
/// assert_eq!(info.user_id(), "alice");
/// assert_eq!(info.tokens(), ["read", "write"]);
/// ```
#[derive(Clone)]
pub struct TicketFactory {
    secret: Zeroizing<Vec<u8>>,
    algorithm: DigestAlgorithm,
    encoding: TicketEncoding,
    time_config: TicketTimeConfig,
}

impl TicketFactory {
    /// Creates a factory with the default configuration
    /// (HMAC-SHA256, base64url, two-hour default lifetime).
    ///
    /// # Arguments
    /// * `secret` - The shared secret; no minimum length is enforced here
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Zeroizing::new(secret.as_ref().to_vec()),
            algorithm: DigestAlgorithm::default(),
            encoding: TicketEncoding::default(),
            time_config: TicketTimeConfig::default(),
        }
    }

    /// Selects the HMAC construction used for the digest.
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Selects the transport text encoding of issued tickets.
    pub fn with_encoding(mut self, encoding: TicketEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the lifetime applied when a ticket is issued without an
    /// explicit `valid_until`.
    pub fn with_time_config(mut self, time_config: TicketTimeConfig) -> Self {
        self.time_config = time_config;
        self
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn encoding(&self) -> TicketEncoding {
        self.encoding
    }

    pub fn time_config(&self) -> TicketTimeConfig {
        self.time_config
    }

    /// Starts building a ticket for `user_id`.
    pub fn ticket(&self, user_id: impl Into<String>) -> TicketBuilder<'_> {
        TicketBuilder::new(self, user_id.into())
    }

    /// Issues a ticket for `user_id` with default lifetime, no tokens and no
    /// client binding.
    pub fn issue(&self, user_id: impl Into<String>) -> Result<String, TicketError> {
        self.ticket(user_id).issue()
    }

    /// Starts validating `ticket`.
    pub fn verifier<'a>(&'a self, ticket: &'a str) -> TicketVerifier<'a> {
        TicketVerifier::new(self, ticket)
    }

    /// Validates `ticket` against the wall clock with no client address.
    pub fn validate(&self, ticket: &str) -> Result<TicketInfo, TicketError> {
        self.verifier(ticket).verify()
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for TicketFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketFactory")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("encoding", &self.encoding)
            .field("time_config", &self.time_config)
            .finish()
    }
}
