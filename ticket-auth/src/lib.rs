//! # Ticket Auth
//!
//! Stateless, tamper-evident authentication tickets.
//!
//! A ticket carries a user id, an expiration time, an ordered list of
//! authorization tokens, an optional client address binding and optional
//! opaque user data. It is protected by an HMAC under a shared secret, so
//! validating one needs only the ticket text, the secret and the current
//! time. No session store is involved.
//!
//! ## Key Design
//!
//! ```text
//! ticket  = transport_encode(digest || payload)
//! digest  = HMAC(secret, payload)
//! payload = length-prefixed fields (see ticket_auth_core::codec)
//! ```
//!
//! Tickets are signed, not encrypted: anyone holding one can read its fields
//! (see [`inspect_ticket`]), but only holders of the secret can mint or
//! accept them.
//!
//! ## Example
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use ticket_auth::{TicketError, TicketFactory};
//!
//! let factory = TicketFactory::new(b"secret");
//! let ticket = factory
//!     .ticket("user")
//!     .valid_until(500)
//!     .client_ip(Ipv4Addr::new(127, 0, 0, 1))
//!     .issue()
//!     .expect("Failed to issue ticket");
//!
//! let info = factory
//!     .verifier(&ticket)
//!     .at(499)
//!     .client_ip("127.0.0.1")
//!     .verify()
//!     .expect("Failed to validate ticket");
//! assert_eq!(info.user_id(), "user");
//!
//! // Wrong address looks exactly like tampering
//! let err = factory.verifier(&ticket).at(499).verify().unwrap_err();
//! assert_eq!(err, TicketError::DigestMismatch);
//! ```

mod factory;
mod info;
mod inspect;
mod mint;
mod verify;

pub use factory::TicketFactory;
pub use info::TicketInfo;
pub use inspect::{InspectResult, inspect_ticket};
pub use mint::TicketBuilder;
pub use verify::TicketVerifier;

// Re-export commonly needed types from core
pub use ticket_auth_core::{
    ClientAddress, ClientIp, DigestAlgorithm, TicketEncoding, TicketError, TicketTimeConfig,
};
