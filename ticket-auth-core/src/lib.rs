//! # Ticket Auth Core
//!
//! Core utilities and types shared by the ticket factory, including:
//!
//! - Length-prefixed payload codec
//! - Keyed digest (HMAC) computation and constant-time comparison
//! - Client address normalization
//! - Transport encoding of tickets
//! - Time configuration for ticket validity
//! - Common error types

pub mod address;
pub mod codec;
pub mod digest;
pub mod error;
pub mod time;
pub mod utils;

pub use address::{ClientAddress, ClientIp};
pub use codec::TicketFields;
pub use digest::DigestAlgorithm;
pub use error::TicketError;
pub use time::TicketTimeConfig;
pub use utils::{TicketEncoding, decode_ticket, encode_ticket, join_ticket, split_ticket};
