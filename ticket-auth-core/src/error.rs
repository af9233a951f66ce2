use thiserror::Error;

/// Error type for ticket issuance and validation.
///
/// Every variant means the ticket must be rejected. The variants are kept
/// distinct for diagnostics only; callers that just need a yes/no answer can
/// treat any `Err` as "not authenticated".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    // ===== Format Errors =====
    /// Transport decoding failed or the payload framing is inconsistent
    #[error("Malformed ticket: {reason}")]
    Malformed { reason: String },

    /// The payload was written by a format version this build does not read
    #[error("Unsupported ticket version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u8, actual: u8 },

    // ===== Verification Errors =====
    /// Keyed digest did not match.
    ///
    /// Covers a wrong secret, a tampered field and a client address that
    /// differs from the one the ticket was bound to.
    #[error("Ticket digest mismatch")]
    DigestMismatch,

    /// Ticket is authentic but its validity window has passed
    #[error("Ticket expired at {expired_at}, current time is {current_time}")]
    Expired {
        /// When the ticket expired (Unix timestamp)
        expired_at: i64,
        /// Time supplied for the validation (Unix timestamp)
        current_time: i64,
    },

    // ===== Caller Errors =====
    /// A textual client address could not be parsed
    #[error("Invalid client address '{input}': {reason}")]
    InvalidClientAddress { input: String, reason: String },

    /// A field is too large for its length prefix
    #[error("Field '{field}' is too long to encode ({len} bytes)")]
    FieldTooLong { field: &'static str, len: usize },

    // ===== Generic Errors =====
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TicketError {
    /// Check if this error means the ticket bytes could not be parsed
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            TicketError::Malformed { .. } | TicketError::UnsupportedVersion { .. }
        )
    }

    /// Check if this error is a digest failure (tampering, wrong secret or binding)
    pub fn is_digest_error(&self) -> bool {
        matches!(self, TicketError::DigestMismatch)
    }

    /// Check if this error is due to ticket expiration
    pub fn is_expired(&self) -> bool {
        matches!(self, TicketError::Expired { .. })
    }

    /// Get the expiration time if this is an expiration error
    pub fn get_expiration_time(&self) -> Option<i64> {
        match self {
            TicketError::Expired { expired_at, .. } => Some(*expired_at),
            _ => None,
        }
    }

    /// Short, stable name of the failure kind, suitable for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            TicketError::Malformed { .. } => "malformed",
            TicketError::UnsupportedVersion { .. } => "unsupported_version",
            TicketError::DigestMismatch => "digest_mismatch",
            TicketError::Expired { .. } => "expired",
            TicketError::InvalidClientAddress { .. } => "invalid_client_address",
            TicketError::FieldTooLong { .. } => "field_too_long",
            TicketError::Internal(_) => "internal",
        }
    }

    // ===== Constructor Helper Methods =====

    /// Create a malformed-ticket error
    pub fn malformed<S: Into<String>>(reason: S) -> Self {
        TicketError::Malformed {
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        TicketError::Internal(msg.into())
    }
}

impl From<base64::DecodeError> for TicketError {
    fn from(err: base64::DecodeError) -> Self {
        TicketError::Malformed {
            reason: format!("invalid base64: {err}"),
        }
    }
}

impl From<hex::FromHexError> for TicketError {
    fn from(err: hex::FromHexError) -> Self {
        TicketError::Malformed {
            reason: format!("invalid hex: {err}"),
        }
    }
}
