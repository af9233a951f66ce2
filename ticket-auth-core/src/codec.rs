//! Ticket payload codec
//!
//! The payload is the byte string covered by the keyed digest. Every
//! variable-length field is length-prefixed, so user ids and tokens may hold
//! any character, including ones that look like separators.
//!
//! ## Wire Format (version 1)
//!   [ version:1 | valid_until:8 | addr_kind:1 | addr:0/4/16
//!   | user_id_len:4 | user_id | token_count:4 | (token_len:4 | token)*
//!   | data_flag:1 | (data_len:4 | data)? ]
//!
//! All integers are big-endian. Trailing bytes are rejected.

use crate::{ClientAddress, TicketError};
use tracing::trace;

/// Current payload format version
pub const PAYLOAD_VERSION: u8 = 1;

const ADDR_NONE: u8 = 0;
const ADDR_V4: u8 = 4;
const ADDR_V6: u8 = 6;

const DATA_ABSENT: u8 = 0;
const DATA_PRESENT: u8 = 1;

/// version + valid_until + addr_kind + user_id_len + token_count + data_flag
pub const MIN_PAYLOAD_LEN: usize = 1 + 8 + 1 + 4 + 4 + 1;

/// The fields carried by a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFields {
    pub user_id: String,
    pub valid_until: i64,
    pub tokens: Vec<String>,
    pub client_ip: Option<ClientAddress>,
    pub user_data: Option<Vec<u8>>,
}

impl TicketFields {
    /// Fields with no tokens, binding or user data
    pub fn new(user_id: impl Into<String>, valid_until: i64) -> Self {
        Self {
            user_id: user_id.into(),
            valid_until,
            tokens: Vec::new(),
            client_ip: None,
            user_data: None,
        }
    }
}

/// Serialize ticket fields into payload bytes.
///
/// Only fails when a field does not fit its 32-bit length prefix.
pub fn encode(fields: &TicketFields) -> Result<Vec<u8>, TicketError> {
    let mut buf = Vec::with_capacity(
        MIN_PAYLOAD_LEN
            + 16
            + fields.user_id.len()
            + fields.tokens.iter().map(|t| t.len() + 4).sum::<usize>()
            + fields.user_data.as_ref().map_or(0, |d| d.len() + 4),
    );

    buf.push(PAYLOAD_VERSION);
    buf.extend_from_slice(&fields.valid_until.to_be_bytes());

    match &fields.client_ip {
        None => buf.push(ADDR_NONE),
        Some(ClientAddress::V4(octets)) => {
            buf.push(ADDR_V4);
            buf.extend_from_slice(octets);
        }
        Some(ClientAddress::V6(octets)) => {
            buf.push(ADDR_V6);
            buf.extend_from_slice(octets);
        }
    }

    put_bytes(&mut buf, "user_id", fields.user_id.as_bytes())?;

    put_len(&mut buf, "tokens", fields.tokens.len())?;
    for token in &fields.tokens {
        put_bytes(&mut buf, "token", token.as_bytes())?;
    }

    match &fields.user_data {
        None => buf.push(DATA_ABSENT),
        Some(data) => {
            buf.push(DATA_PRESENT);
            put_bytes(&mut buf, "user_data", data)?;
        }
    }

    Ok(buf)
}

/// Parse payload bytes back into ticket fields.
pub fn decode(data: &[u8]) -> Result<TicketFields, TicketError> {
    if data.len() < MIN_PAYLOAD_LEN {
        return Err(TicketError::malformed(format!(
            "payload too short: expected at least {MIN_PAYLOAD_LEN} bytes, got {}",
            data.len()
        )));
    }

    let mut reader = Reader::new(data);

    let version = reader.u8("version")?;
    if version != PAYLOAD_VERSION {
        return Err(TicketError::UnsupportedVersion {
            expected: PAYLOAD_VERSION,
            actual: version,
        });
    }

    let valid_until = i64::from_be_bytes(reader.array("valid_until")?);

    let client_ip = match reader.u8("address kind")? {
        ADDR_NONE => None,
        ADDR_V4 => Some(ClientAddress::V4(reader.array("IPv4 address")?)),
        ADDR_V6 => Some(ClientAddress::V6(reader.array("IPv6 address")?)),
        other => {
            return Err(TicketError::malformed(format!(
                "unknown address kind {other}"
            )));
        }
    };

    let user_id = reader.string("user_id")?;

    let token_count = reader.len("token count")?;
    // Each token needs at least its length prefix; reject impossible counts
    // before allocating.
    if token_count > reader.remaining() / 4 {
        return Err(TicketError::malformed(format!(
            "token count {token_count} exceeds remaining payload"
        )));
    }
    let mut tokens = Vec::with_capacity(token_count);
    for _ in 0..token_count {
        tokens.push(reader.string("token")?);
    }

    let user_data = match reader.u8("user data flag")? {
        DATA_ABSENT => None,
        DATA_PRESENT => Some(reader.bytes("user_data")?.to_vec()),
        other => {
            return Err(TicketError::malformed(format!(
                "unknown user data flag {other}"
            )));
        }
    };

    if reader.remaining() != 0 {
        return Err(TicketError::malformed(format!(
            "{} trailing bytes after payload",
            reader.remaining()
        )));
    }

    trace!(
        user_id_len = user_id.len(),
        token_count = tokens.len(),
        "decoded ticket payload"
    );

    Ok(TicketFields {
        user_id,
        valid_until,
        tokens,
        client_ip,
        user_data,
    })
}

fn put_len(buf: &mut Vec<u8>, field: &'static str, len: usize) -> Result<(), TicketError> {
    let len = u32::try_from(len).map_err(|_| TicketError::FieldTooLong { field, len })?;
    buf.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

fn put_bytes(buf: &mut Vec<u8>, field: &'static str, bytes: &[u8]) -> Result<(), TicketError> {
    put_len(buf, field, bytes.len())?;
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Bounds-checked cursor over payload bytes
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize, field: &str) -> Result<&'a [u8], TicketError> {
        if n > self.remaining() {
            return Err(TicketError::malformed(format!(
                "{field} needs {n} bytes, only {} remain",
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, field: &str) -> Result<[u8; N], TicketError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    fn u8(&mut self, field: &str) -> Result<u8, TicketError> {
        Ok(self.take(1, field)?[0])
    }

    fn len(&mut self, field: &str) -> Result<usize, TicketError> {
        let len = u32::from_be_bytes(self.array(field)?);
        usize::try_from(len)
            .map_err(|_| TicketError::malformed(format!("{field} {len} does not fit in memory")))
    }

    fn bytes(&mut self, field: &str) -> Result<&'a [u8], TicketError> {
        let len = self.len(field)?;
        self.take(len, field)
    }

    fn string(&mut self, field: &str) -> Result<String, TicketError> {
        let bytes = self.bytes(field)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| TicketError::malformed(format!("{field} is not valid UTF-8: {e}")))
    }
}
