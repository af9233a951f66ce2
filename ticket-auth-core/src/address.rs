//! Client address normalization
//!
//! Callers may hand a client address over as a parsed `IpAddr` (or one of its
//! variants) or as text. Both forms are normalized into a [`ClientAddress`],
//! the fixed-width representation that is written into the ticket payload and
//! compared at validation time.

use crate::TicketError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Canonical fixed-width client address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientAddress {
    V4([u8; 4]),
    V6([u8; 16]),
}

impl ClientAddress {
    /// Normalize a parsed address.
    ///
    /// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) become their IPv4 form so
    /// that a dual-stack listener and an IPv4 listener agree on the binding.
    pub fn from_ip(ip: IpAddr) -> Self {
        match ip.to_canonical() {
            IpAddr::V4(v4) => ClientAddress::V4(v4.octets()),
            IpAddr::V6(v6) => ClientAddress::V6(v6.octets()),
        }
    }

    /// The address as a standard library value
    pub fn to_ip(&self) -> IpAddr {
        match *self {
            ClientAddress::V4(octets) => IpAddr::V4(Ipv4Addr::from(octets)),
            ClientAddress::V6(octets) => IpAddr::V6(Ipv6Addr::from(octets)),
        }
    }

    /// Raw address bytes (4 or 16 of them)
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ClientAddress::V4(octets) => &octets[..],
            ClientAddress::V6(octets) => &octets[..],
        }
    }
}

impl fmt::Display for ClientAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ip())
    }
}

impl From<IpAddr> for ClientAddress {
    fn from(ip: IpAddr) -> Self {
        Self::from_ip(ip)
    }
}

impl From<ClientAddress> for IpAddr {
    fn from(addr: ClientAddress) -> Self {
        addr.to_ip()
    }
}

/// A client address as supplied by a caller, structured or textual.
///
/// Normalization is deferred to [`ClientIp::normalize`] so that builders can
/// accept either form without failing early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientIp {
    Addr(IpAddr),
    Text(String),
}

impl ClientIp {
    /// Resolve into the canonical address, parsing textual input.
    pub fn normalize(&self) -> Result<ClientAddress, TicketError> {
        match self {
            ClientIp::Addr(ip) => Ok(ClientAddress::from_ip(*ip)),
            ClientIp::Text(text) => text
                .trim()
                .parse::<IpAddr>()
                .map(ClientAddress::from_ip)
                .map_err(|e| TicketError::InvalidClientAddress {
                    input: text.clone(),
                    reason: e.to_string(),
                }),
        }
    }
}

impl From<IpAddr> for ClientIp {
    fn from(ip: IpAddr) -> Self {
        ClientIp::Addr(ip)
    }
}

impl From<Ipv4Addr> for ClientIp {
    fn from(ip: Ipv4Addr) -> Self {
        ClientIp::Addr(IpAddr::V4(ip))
    }
}

impl From<Ipv6Addr> for ClientIp {
    fn from(ip: Ipv6Addr) -> Self {
        ClientIp::Addr(IpAddr::V6(ip))
    }
}

impl From<ClientAddress> for ClientIp {
    fn from(addr: ClientAddress) -> Self {
        ClientIp::Addr(addr.to_ip())
    }
}

impl From<&str> for ClientIp {
    fn from(text: &str) -> Self {
        ClientIp::Text(text.to_string())
    }
}

impl From<String> for ClientIp {
    fn from(text: String) -> Self {
        ClientIp::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_structured_agree() {
        let structured = ClientIp::from(Ipv4Addr::new(127, 0, 0, 1))
            .normalize()
            .expect("structured address should normalize");
        let textual = ClientIp::from("127.0.0.1")
            .normalize()
            .expect("textual address should normalize");

        assert_eq!(structured, textual);
        assert_eq!(structured, ClientAddress::V4([127, 0, 0, 1]));
        assert_eq!(structured.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_ipv6_forms_agree() {
        let structured = ClientIp::from(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1))
            .normalize()
            .unwrap();
        let textual = ClientIp::from("2001:0db8:0000::0001".to_string())
            .normalize()
            .unwrap();

        assert_eq!(structured, textual);
        assert_eq!(structured.as_bytes().len(), 16);
    }

    #[test]
    fn test_ipv4_mapped_ipv6_is_canonicalized() {
        let mapped = ClientIp::from("::ffff:10.1.2.3").normalize().unwrap();
        assert_eq!(mapped, ClientAddress::V4([10, 1, 2, 3]));
    }

    #[test]
    fn test_invalid_text_is_rejected() {
        let err = ClientIp::from("not-an-address")
            .normalize()
            .expect_err("garbage should not parse");
        assert!(matches!(
            err,
            TicketError::InvalidClientAddress { ref input, .. } if input == "not-an-address"
        ));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let addr = ClientIp::from(" 192.168.0.1 ").normalize().unwrap();
        assert_eq!(addr, ClientAddress::V4([192, 168, 0, 1]));
    }
}
