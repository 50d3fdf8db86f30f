use std::fmt;

const TP_UDP: &str = "UDP";
const TP_TCP: &str = "TCP";
const TP_TLS: &str = "TLS";
const TP_WS: &str = "WS";
const TP_WSS: &str = "WSS";
const TP_UNKNOWN: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// An SIP Transport Protocol.
pub enum TransportProtocol {
    #[default]
    /// `UDP` transport.
    Udp,
    /// `TCP` transport.
    Tcp,
    /// `TLS` transport.
    Tls,
    /// `WebSocket` transport.
    Ws,
    /// Secure `WebSocket` transport.
    Wss,
    /// UNKNOWN transport.
    Unknown,
}

impl TransportProtocol {
    /// Returns the default port number associated with the transport
    /// protocol.
    ///
    /// - `UDP` and `TCP` use port `5060` by default.
    /// - `TLS` uses port `5061`.
    /// - `WS` uses port `80`.
    /// - `WSS` uses port `443`.
    /// - `Unknown` returns `0` to indicate no default.
    #[inline]
    pub const fn default_port(&self) -> u16 {
        match self {
            TransportProtocol::Udp | TransportProtocol::Tcp => 5060,
            TransportProtocol::Tls => 5061,
            TransportProtocol::Ws => 80,
            TransportProtocol::Wss => 443,
            TransportProtocol::Unknown => 0,
        }
    }

    /// Returns `true` if the transport is encrypted.
    pub const fn is_secure(&self) -> bool {
        matches!(self, TransportProtocol::Tls | TransportProtocol::Wss)
    }

    /// Returns `true` if the transport is connection oriented.
    pub const fn is_reliable(&self) -> bool {
        matches!(
            self,
            TransportProtocol::Tcp | TransportProtocol::Tls | TransportProtocol::Ws | TransportProtocol::Wss
        )
    }

    /// Returns the transport string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportProtocol::Udp => TP_UDP,
            TransportProtocol::Tcp => TP_TCP,
            TransportProtocol::Tls => TP_TLS,
            TransportProtocol::Ws => TP_WS,
            TransportProtocol::Wss => TP_WSS,
            TransportProtocol::Unknown => TP_UNKNOWN,
        }
    }

    /// Returns the lowercase transport representation used in URI
    /// parameters and endpoint strings.
    pub fn as_lower_str(&self) -> &'static str {
        match self {
            TransportProtocol::Udp => "udp",
            TransportProtocol::Tcp => "tcp",
            TransportProtocol::Tls => "tls",
            TransportProtocol::Ws => "ws",
            TransportProtocol::Wss => "wss",
            TransportProtocol::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TransportProtocol {
    fn from(s: &str) -> Self {
        s.as_bytes().into()
    }
}

impl From<&[u8]> for TransportProtocol {
    fn from(b: &[u8]) -> Self {
        if b.eq_ignore_ascii_case(b"UDP") {
            TransportProtocol::Udp
        } else if b.eq_ignore_ascii_case(b"TCP") {
            TransportProtocol::Tcp
        } else if b.eq_ignore_ascii_case(b"TLS") {
            TransportProtocol::Tls
        } else if b.eq_ignore_ascii_case(b"WSS") {
            TransportProtocol::Wss
        } else if b.eq_ignore_ascii_case(b"WS") {
            TransportProtocol::Ws
        } else {
            TransportProtocol::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        assert_eq!(TransportProtocol::Udp.default_port(), 5060);
        assert_eq!(TransportProtocol::Tcp.default_port(), 5060);
        assert_eq!(TransportProtocol::Tls.default_port(), 5061);
        assert_eq!(TransportProtocol::Ws.default_port(), 80);
        assert_eq!(TransportProtocol::Wss.default_port(), 443);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(TransportProtocol::from("tcp"), TransportProtocol::Tcp);
        assert_eq!(TransportProtocol::from("TCP"), TransportProtocol::Tcp);
        assert_eq!(TransportProtocol::from("Wss"), TransportProtocol::Wss);
        assert_eq!(TransportProtocol::from("bogus"), TransportProtocol::Unknown);
    }
}
