use std::fmt;

use crate::error::Result;
use crate::headers::SipHeaderParse;
use crate::message::Endpoint;
use crate::parser::Parser;

macro_rules! endpoint_header {
    ($(#[$doc:meta])* $type:ident, $name:literal) => {
        $(#[$doc])*
        #[derive(Debug, PartialEq, Eq, Clone, Copy)]
        #[repr(transparent)]
        pub struct $type(Endpoint);

        impl $type {
            /// Creates the header from an endpoint.
            pub fn new(endpoint: Endpoint) -> Self {
                Self(endpoint)
            }

            /// Returns the carried endpoint.
            pub fn endpoint(&self) -> &Endpoint {
                &self.0
            }
        }

        impl SipHeaderParse for $type {
            const NAME: &'static str = $name;

            fn parse(parser: &mut Parser<'_>) -> Result<Self> {
                let value = parser.parse_header_value_as_str()?;

                Ok(Self(value.trim().parse()?))
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}: {}", $type::NAME, self.0)
            }
        }
    };
}

endpoint_header!(
    /// The `Proxy-Received-On` SIP header.
    ///
    /// Tells the downstream agent which local socket the upstream proxy
    /// received the call on, so replies can follow the same path.
    ProxyReceivedOn,
    "Proxy-Received-On"
);

endpoint_header!(
    /// The `Proxy-Received-From` SIP header.
    ///
    /// Tells the downstream agent the actual source of the message; used
    /// to rewrite a private-IP Contact.
    ProxyReceivedFrom,
    "Proxy-Received-From"
);

endpoint_header!(
    /// The `Proxy-Send-From` SIP header.
    ///
    /// Asks the upstream proxy to send from a specific local socket.
    ProxySendFrom,
    "Proxy-Send-From"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let header = ProxyReceivedFrom::from_bytes(b"udp:203.0.113.7:5060\r\n").unwrap();

        assert_eq!(header.endpoint().port(), 5060);
        assert_eq!(header.to_string(), "Proxy-Received-From: udp:203.0.113.7:5060");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ProxyReceivedOn::from_bytes(b"not-an-endpoint\r\n").is_err());
    }
}
