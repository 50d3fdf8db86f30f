use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use super::{Host, TransportProtocol, Uri};
use crate::error::{Error, Field, Result, ValidationError};

/// A literal transport address: `(protocol, ip, port)`.
///
/// `Endpoint` is an immutable value; its text form is
/// `proto:ip:port`, e.g. `udp:192.0.2.1:5060` or `tls:[2001:db8::1]:5061`.
///
/// # Examples
///
/// ```
/// use sipwire::message::Endpoint;
///
/// let endpoint: Endpoint = "udp:192.0.2.1:5060".parse().unwrap();
///
/// assert_eq!(endpoint.port(), 5060);
/// assert_eq!(endpoint.to_string(), "udp:192.0.2.1:5060");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    protocol: TransportProtocol,
    addr: SocketAddr,
}

impl Endpoint {
    /// Creates an `Endpoint`. A zero port is replaced by the protocol
    /// default.
    pub fn new(protocol: TransportProtocol, mut addr: SocketAddr) -> Self {
        if addr.port() == 0 {
            addr.set_port(protocol.default_port());
        }
        Self { protocol, addr }
    }

    /// Creates an `Endpoint` from its parts.
    pub fn from_parts(protocol: TransportProtocol, ip: IpAddr, port: u16) -> Self {
        Self::new(protocol, SocketAddr::new(ip, port))
    }

    /// Creates an `Endpoint` from a uri whose host is a literal IP
    /// address.
    ///
    /// # Errors
    ///
    /// Fails when the uri host is a domain name.
    pub fn from_uri(uri: &Uri) -> Result<Self> {
        let Host::IpAddr(ip) = uri.host_port.host else {
            return Err(ValidationError::new(
                Field::Uri,
                format!("'{}' is not a literal IP endpoint", uri.host_port.host),
            )
            .into());
        };
        let protocol = uri.protocol();
        let port = uri.host_port.port.unwrap_or_else(|| protocol.default_port());

        Ok(Self {
            protocol,
            addr: SocketAddr::new(ip, port),
        })
    }

    /// Returns the transport protocol.
    pub fn protocol(&self) -> TransportProtocol {
        self.protocol
    }

    /// Returns the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the IP address.
    pub fn ip(&self) -> IpAddr {
        self.addr.ip()
    }

    /// Returns the port.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Returns `true` when the address is a loopback address.
    pub fn is_loopback(&self) -> bool {
        self.addr.ip().is_loopback()
    }

    /// Returns a copy of this endpoint re-pointed at the protocol default
    /// port.
    pub fn with_default_port(&self) -> Endpoint {
        let mut addr = self.addr;
        addr.set_port(self.protocol.default_port());
        Endpoint {
            protocol: self.protocol,
            addr,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.protocol.as_lower_str(), self.addr)
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ValidationError::new(Field::Message, format!("invalid endpoint '{s}'"));

        let (proto, rest) = s.split_once(':').ok_or_else(invalid)?;
        let protocol = TransportProtocol::from(proto);
        if protocol == TransportProtocol::Unknown {
            return Err(invalid().into());
        }
        let addr: SocketAddr = rest.parse().map_err(|_| invalid())?;

        Ok(Endpoint::new(protocol, addr))
    }
}
