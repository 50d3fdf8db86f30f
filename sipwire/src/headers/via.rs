use sipwire_util::util::is_valid_port;
use sipwire_util::ArcStr;

use crate::error::{Field, Result};
use crate::headers::SipHeaderParse;
use crate::macros::{parse_error, parse_param};
use crate::message::{Host, HostPort, Parameters, TransportProtocol};
use crate::parser::{self, Parser, SIPV2};

use core::fmt;
use std::net::IpAddr;
use std::str::{self};

const MADDR_PARAM: &str = "maddr";
const BRANCH_PARAM: &str = "branch";
const TTL_PARAM: &str = "ttl";
const RPORT_PARAM: &str = "rport";
const RECEIVED_PARAM: &str = "received";

/// The magic cookie every RFC 3261 transaction branch starts with.
pub const MAGIC_COOKIE: &str = "z9hG4bK";

/// The `Via` SIP header.
///
/// Indicates the path taken by the request so far and the path that
/// should be followed in routing responses.
///
/// # Examples
/// ```
/// # use sipwire::headers::Via;
///
/// let via = Via::new_udp(
///     "server10.biloxi.com".parse().unwrap(),
///     Some("z9hG4bKnashds8"),
/// );
///
/// assert_eq!(
///     "Via: SIP/2.0/UDP server10.biloxi.com;branch=z9hG4bKnashds8",
///     via.to_string()
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct Via {
    transport: TransportProtocol,
    sent_by: HostPort,
    ttl: Option<u8>,
    maddr: Option<Host>,
    received: Option<IpAddr>,
    branch: Option<ArcStr>,
    rport: Option<u16>,
    comment: Option<ArcStr>,
    params: Option<Parameters>,
}

impl Via {
    /// Creates a new `Via` header.
    ///
    /// # Arguments
    /// * `transport` - The transport the request was sent over.
    /// * `sent_by` - The host and optional port responses are sent to.
    /// * `branch` - Optional branch parameter identifying the transaction.
    pub fn new(transport: TransportProtocol, sent_by: HostPort, branch: Option<&str>) -> Self {
        Self {
            transport,
            sent_by,
            branch: branch.map(|b| b.into()),
            ..Default::default()
        }
    }

    /// Creates a new `Via` header with UDP transport and optional branch.
    pub fn new_udp(sent_by: HostPort, branch: Option<&str>) -> Self {
        Self::new(TransportProtocol::Udp, sent_by, branch)
    }

    /// Set the `received` parameter.
    pub fn set_received(&mut self, received: IpAddr) {
        self.received = Some(received);
    }

    /// Returns the `received` parameter.
    pub fn received(&self) -> Option<IpAddr> {
        self.received
    }

    /// Returns the `transport`.
    pub fn transport(&self) -> TransportProtocol {
        self.transport
    }

    /// Returns the `rport`.
    pub fn rport(&self) -> Option<u16> {
        self.rport
    }

    /// Set the `rport` parameter.
    pub fn set_rport(&mut self, rport: u16) {
        self.rport = Some(rport);
    }

    /// Set the sent-by field.
    pub fn set_sent_by(&mut self, sent_by: HostPort) {
        self.sent_by = sent_by;
    }

    /// Returns the branch parameter.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Set the branch parameter.
    pub fn set_branch(&mut self, branch: &str) {
        self.branch = Some(branch.into());
    }

    /// Returns the sent-by field.
    pub fn sent_by(&self) -> &HostPort {
        &self.sent_by
    }

    /// Returns the `maddr` parameter.
    pub fn maddr(&self) -> &Option<Host> {
        &self.maddr
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}/{} {}", Via::NAME, SIPV2, self.transport, self.sent_by)?;

        if let Some(rport) = self.rport {
            write!(f, ";rport={}", rport)?;
        }
        if let Some(received) = &self.received {
            write!(f, ";received={received}")?;
        }
        if let Some(ttl) = &self.ttl {
            write!(f, ";ttl={ttl}")?;
        }
        if let Some(maddr) = &self.maddr {
            write!(f, ";maddr={maddr}")?;
        }
        if let Some(branch) = &self.branch {
            write!(f, ";branch={branch}")?;
        }
        if let Some(params) = &self.params {
            write!(f, "{params}")?;
        }
        if let Some(comment) = &self.comment {
            write!(f, " ({comment})")?;
        }

        Ok(())
    }
}

impl SipHeaderParse for Via {
    const NAME: &'static str = "Via";
    const SHORT_NAME: &'static str = "v";
    /*
     * Via               =  ( "Via" / "v" ) HCOLON via-parm *(COMMA via-parm)
     * via-parm          =  sent-protocol LWS sent-by *( SEMI via-params )
     * via-params        =  via-ttl / via-maddr
     *                      / via-received / via-branch
     *                      / via-extension
     * via-ttl           =  "ttl" EQUAL ttl
     * via-maddr         =  "maddr" EQUAL host
     * via-received      =  "received" EQUAL (IPv4address / IPv6address)
     * via-branch        =  "branch" EQUAL token
     * via-extension     =  generic-param
     * sent-protocol     =  protocol-name SLASH protocol-version
     *                      SLASH transport
     * protocol-name     =  "SIP" / token
     * protocol-version  =  token
     * transport         =  "UDP" / "TCP" / "TLS" / "SCTP"
     *                      / other-transport
     * sent-by           =  host [ COLON port ]
     * ttl               =  1*3DIGIT ; 0 to 255
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.parse_sip_v2()?;
        parser.must_read(b'/')?;

        let b = parser.read_transport();
        let transport = b.into();

        parser.take_ws();

        let sent_by = parser.parse_host_port()?;
        let mut branch: Option<ArcStr> = None;
        let mut ttl: Option<ArcStr> = None;
        let mut maddr: Option<ArcStr> = None;
        let mut received: Option<ArcStr> = None;
        let mut rport_p: Option<ArcStr> = None;
        let params = parse_param!(
            parser,
            parser::parse_via_param,
            BRANCH_PARAM = branch,
            TTL_PARAM = ttl,
            MADDR_PARAM = maddr,
            RECEIVED_PARAM = received,
            RPORT_PARAM = rport_p
        );

        let received = received.and_then(|r| r.trim_start_matches('[').trim_end_matches(']').parse().ok());
        let ttl = ttl.and_then(|t| t.parse().ok());
        let maddr = maddr.map(|a| match a.parse::<IpAddr>() {
            Ok(addr) => Host::IpAddr(addr),
            Err(_) => Host::DomainName(a.as_str().into()),
        });

        let rport = if let Some(rport) = rport_p.filter(|rport| !rport.is_empty()) {
            match rport.parse() {
                Ok(port) if is_valid_port(port) => Some(port),
                _ => return parse_error!(Field::Via, "Via param rport is invalid!", parser),
            }
        } else {
            None
        };

        let comment = if parser.peek() == Some(&b'(') {
            parser.advance();
            let comment = parser.read_until_byte(b')');
            parser.advance();
            Some(str::from_utf8(comment)?.into())
        } else {
            None
        };

        Ok(Via {
            transport,
            sent_by,
            params,
            comment,
            ttl,
            maddr,
            received,
            branch,
            rport,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use crate::message::Host;

    use super::*;

    #[test]
    fn test_parse() {
        let src = b"SIP/2.0/UDP bobspc.biloxi.com:5060;received=192.0.2.4\r\n";
        let mut parser = Parser::new(src);
        let via = Via::parse(&mut parser);
        let via = via.unwrap();

        assert_eq!(via.transport, TransportProtocol::Udp);
        assert_eq!(
            via.sent_by,
            HostPort {
                host: Host::DomainName("bobspc.biloxi.com".into()),
                port: Some(5060)
            }
        );

        assert_eq!(via.received, Some("192.0.2.4".parse().unwrap()));

        let src = b"SIP/2.0/UDP 192.0.2.1:5060 ;received=192.0.2.207 \
        ;branch=z9hG4bK77asjd\r\n";
        let mut parser = Parser::new(src);
        let via = Via::parse(&mut parser);
        let via = via.unwrap();

        assert_eq!(via.transport, TransportProtocol::Udp);
        assert_eq!(
            via.sent_by,
            HostPort {
                host: Host::IpAddr(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))),
                port: Some(5060)
            }
        );

        assert_eq!(via.received, Some("192.0.2.207".parse().unwrap()));
        assert_eq!(via.branch(), Some("z9hG4bK77asjd"));
    }

    #[test]
    fn test_display_round_trips() {
        let src = "SIP/2.0/TCP client.atlanta.example.com:5060;branch=z9hG4bK74bf9";
        let via = Via::from_bytes(src.as_bytes()).unwrap();

        assert_eq!(via.to_string(), format!("Via: {src}"));
    }

    #[test]
    fn test_parse_rport() {
        let src = b"SIP/2.0/UDP 10.0.0.1:5060;rport=40124;branch=z9hG4bKa\r\n";
        let via = Via::from_bytes(src).unwrap();

        assert_eq!(via.rport(), Some(40124));
    }
}
