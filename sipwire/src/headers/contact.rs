use crate::error::Result;
use crate::headers::{SipHeaderParse, EXPIRES_PARAM, Q_PARAM};
use crate::macros::parse_header_param;
use crate::message::{Parameters, SipAddr, Uri};
use crate::parser::Parser;
use crate::Q;

use core::fmt;

/// The `Contact` SIP header.
///
/// Specifies the `URI` for the user or `UA` sending the message.
///
/// # Examples
///
/// ```
/// # use sipwire::headers::Contact;
/// # use sipwire::message::{NameAddr, SipAddr};
/// let addr = SipAddr::NameAddr(NameAddr::new(
///     "sip:alice@client.atlanta.example.com".parse().unwrap(),
/// ));
///
/// let c = Contact::new(addr);
///
/// assert_eq!(
///     "Contact: <sip:alice@client.atlanta.example.com>",
///     c.to_string()
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Contact {
    /// The address of the contact.
    pub addr: SipAddr,
    /// The quality value of the contact.
    pub q: Option<Q>,
    /// The expires parameter of the contact.
    pub expires: Option<u32>,
    /// Additional parameters.
    pub params: Option<Parameters>,
}

impl Contact {
    /// Creates a new `Contact` from an address.
    pub fn new(addr: SipAddr) -> Self {
        Self {
            addr,
            q: None,
            expires: None,
            params: None,
        }
    }

    /// Returns the contact URI.
    pub fn uri(&self) -> &Uri {
        self.addr.uri()
    }

    /// Returns `true` when this is the `*` contact used by REGISTER to
    /// remove all bindings.
    pub fn is_wildcard(&self) -> bool {
        self.addr.uri().is_wildcard()
    }
}

impl SipHeaderParse for Contact {
    const NAME: &'static str = "Contact";
    const SHORT_NAME: &'static str = "m";
    /*
     * Contact        =  ("Contact" / "m" ) HCOLON
     *                   ( STAR / (contact-param *(COMMA contact-param)))
     * contact-param  =  (name-addr / addr-spec) *(SEMI contact-params)
     * name-addr      =  [ display-name ] LAQUOT addr-spec RAQUOT
     * addr-spec      =  SIP-URI / SIPS-URI / absoluteURI
     * display-name   =  *(token LWS)/ quoted-string
     *
     * contact-params     =  c-p-q / c-p-expires
     *                       / contact-extension
     * c-p-q              =  "q" EQUAL qvalue
     * c-p-expires        =  "expires" EQUAL delta-seconds
     * contact-extension  =  generic-param
     * delta-seconds      =  1*DIGIT
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.take_ws();
        if parser.peek() == Some(&b'*') {
            parser.advance();
            return Ok(Contact::new(SipAddr::Uri(Uri::wildcard())));
        }

        let addr = parser.parse_sip_addr(false)?;
        let mut q = None;
        let mut expires = None;
        let params = parse_header_param!(parser, Q_PARAM = q, EXPIRES_PARAM = expires);

        let q = q.map(|q| q.parse()).transpose()?;
        let expires = expires.and_then(|expires| expires.parse().ok());

        Ok(Contact { addr, q, expires, params })
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", Contact::NAME, self.addr)?;

        if let Some(q) = self.q {
            write!(f, "{}", q)?;
        }
        if let Some(expires) = self.expires {
            write!(f, ";expires={}", expires)?;
        }
        if let Some(params) = &self.params {
            write!(f, "{}", params)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use crate::message::{Host, HostPort, Scheme};

    use super::*;

    #[test]
    fn test_parse() {
        let src = b"\"Mr. Watson\" <sip:watson@worcester.bell-telephone.com> \
        ;q=0.7; expires=3600\r\n";
        let mut parser = Parser::new(src);
        let contact = Contact::parse(&mut parser);
        let contact = contact.unwrap();

        assert_matches!(contact, Contact {
            addr: SipAddr::NameAddr(addr),
            q,
            expires,
            ..
        } => {
            assert_eq!(addr.display(), Some("Mr. Watson"));
            assert_eq!(addr.uri.user.as_ref().unwrap().user(), "watson");
            assert_eq!(
                addr.uri.host_port,
                HostPort {
                    host: Host::DomainName("worcester.bell-telephone.com".into()),
                    port: None
                },
            );
            assert_eq!(addr.uri.scheme, Scheme::Sip);
            assert_eq!(q, Some(Q(0, 7)));
            assert_eq!(expires, Some(3600));
        });

        let src = b"sip:caller@u1.example.com\r\n";
        let mut parser = Parser::new(src);
        let contact = Contact::parse(&mut parser);
        let contact = contact.unwrap();

        assert_matches!(contact, Contact {
            addr: SipAddr::Uri(uri),
            ..
        } => {
            assert_eq!(uri.user.as_ref().unwrap().user(), "caller");
            assert_eq!(
                uri.host_port,
                HostPort {
                    host: Host::DomainName("u1.example.com".into()),
                    port: None
                }
            );
            assert_eq!(uri.scheme, Scheme::Sip);
        });
    }

    #[test]
    fn test_parse_wildcard() {
        let contact = Contact::from_bytes(b"*\r\n").unwrap();
        assert!(contact.is_wildcard());
        assert_eq!(contact.to_string(), "Contact: *");
    }

    #[test]
    fn test_parse_ipv6_host() {
        let src = b"sips:[2620:0:2ef0:7070:250:60ff:fe03:32b7]";
        let mut parser = Parser::new(src);
        let contact = Contact::parse(&mut parser);
        let contact = contact.unwrap();

        assert_matches!(contact, Contact {
            addr: SipAddr::Uri(uri),
            ..
        } => {
            let addr: IpAddr = "2620:0:2ef0:7070:250:60ff:fe03:32b7".parse().unwrap();
            assert_eq!(
                uri.host_port,
                HostPort {
                    host: Host::IpAddr(addr),
                    port: None
                }
            );
            assert_eq!(uri.scheme, Scheme::Sips);
        });
    }

    #[test]
    fn test_parse_host_port() {
        let src = b"sip:192.168.1.1:5060";
        let mut parser = Parser::new(src);
        let contact = Contact::parse(&mut parser);
        let contact = contact.unwrap();

        assert_matches!(contact, Contact {
            addr: SipAddr::Uri(uri),
            ..
        } => {
            let addr = Ipv4Addr::new(192, 168, 1, 1);
            assert_eq!(
                uri.host_port,
                HostPort {
                    host: Host::IpAddr(IpAddr::V4(addr)),
                    port: Some(5060)
                }
            );
            assert_eq!(uri.scheme, Scheme::Sip);
        });
    }
}
