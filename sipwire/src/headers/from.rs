use sipwire_util::ArcStr;

use crate::error::Result;
use crate::headers::{SipHeaderParse, TAG_PARAM};
use crate::macros::parse_header_param;
use crate::message::{Parameters, SipAddr, Uri};
use crate::parser::Parser;

use core::fmt;

/// The `From` SIP header.
///
/// Indicates the initiator of the request.
///
/// # Examples
/// ```
/// # use sipwire::headers::From;
/// # use sipwire::message::{NameAddr, SipAddr};
/// let addr = SipAddr::NameAddr(NameAddr::new(
///     "sip:alice@client.atlanta.example.com".parse().unwrap(),
/// ));
///
/// let f = From::new(addr);
///
/// assert_eq!(
///     "From: <sip:alice@client.atlanta.example.com>",
///     f.to_string()
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct From {
    addr: SipAddr,
    tag: Option<ArcStr>,
    params: Option<Parameters>,
}

impl From {
    /// Create a new `From` instance.
    pub fn new(addr: SipAddr) -> Self {
        Self {
            addr,
            tag: None,
            params: None,
        }
    }

    /// Create a new `From` instance carrying a tag.
    pub fn with_tag(addr: SipAddr, tag: &str) -> Self {
        Self {
            addr,
            tag: Some(tag.into()),
            params: None,
        }
    }

    /// Get the address of the `From` header.
    pub fn addr(&self) -> &SipAddr {
        &self.addr
    }

    /// Get the URI of the `From` header.
    pub fn uri(&self) -> &Uri {
        self.addr.uri()
    }

    /// Returns the tag parameter.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Set the tag parameter.
    pub fn set_tag(&mut self, tag: Option<&str>) {
        self.tag = tag.map(|t| t.into());
    }
}

impl SipHeaderParse for From {
    const NAME: &'static str = "From";
    const SHORT_NAME: &'static str = "f";
    /*
     * From        =  ( "From" / "f" ) HCOLON from-spec
     * from-spec   =  ( name-addr / addr-spec )
     *                *( SEMI from-param )
     * from-param  =  tag-param / generic-param
     * tag-param   =  "tag" EQUAL token
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let addr = parser.parse_sip_addr(false)?;
        let mut tag = None;
        let params = parse_header_param!(parser, TAG_PARAM = tag);

        Ok(From { tag, addr, params })
    }
}

impl fmt::Display for From {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", From::NAME, self.addr)?;
        if let Some(tag) = &self.tag {
            write!(f, ";tag={}", tag)?;
        }
        if let Some(params) = &self.params {
            write!(f, "{}", params)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::message::{Host, HostPort, Scheme};

    use super::*;

    #[test]
    fn test_parse() {
        let src = b"\"A. G. Bell\" <sip:agb@bell-telephone.com> ;tag=a48s\r\n";
        let mut parser = Parser::new(src);
        let from = From::parse(&mut parser).unwrap();

        assert_matches!(from, From {
            addr: SipAddr::NameAddr(addr),
            tag,
            ..
        } => {
            assert_eq!(addr.display(), Some("A. G. Bell"));
            assert_eq!(addr.uri.user.as_ref().unwrap().user(), "agb");
            assert_eq!(
                addr.uri.host_port,
                HostPort {
                    host: Host::DomainName("bell-telephone.com".into()),
                    port: None
                }
            );
            assert_eq!(addr.uri.scheme, Scheme::Sip);
            assert_eq!(tag.as_deref(), Some("a48s"));
        });

        let src = b"sip:+12125551212@server.phone2net.com;tag=887s\r\n";
        let mut parser = Parser::new(src);
        let from = From::parse(&mut parser).unwrap();

        assert_matches!(from, From {
            addr: SipAddr::Uri(uri),
            tag,
            ..
        } => {
            assert_eq!(uri.user.as_ref().unwrap().user(), "+12125551212");
            assert_eq!(
                uri.host_port,
                HostPort {
                    host: Host::DomainName("server.phone2net.com".into()),
                    port: None
                }
            );
            assert_eq!(uri.scheme, Scheme::Sip);
            assert_eq!(tag.as_deref(), Some("887s"));
        });
    }

    #[test]
    fn test_addr_spec_semicolon_tail_is_a_header_param() {
        // Without angle brackets the ';'-tail belongs to the header, not
        // the URI.
        let src = b"sip:alice@wonderland.com;foo=bar\r\n";
        let from = From::from_bytes(src).unwrap();

        assert!(from.uri().parameters.is_none());
        assert_eq!(from.params.as_ref().unwrap().get("foo").unwrap(), "bar");
    }
}
