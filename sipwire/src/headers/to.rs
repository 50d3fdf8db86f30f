use sipwire_util::ArcStr;

use crate::error::Result;
use crate::headers::{SipHeaderParse, TAG_PARAM};
use crate::macros::parse_header_param;
use crate::message::{Parameters, SipAddr, Uri};
use crate::parser::Parser;

use std::fmt;

/// The `To` SIP header.
///
/// Specifies the logical recipient of the request.
///
/// # Examples
/// ```
/// # use sipwire::headers::To;
/// # use sipwire::message::{NameAddr, SipAddr};
/// let addr = SipAddr::NameAddr(NameAddr::new(
///     "sip:bob@biloxi.example.com".parse().unwrap(),
/// ));
/// let t = To::new(addr);
///
/// assert_eq!(
///     "To: <sip:bob@biloxi.example.com>",
///     t.to_string()
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct To {
    addr: SipAddr,
    tag: Option<ArcStr>,
    params: Option<Parameters>,
}

impl To {
    /// Create a new `To` instance.
    pub fn new(addr: SipAddr) -> Self {
        Self {
            addr,
            tag: None,
            params: None,
        }
    }

    /// Create a new `To` instance carrying a tag.
    pub fn with_tag(addr: SipAddr, tag: &str) -> Self {
        Self {
            addr,
            tag: Some(tag.into()),
            params: None,
        }
    }

    /// Get the address of the `To` header.
    pub fn addr(&self) -> &SipAddr {
        &self.addr
    }

    /// Get the URI of the `To` header.
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

impl SipHeaderParse for To {
    const NAME: &'static str = "To";
    const SHORT_NAME: &'static str = "t";
    /*
     * To        =  ( "To" / "t" ) HCOLON ( name-addr
     *              / addr-spec ) *( SEMI to-param )
     * to-param  =  tag-param / generic-param
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let addr = parser.parse_sip_addr(false)?;
        let mut tag = None;
        let params = parse_header_param!(parser, TAG_PARAM = tag);

        Ok(To { tag, addr, params })
    }
}

impl fmt::Display for To {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", To::NAME, self.addr)?;
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
        let src = b"Bob <sip:bob@biloxi.com>;tag=a6c85cf\r\n";
        let mut parser = Parser::new(src);
        let to = To::parse(&mut parser);
        let to = to.unwrap();

        match to {
            To {
                addr: SipAddr::NameAddr(addr),
                tag,
                ..
            } => {
                assert_eq!(addr.uri.scheme, Scheme::Sip);
                assert_eq!(addr.display(), Some("Bob"));
                assert_eq!(addr.uri.user.as_ref().unwrap().user(), "bob");
                assert_eq!(
                    addr.uri.host_port,
                    HostPort {
                        host: Host::DomainName("biloxi.com".into()),
                        port: None,
                    }
                );
                assert_eq!(tag.as_deref(), Some("a6c85cf"));
            }
            _ => unreachable!(),
        }
    }
}
