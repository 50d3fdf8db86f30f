use std::fmt;

use crate::error::Result;
use crate::headers::{RecordRoute, SipHeaderParse};
use crate::macros::parse_header_param;
use crate::message::{NameAddr, Parameters, Uri};
use crate::parser::Parser;

/// The `Route` SIP header.
///
/// Specify the sequence of proxy servers and other intermediaries that a
/// SIP message should pass through on its way to the final destination.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Route {
    pub(crate) addr: NameAddr,
    pub(crate) params: Option<Parameters>,
}

impl Route {
    /// Creates a new `Route` from a name-addr.
    pub fn new(addr: NameAddr) -> Self {
        Self { addr, params: None }
    }

    /// Returns the route URI.
    pub fn uri(&self) -> &Uri {
        &self.addr.uri
    }
}

impl From<RecordRoute> for Route {
    fn from(rr: RecordRoute) -> Self {
        Self {
            addr: rr.addr,
            params: rr.params,
        }
    }
}

impl SipHeaderParse for Route {
    const NAME: &'static str = "Route";
    /*
     * Route        =  "Route" HCOLON route-param *(COMMA route-param)
     * route-param  =  name-addr *( SEMI rr-param )
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let addr = parser.parse_name_addr()?;
        let params = parse_header_param!(parser);
        Ok(Route { addr, params })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", Route::NAME, self.addr)?;

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
        let src = b"<sip:bigbox3.site3.atlanta.com;lr>\r\n";
        let mut parser = Parser::new(src);
        let r = Route::parse(&mut parser);
        let r = r.unwrap();

        assert_eq!(r.addr.display, None);
        assert_eq!(r.addr.uri.scheme, Scheme::Sip);
        assert_eq!(
            r.addr.uri.host_port,
            HostPort {
                host: Host::DomainName("bigbox3.site3.atlanta.com".into()),
                port: None
            }
        );
        assert!(r.addr.uri.lr_param);

        let src = b"<sip:server10.biloxi.com;lr>;foo=bar\r\n";
        let mut parser = Parser::new(src);
        let r = Route::parse(&mut parser);
        let r = r.unwrap();

        assert_eq!(r.addr.display, None);
        assert_eq!(r.addr.uri.scheme, Scheme::Sip);
        assert_eq!(
            r.addr.uri.host_port,
            HostPort {
                host: Host::DomainName("server10.biloxi.com".into()),
                port: None
            }
        );
        assert_eq!(r.params.unwrap().get("foo").unwrap(), "bar");
    }
}
