use std::fmt;

use itertools::Itertools;
use sipwire_util::ArcStr;

use crate::error::Result;
use crate::headers::SipHeaderParse;
use crate::macros::hdr_list;
use crate::parser::Parser;

/// The `Proxy-Require` SIP header.
///
/// Indicate `proxy-sensitive` features that must be supported by the
/// proxy.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ProxyRequire(Vec<ArcStr>);

impl ProxyRequire {
    /// Creates a `Proxy-Require` header from option tags.
    pub fn new(tags: &[&str]) -> Self {
        Self(tags.iter().map(|&tag| tag.into()).collect())
    }

    /// Returns the option tags in order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|tag| tag.as_str())
    }
}

impl SipHeaderParse for ProxyRequire {
    const NAME: &'static str = "Proxy-Require";
    /*
     * Proxy-Require  =  "Proxy-Require" HCOLON option-tag
     *                   *(COMMA option-tag)
     * option-tag     =  token
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let tags = hdr_list!(parser => parser.parse_token()?.into());

        Ok(ProxyRequire(tags))
    }
}

impl fmt::Display for ProxyRequire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", ProxyRequire::NAME, self.0.iter().format(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let src = b"foo, bar\r\n";
        let mut parser = Parser::new(src);
        let proxy_require = ProxyRequire::parse(&mut parser).unwrap();

        assert_eq!(parser.remaining(), b"\r\n");

        let tags: Vec<_> = proxy_require.tags().collect();
        assert_eq!(tags, vec!["foo", "bar"]);
        assert_eq!(proxy_require.to_string(), "Proxy-Require: foo, bar");
    }
}
