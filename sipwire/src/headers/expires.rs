use std::fmt;

use crate::error::Result;
use crate::headers::SipHeaderParse;
use crate::parser::Parser;

/// The `Expires` SIP header.
///
/// Gives the relative time after which the message (or content) expires,
/// used by REGISTER bindings and SUBSCRIBE subscriptions.
///
/// # Examples
/// ```
/// # use sipwire::headers::Expires;
///
/// let expires = Expires::new(3600);
///
/// assert_eq!(
///     "Expires: 3600",
///     expires.to_string()
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(transparent)]
pub struct Expires(u32);

impl Expires {
    /// Creates a new `Expires` header.
    pub const fn new(expires: u32) -> Self {
        Self(expires)
    }

    /// Returns the expiry in seconds.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl SipHeaderParse for Expires {
    const NAME: &'static str = "Expires";
    /*
     * Expires  =  "Expires" HCOLON delta-seconds
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Expires> {
        let expires = parser.parse_u32()?;

        Ok(Expires(expires))
    }
}

impl fmt::Display for Expires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", Expires::NAME, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let src = b"7200\r\n";
        let mut parser = Parser::new(src);
        let expires = Expires::parse(&mut parser).unwrap();

        assert_eq!(expires.as_u32(), 7200);
    }
}
