use std::fmt;

use crate::error::Result;
use crate::headers::SipHeaderParse;
use crate::parser::Parser;

/// The `Max-Forwards` SIP header.
///
/// Limits the number of proxies or gateways that can forward the
/// request.
///
/// # Examples
/// ```
/// # use sipwire::headers::MaxForwards;
///
/// let max = MaxForwards::new(70);
///
/// assert_eq!(
///     "Max-Forwards: 70",
///     max.to_string()
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(transparent)]
pub struct MaxForwards(u32);

impl MaxForwards {
    /// Creates a new `MaxForwards` header with the given number of
    /// forwards.
    pub const fn new(forwards: u32) -> Self {
        Self(forwards)
    }

    /// Returns the internal `MaxForwards` value.
    pub fn max_forwards(&self) -> u32 {
        self.0
    }
}

impl SipHeaderParse for MaxForwards {
    const NAME: &'static str = "Max-Forwards";
    /*
     * Max-Forwards  =  "Max-Forwards" HCOLON 1*DIGIT
     */
    fn parse(parser: &mut Parser<'_>) -> Result<MaxForwards> {
        let forwards = parser.parse_u32()?;

        Ok(MaxForwards(forwards))
    }
}

impl fmt::Display for MaxForwards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", MaxForwards::NAME, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let src = b"6\r\n";
        let mut parser = Parser::new(src);
        let max_forwards = MaxForwards::parse(&mut parser).unwrap();

        assert_eq!(parser.remaining(), b"\r\n");
        assert_eq!(max_forwards.0, 6)
    }
}
