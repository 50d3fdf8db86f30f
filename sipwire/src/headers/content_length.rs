use core::fmt;

use crate::error::Result;
use crate::headers::SipHeaderParse;
use crate::parser::Parser;

/// The `Content-Length` SIP header.
///
/// Indicates the size, in bytes, of the `message-body`.
///
/// Both the long (`Content-Length`) and short (`l`) header names are
/// supported.
///
/// # Examples
/// ```
/// # use sipwire::headers::ContentLength;
/// let c_len = ContentLength::new(3600);
///
/// assert_eq!(
///     "Content-Length: 3600",
///     c_len.to_string()
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[repr(transparent)]
pub struct ContentLength(u32);

impl ContentLength {
    /// Creates a new `ContentLength` from a `u32`.
    pub fn new(c_len: u32) -> Self {
        Self(c_len)
    }

    /// Returns the internal content length value.
    pub fn length(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ContentLength {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl SipHeaderParse for ContentLength {
    const NAME: &'static str = "Content-Length";
    const SHORT_NAME: &'static str = "l";
    /*
     * Content-Length  =  ( "Content-Length" / "l" ) HCOLON 1*DIGIT
     */
    fn parse(parser: &mut Parser<'_>) -> Result<ContentLength> {
        let l = parser.parse_u32()?;

        Ok(ContentLength(l))
    }
}

impl fmt::Display for ContentLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", ContentLength::NAME, self.0)
    }
}
