use core::fmt;

use crate::error::Result;
use crate::headers::SipHeaderParse;
use crate::parser::Parser;
use crate::MediaType;

/// The `Content-Type` SIP header.
///
/// Indicates the media type of the `message-body` sent to the recipient.
///
/// Both the long (`Content-Type`) and short (`c`) header names are
/// supported.
///
/// # Examples
/// ```
/// # use sipwire::headers::ContentType;
/// # use sipwire::MediaType;
///
/// let ctype = ContentType::new(MediaType::new("application", "sdp"));
///
/// assert_eq!(
///     "Content-Type: application/sdp",
///     ctype.to_string()
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ContentType(MediaType);

impl ContentType {
    /// Creates a new `Content-Type` with sdp as `MediaType`.
    pub fn new_sdp() -> Self {
        Self(MediaType::new("application", "sdp"))
    }

    /// Creates a new `ContentType`.
    pub fn new(m: MediaType) -> Self {
        Self(m)
    }

    /// Returns the internal `MediaType`.
    pub fn media_type(&self) -> &MediaType {
        &self.0
    }
}

impl SipHeaderParse for ContentType {
    const NAME: &'static str = "Content-Type";
    const SHORT_NAME: &'static str = "c";
    /*
     * Content-Type     =  ( "Content-Type" / "c" ) HCOLON media-type
     * media-type       =  m-type SLASH m-subtype *(SEMI m-parameter)
     * m-type           =  discrete-type / composite-type
     * discrete-type    =  "text" / "image" / "audio" / "video"
     *                     / "application" / extension-token
     * composite-type   =  "message" / "multipart" / extension-token
     * m-subtype        =  extension-token / iana-token
     * m-parameter      =  m-attribute EQUAL m-value
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let media_type = MediaType::parse(parser)?;

        Ok(ContentType(media_type))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", ContentType::NAME, self.0)
    }
}
