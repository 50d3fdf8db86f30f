use sipwire_util::ArcStr;
use uuid::Uuid;

use crate::error::Result;
use crate::headers::SipHeaderParse;
use crate::parser::Parser;

use core::fmt;

/// The `Call-ID` SIP header.
///
/// Uniquely identifies a particular invitation or all registrations of a
/// particular client.
///
/// # Examples
///
/// ```
/// # use sipwire::headers::CallId;
/// let cid = CallId::new("bs9ki9iqbee8k5kal8mpqb");
///
/// assert_eq!(
///     "Call-ID: bs9ki9iqbee8k5kal8mpqb",
///     cid.to_string()
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
#[repr(transparent)]
pub struct CallId(ArcStr);

impl From<&str> for CallId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl CallId {
    /// Creates a new `CallId` instance with the given identifier.
    pub fn new(id: &str) -> Self {
        Self(id.into())
    }

    /// Creates a `CallId` with a freshly generated random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string().into())
    }

    /// Returns the internal `CallId` identifier.
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl SipHeaderParse for CallId {
    const NAME: &'static str = "Call-ID";
    const SHORT_NAME: &'static str = "i";
    /*
     * Call-ID  =  ( "Call-ID" / "i" ) HCOLON callid
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let id = parser.parse_header_value_as_str()?;

        Ok(CallId(id))
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", CallId::NAME, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let src = b"bs9ki9iqbee8k5kal8mpqb\r\n";
        let mut parser = Parser::new(src);
        let cid = CallId::parse(&mut parser).unwrap();

        assert_eq!(cid.id(), "bs9ki9iqbee8k5kal8mpqb");
    }

    #[test]
    fn test_random_ids_differ() {
        assert_ne!(CallId::random(), CallId::random());
    }
}
