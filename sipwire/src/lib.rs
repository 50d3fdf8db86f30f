//! # sipwire
//!
//! A rust library that implements the SIP message codec and dialog core:
//! parsing and serializing SIP messages, URIs and headers, framing
//! messages out of byte streams, and tracking the dialog state a call
//! lives in.

pub mod dialog;
pub mod error;
pub mod headers;
pub mod message;
pub mod parser;
pub mod transport;

pub(crate) mod macros;

pub use dialog::Dialog;
pub use error::{Error, Result};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

use std::fmt;
use std::str::FromStr;

use sipwire_util::ArcStr;

use crate::error::{Field, ValidationError};
use crate::message::{Parameters, Scheme, TransportProtocol};
use crate::parser::Parser;
use crate::transport::MAX_RECEIVE_LENGTH;

/// Parsing and framing options.
///
/// The default values match common SIP deployments; pass a `Config` to
/// the entry points that accept one to override them.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scheme assumed by the relaxed URI parse when none is present.
    pub default_scheme: Scheme,
    /// Transport assumed when a URI does not carry one.
    pub default_transport: TransportProtocol,
    /// Hard cap on the size of a single received message.
    pub max_message_bytes: usize,
    /// Text encoding of the SIP envelope.
    pub sip_encoding: ArcStr,
    /// Text encoding assumed for message bodies.
    pub body_encoding: ArcStr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_scheme: Scheme::Sip,
            default_transport: TransportProtocol::Udp,
            max_message_bytes: MAX_RECEIVE_LENGTH,
            sip_encoding: "utf-8".into(),
            body_encoding: "utf-8".into(),
        }
    }
}

/// Represents a quality value (q-value) used in SIP headers.
///
/// The `Q` struct provides a method to parse a string representation of a
/// q-value into a `Q` instance. The q-value is typically used to indicate
/// the preference of certain SIP headers.
///
/// # Example
///
/// ```
/// use sipwire::Q;
///
/// let q_value = "0.5".parse();
/// assert_eq!(q_value, Ok(Q(0, 5)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct Q(pub u8, pub u8);

impl Q {
    pub fn new(a: u8, b: u8) -> Self {
        Self(a, b)
    }
}

impl From<u8> for Q {
    fn from(value: u8) -> Self {
        Self(value, 0)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseQError;

impl From<ParseQError> for Error {
    fn from(value: ParseQError) -> Self {
        Self::Validation(ValidationError::new(Field::Header, format!("{:?}", value)))
    }
}

impl FromStr for Q {
    type Err = ParseQError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.rsplit_once('.') {
            Some((a, b)) => {
                let a = a.parse().map_err(|_| ParseQError)?;
                let b = b.parse().map_err(|_| ParseQError)?;
                Ok(Q(a, b))
            }
            None => match s.parse() {
                Ok(n) => Ok(Q(n, 0)),
                Err(_) => Err(ParseQError),
            },
        }
    }
}

impl fmt::Display for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ";q={}.{}", self.0, self.1)
    }
}

/// This type represents an MIME type that indicates an content format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeType {
    pub mtype: ArcStr,
    pub subtype: ArcStr,
}

/// The `media-type` that appears in `Content-Type` SIP headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    pub mimetype: MimeType,
    pub param: Option<Parameters>,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let MediaType { mimetype, param } = self;
        write!(f, "{}/{}", mimetype.mtype, mimetype.subtype)?;
        if let Some(param) = &param {
            write!(f, "{}", param)?;
        }
        Ok(())
    }
}

impl MediaType {
    /// Constructs a `MediaType` from a type and a subtype.
    pub fn new(mtype: &str, subtype: &str) -> Self {
        Self {
            mimetype: MimeType {
                mtype: mtype.into(),
                subtype: subtype.into(),
            },
            param: None,
        }
    }

    pub(crate) fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let mtype = parser.parse_token()?;
        parser.must_read(b'/')?;
        let subtype = parser.parse_token()?;
        let (mtype, subtype) = (mtype.into(), subtype.into());
        let param = crate::macros::parse_header_param!(parser);

        Ok(MediaType {
            mimetype: MimeType { mtype, subtype },
            param,
        })
    }

    /// Constructs a `MediaType` with optional parameters.
    pub fn from_parts(mtype: &str, subtype: &str, param: Option<Parameters>) -> Self {
        Self {
            mimetype: MimeType {
                mtype: mtype.into(),
                subtype: subtype.into(),
            },
            param,
        }
    }
}
