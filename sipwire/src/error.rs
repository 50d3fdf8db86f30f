use std::fmt;
use std::str::Utf8Error;

use thiserror::Error;

use crate::message::StatusCode;
use crate::transport::OutgoingRequest;

pub type Result<T> = std::result::Result<T, Error>;

/// The message element a validation failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Generic message syntax.
    Message,
    /// The Request-Line.
    Request,
    /// The Status-Line.
    Response,
    /// A SIP URI.
    Uri,
    /// A URI scheme.
    Scheme,
    /// The `Via` header.
    Via,
    /// The `From` header.
    From,
    /// The `To` header.
    To,
    /// The `Contact` header.
    Contact,
    /// The `Route` header.
    Route,
    /// The `Record-Route` header.
    RecordRoute,
    /// The `Call-ID` header.
    CallId,
    /// The `CSeq` header.
    CSeq,
    /// The `Content-Length` header.
    ContentLength,
    /// The `Content-Type` header.
    ContentType,
    /// The `Max-Forwards` header.
    MaxForwards,
    /// The `Expires` header.
    Expires,
    /// Any other header.
    Header,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Message => "message",
            Field::Request => "request line",
            Field::Response => "status line",
            Field::Uri => "uri",
            Field::Scheme => "uri scheme",
            Field::Via => "Via header",
            Field::From => "From header",
            Field::To => "To header",
            Field::Contact => "Contact header",
            Field::Route => "Route header",
            Field::RecordRoute => "Record-Route header",
            Field::CallId => "Call-ID header",
            Field::CSeq => "CSeq header",
            Field::ContentLength => "Content-Length header",
            Field::ContentType => "Content-Type header",
            Field::MaxForwards => "Max-Forwards header",
            Field::Expires => "Expires header",
            Field::Header => "header",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured parse or validation failure.
///
/// Carries the element that failed, a human readable message and the SIP
/// response code a server should answer the offending message with.
#[derive(Debug, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    /// The element the failure is attributed to.
    pub field: Field,
    /// The suggested SIP response code.
    pub code: StatusCode,
    /// What went wrong.
    pub message: String,
}

impl ValidationError {
    /// Creates a `ValidationError` with the default `400 Bad Request`
    /// response code.
    pub fn new<T>(field: Field, message: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            field,
            code: StatusCode::BadRequest,
            message: message.into(),
        }
    }

    /// Creates a `ValidationError` with an explicit response code.
    pub fn with_code<T>(field: Field, code: StatusCode, message: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            field,
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("message of {len} bytes exceeds the {max} byte receive limit")]
    Framing { len: usize, max: usize },

    #[error("buffer does not contain a SIP message")]
    NoSipString,

    #[error("missing required '{0}' header")]
    MissingRequiredHeader(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("transport channel closed")]
    ChannelClosed,

    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

impl Error {
    /// The SIP response code a server should answer with when rejecting
    /// the message that produced this error.
    pub fn suggested_status(&self) -> StatusCode {
        match self {
            Error::Validation(e) => e.code,
            _ => StatusCode::BadRequest,
        }
    }
}

impl From<sipwire_util::Error> for ValidationError {
    fn from(err: sipwire_util::Error) -> Self {
        ValidationError::new(
            Field::Message,
            format!("syntax error at line {} column {} ({:?})", err.line, err.col, err.kind),
        )
    }
}

impl From<sipwire_util::Error> for Error {
    fn from(err: sipwire_util::Error) -> Self {
        Error::Validation(err.into())
    }
}

impl From<Utf8Error> for Error {
    fn from(err: Utf8Error) -> Self {
        Error::Validation(ValidationError::new(Field::Message, format!("invalid utf-8: {err}")))
    }
}

impl From<tokio::sync::mpsc::error::SendError<OutgoingRequest>> for Error {
    fn from(_: tokio::sync::mpsc::error::SendError<OutgoingRequest>) -> Self {
        Error::ChannelClosed
    }
}
