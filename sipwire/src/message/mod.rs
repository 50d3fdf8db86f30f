#![warn(missing_docs)]
//! SIP Message types
//!
//! The module provide the [`SipMsg`] enum that can be an
//! [`SipMsg::Request`] or [`SipMsg::Response`] and represents a SIP
//! message.

use std::fmt;
use std::fmt::Write as _;

use bytes::{BufMut, Bytes, BytesMut};
use md5::{Digest, Md5};
use sipwire_util::ArcStr;

use crate::error::{Field, Result, ValidationError};
use crate::headers::{Headers, MAGIC_COOKIE};
use crate::parser::SIPV2;

mod code;
mod endpoint;
mod method;
mod param;
mod transport;
mod uri;

pub use code::*;
pub use endpoint::*;
pub use method::*;
pub use param::*;
pub use transport::*;
pub use uri::*;

/// An SIP message, either Request or Response.
///
/// This enum can contain either an [`Request`] or an [`Response`], see
/// their respective documentation for more details.
#[derive(Debug, Clone)]
pub enum SipMsg {
    /// An SIP Request.
    Request(Request),
    /// An SIP Response.
    Response(Response),
}

impl SipMsg {
    /// Returns [`true`] if this message is an [`Request`] message, and
    /// [`false`] otherwise.
    pub const fn is_request(&self) -> bool {
        matches!(self, SipMsg::Request(_))
    }

    /// Returns [`true`] if this message is an [`Response`] message, and
    /// [`false`] otherwise.
    pub const fn is_response(&self) -> bool {
        matches!(self, SipMsg::Response(_))
    }

    /// Returns a reference to the [`Request`] if this is a
    /// [`SipMsg::Request`] variant.
    pub fn request(&self) -> Option<&Request> {
        if let SipMsg::Request(request) = self {
            Some(request)
        } else {
            None
        }
    }

    /// Returns a reference to the [`Response`] if this is a
    /// [`SipMsg::Response`] variant.
    pub fn response(&self) -> Option<&Response> {
        if let SipMsg::Response(response) = self {
            Some(response)
        } else {
            None
        }
    }

    /// Returns a reference to the headers of the message.
    pub fn headers(&self) -> &Headers {
        match self {
            SipMsg::Request(req) => &req.headers,
            SipMsg::Response(res) => &res.headers,
        }
    }

    /// Returns a mutable reference to the headers of the message.
    pub fn headers_mut(&mut self) -> &mut Headers {
        match self {
            SipMsg::Request(req) => &mut req.headers,
            SipMsg::Response(res) => &mut res.headers,
        }
    }

    /// Returns a reference to the message body.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            SipMsg::Request(request) => request.body.as_deref(),
            SipMsg::Response(response) => response.body.as_deref(),
        }
    }

    /// Sets the body of the message. It can be `None` to remove the body.
    pub fn set_body(&mut self, body: Option<Bytes>) {
        match self {
            SipMsg::Request(req) => {
                req.body = body;
            }
            SipMsg::Response(res) => {
                res.body = body;
            }
        }
    }

    /// Checks the structural preconditions of the message.
    ///
    /// A request without at least one `Via` header is invalid; responses
    /// have no structural preconditions beyond a well formed status line.
    pub fn validate(&self) -> Result<()> {
        match self {
            SipMsg::Request(req) => req.validate(),
            SipMsg::Response(_) => Ok(()),
        }
    }

    /// Serializes the message to its wire form.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            SipMsg::Request(req) => req.to_bytes(),
            SipMsg::Response(res) => res.to_bytes(),
        }
    }
}

impl From<Request> for SipMsg {
    fn from(value: Request) -> Self {
        SipMsg::Request(value)
    }
}

impl From<Response> for SipMsg {
    fn from(value: Response) -> Self {
        SipMsg::Response(value)
    }
}

/// A parsed SIP Request.
///
/// SIP request represents a request from a client to a server.
#[derive(Debug, Clone)]
pub struct Request {
    /// The Request-Line of the SIP message.
    pub req_line: RequestLine,
    /// All headers present in the SIP message.
    pub headers: Headers,
    /// The body of the SIP message, if present.
    pub body: Option<Bytes>,
}

impl Request {
    /// Creates a new SIP `Request`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sipwire::message::{Method, Request, Uri};
    ///
    /// let uri: Uri = "sip:localhost".parse().unwrap();
    /// let request = Request::new(Method::Options, uri);
    /// ```
    pub fn new(method: Method, uri: Uri) -> Self {
        Request {
            req_line: RequestLine { method, uri },
            headers: Default::default(),
            body: None,
        }
    }

    /// Creates a new `Request` with the given headers.
    #[inline]
    pub const fn new_with_headers(method: Method, uri: Uri, headers: Headers) -> Self {
        Self {
            req_line: RequestLine { method, uri },
            headers,
            body: None,
        }
    }

    /// Returns the SIP method of the request.
    pub fn method(&self) -> &Method {
        &self.req_line.method
    }

    /// Returns the Request-URI.
    pub fn uri(&self) -> &Uri {
        &self.req_line.uri
    }

    /// Checks the structural preconditions of the request.
    ///
    /// A received request must carry at least one `Via` header.
    pub fn validate(&self) -> Result<()> {
        if self.headers.top_via().is_none() {
            return Err(ValidationError::new(Field::Via, "request has no Via header").into());
        }
        Ok(())
    }

    /// Derives the transaction branch for this request.
    ///
    /// The branch is a keyed hash over the To tag, From tag, Call-ID,
    /// Request-URI, top Via, CSeq number, Route set and Proxy-Require,
    /// prefixed by the `z9hG4bK` magic cookie. The same request always
    /// yields the same branch so retransmissions match their
    /// transaction; any change to the keyed fields produces a new one.
    pub fn synthesize_branch(&self) -> String {
        let mut hasher = Md5::new();

        hasher.update(MAGIC_COOKIE.as_bytes());
        hasher.update(b"|");
        if let Some(tag) = self.headers.to_header().and_then(|to| to.tag()) {
            hasher.update(tag.as_bytes());
        }
        hasher.update(b"|");
        if let Some(tag) = self.headers.from_header().and_then(|from| from.tag()) {
            hasher.update(tag.as_bytes());
        }
        hasher.update(b"|");
        if let Some(call_id) = self.headers.call_id() {
            hasher.update(call_id.id().as_bytes());
        }
        hasher.update(b"|");
        hasher.update(self.req_line.uri.to_string().as_bytes());
        hasher.update(b"|");
        if let Some(via) = self.headers.top_via() {
            hasher.update(via.to_string().as_bytes());
        }
        hasher.update(b"|");
        if let Some(cseq) = self.headers.cseq() {
            hasher.update(cseq.cseq().to_string().as_bytes());
        }
        for route in self.headers.routes() {
            hasher.update(b"|");
            hasher.update(route.to_string().as_bytes());
        }
        hasher.update(b"|");
        if let Some(proxy_require) = self.headers.proxy_require() {
            hasher.update(proxy_require.to_string().as_bytes());
        }

        let digest = hasher.finalize();
        let mut branch = String::with_capacity(MAGIC_COOKIE.len() + 32);
        branch.push_str(MAGIC_COOKIE);
        for byte in digest {
            let _ = write!(branch, "{:02x}", byte);
        }
        branch
    }

    /// Returns `true` when this request already traversed the hop
    /// identified by `(host, port)` with the candidate `branch`: some
    /// `Via` entry has a matching sent-by and an equal branch.
    pub fn is_loop(&self, host: &str, port: u16, branch: &str) -> bool {
        self.headers.vias().any(|via| {
            let sent_by = via.sent_by();
            let via_port = sent_by.port.unwrap_or_else(|| via.transport().default_port());

            via_port == port
                && sent_by.host.to_string().eq_ignore_ascii_case(host)
                && via.branch() == Some(branch)
        })
    }

    /// Serializes the request to its wire form.
    pub fn to_bytes(&self) -> Bytes {
        let estimated_message_size = if self.body.is_none() { 800 } else { 1500 };
        let mut text = String::with_capacity(estimated_message_size);
        let _ = write!(text, "{}{}\r\n", self.req_line, self.headers);

        let mut buf = BytesMut::with_capacity(text.len() + self.body.as_ref().map_or(0, |b| b.len()));
        buf.put_slice(text.as_bytes());
        if let Some(body) = &self.body {
            buf.put_slice(body);
        }
        buf.freeze()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}\r\n", self.req_line, self.headers)?;
        if let Some(body) = &self.body {
            f.write_str(&String::from_utf8_lossy(body))?;
        }
        Ok(())
    }
}

/// Represents a SIP Request-Line.
///
/// The Request-Line contains the method and the Request-URI, which
/// indicate the target of the SIP request.
#[derive(Debug, Clone)]
pub struct RequestLine {
    /// The SIP method associated with the request (e.g., INVITE, BYE).
    pub method: Method,
    /// The Request-URI indicating the target of the request.
    pub uri: Uri,
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {SIPV2}\r\n", self.method, self.uri)
    }
}

/// A parsed SIP Response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The Status-Line of the SIP message.
    pub status_line: StatusLine,
    /// All headers present in the SIP message.
    pub headers: Headers,
    /// The body of the SIP message, if present.
    pub body: Option<Bytes>,
}

impl Response {
    /// Creates a new SIP `Response` from a `Status-Line`, with empty
    /// headers and no body.
    pub fn new(status_line: StatusLine) -> Self {
        Self {
            status_line,
            headers: Default::default(),
            body: None,
        }
    }

    /// Creates a new `Response` with the given `Status-Line` and headers.
    pub const fn new_with_headers(status_line: StatusLine, headers: Headers) -> Self {
        Self {
            status_line,
            headers,
            body: None,
        }
    }

    /// Returns the message response code.
    pub fn code(&self) -> StatusCode {
        self.status_line.code
    }

    /// Returns the reason phrase.
    pub fn reason(&self) -> &str {
        &self.status_line.reason
    }

    /// Set the headers of the response, replacing any existing headers.
    pub fn set_headers(&mut self, headers: Headers) {
        self.headers = headers;
    }

    /// Appends headers from another collection to the current headers.
    pub fn append_headers(&mut self, other: &mut Headers) {
        self.headers.append(other);
    }

    /// Serializes the response to its wire form.
    pub fn to_bytes(&self) -> Bytes {
        let estimated_message_size = if self.body.is_none() { 800 } else { 1500 };
        let mut text = String::with_capacity(estimated_message_size);
        let _ = write!(text, "{}{}\r\n", self.status_line, self.headers);

        let mut buf = BytesMut::with_capacity(text.len() + self.body.as_ref().map_or(0, |b| b.len()));
        buf.put_slice(text.as_bytes());
        if let Some(body) = &self.body {
            buf.put_slice(body);
        }
        buf.freeze()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}\r\n", self.status_line, self.headers)?;
        if let Some(body) = &self.body {
            f.write_str(&String::from_utf8_lossy(body))?;
        }
        Ok(())
    }
}

/// Represents a SIP Status-Line.
///
/// The Status-Line appears in SIP responses and includes a status code
/// and a reason phrase explaining the result of the request.
#[derive(Debug, Clone)]
pub struct StatusLine {
    /// The SIP status code associated with the response (e.g., 200, 404).
    pub code: StatusCode,
    /// The reason phrase explaining the status code (e.g., "OK").
    pub reason: ArcStr,
}

impl StatusLine {
    /// Creates a new `StatusLine` instance from the given [`StatusCode`]
    /// and reason.
    ///
    /// # Examples
    /// ```
    /// # use sipwire::message::StatusLine;
    /// let status_line = StatusLine::new(200.into(), "OK");
    /// ```
    pub fn new(code: StatusCode, reason: &str) -> Self {
        StatusLine {
            code,
            reason: reason.into(),
        }
    }

    /// Creates a `StatusLine` with the default reason phrase of `code`.
    pub fn from_code(code: StatusCode) -> Self {
        StatusLine {
            code,
            reason: code.reason_phrase().into(),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SIPV2} {} {}\r\n", self.code.into_i32(), self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::{CSeq, CallId, Header, ProxyRequire, SipHeaderParse, Via};

    fn base_request(cseq: u32) -> Request {
        let uri: Uri = "sip:bob@biloxi.example.com".parse().unwrap();
        let mut request = Request::new(Method::Invite, uri);
        request.headers.push(Header::Via(
            Via::from_bytes(b"SIP/2.0/UDP 192.0.2.1:5060;branch=z9hG4bK-foo").unwrap(),
        ));
        request.headers.push(Header::CallId(CallId::new("a84b4c76e66710")));
        request.headers.push(Header::CSeq(CSeq::new(cseq, Method::Invite)));
        request
    }

    #[test]
    fn test_branch_is_deterministic() {
        let request = base_request(314159);

        let first = request.synthesize_branch();
        let second = request.synthesize_branch();

        assert!(first.starts_with(MAGIC_COOKIE));
        assert_eq!(first, second);
    }

    #[test]
    fn test_branch_changes_with_cseq() {
        let branch = base_request(314159).synthesize_branch();
        let other = base_request(314160).synthesize_branch();

        assert_ne!(branch, other);
    }

    #[test]
    fn test_branch_changes_with_proxy_require() {
        let branch = base_request(314159).synthesize_branch();

        let mut other = base_request(314159);
        other
            .headers
            .push(Header::ProxyRequire(ProxyRequire::new(&["sec-agree"])));

        assert_ne!(branch, other.synthesize_branch());
    }

    #[test]
    fn test_loop_detection() {
        let request = base_request(314159);

        assert!(request.is_loop("192.0.2.1", 5060, "z9hG4bK-foo"));
        assert!(!request.is_loop("192.0.2.1", 5060, "z9hG4bK-bar"));
        assert!(!request.is_loop("192.0.2.2", 5060, "z9hG4bK-foo"));
        assert!(!request.is_loop("192.0.2.1", 5070, "z9hG4bK-foo"));
    }

    #[test]
    fn test_request_without_via_is_invalid() {
        let uri: Uri = "sip:bob@biloxi.example.com".parse().unwrap();
        let request = Request::new(Method::Options, uri);

        assert_matches!(request.validate(), Err(crate::Error::Validation(e)) => {
            assert_eq!(e.field, crate::error::Field::Via);
        });
    }
}
