#![warn(missing_docs)]
//! SIP Parser
//!
//! This module contains functions for sip parsing.

use std::str::{self};

use bytes::Bytes;
use sipwire_util::util::{is_digit, is_newline, is_space, is_valid_port};
use sipwire_util::{ArcStr, Position, Scanner};

use crate::error::{Field, Result, ValidationError};
use crate::headers::*;
use crate::macros::{b_map, comma_sep, parse_error, parse_header};
use crate::message::{
    Host, HostPort, Method, NameAddr, Parameter, Request, RequestLine, Response, Scheme, SipAddr, SipMsg, StatusCode,
    StatusLine, Uri, UriHeaders, UriUser,
};

pub(crate) const SIPV2: &str = "SIP/2.0";

const B_SIPV2: &[u8] = SIPV2.as_bytes();
const USER_PARAM: &str = "user";
const METHOD_PARAM: &str = "method";
const TRANSPORT_PARAM: &str = "transport";
const TTL_PARAM: &str = "ttl";
const LR_PARAM: &str = "lr";
const MADDR_PARAM: &str = "maddr";
const ALPHA_NUM: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const UNRESERVED: &[u8] = b"-_.!~*'()%";
const ESCAPED: &[u8] = b"%";
const USER_UNRESERVED: &[u8] = b"&=+$,;?/";
const TOKEN: &[u8] = b"-.!%*_`'~+";
const PASS: &[u8] = b"&=+$,";
const HOST: &[u8] = b"_-.";

// For reading user part in uri.
b_map!(USER_MAP => ALPHA_NUM, UNRESERVED, USER_UNRESERVED, ESCAPED);
// For reading password in uri.
b_map!(PASS_MAP => ALPHA_NUM, UNRESERVED, ESCAPED, PASS);
// For reading host in uri.
b_map!(HOST_MAP => ALPHA_NUM, HOST);
// For reading parameter in uri.
b_map!(PARAM_MAP => b"[]/:&+$", ALPHA_NUM, UNRESERVED, ESCAPED);
// For reading header parameter in uri.
b_map!(HDR_MAP => b"[]/?:+$", ALPHA_NUM, UNRESERVED, ESCAPED);
// For reading token.
b_map!(TOKEN_MAP => ALPHA_NUM, TOKEN);
// For reading via parameter.
b_map!(VIA_PARAM_MAP => b"[:]", ALPHA_NUM, TOKEN);

#[inline(always)]
fn is_user(b: u8) -> bool {
    USER_MAP[b as usize]
}

#[inline(always)]
fn is_pass(b: u8) -> bool {
    PASS_MAP[b as usize]
}

#[inline(always)]
fn is_host(b: u8) -> bool {
    HOST_MAP[b as usize]
}

#[inline(always)]
fn is_param(b: u8) -> bool {
    PARAM_MAP[b as usize]
}

#[inline(always)]
fn is_hdr(b: u8) -> bool {
    HDR_MAP[b as usize]
}

#[inline(always)]
fn is_token(b: u8) -> bool {
    TOKEN_MAP[b as usize]
}

#[inline(always)]
fn is_via_param(b: u8) -> bool {
    VIA_PARAM_MAP[b as usize]
}

/// Parses one `Via` extension parameter (IPv6-aware value set).
pub(crate) fn parse_via_param(parser: &mut Parser<'_>) -> Result<Parameter> {
    unsafe { parser.parse_param_unchecked(is_via_param) }
}

/// Parses one uri parameter.
pub(crate) fn parse_uri_param(parser: &mut Parser<'_>) -> Result<Parameter> {
    unsafe { parser.parse_param_unchecked(is_param) }
}

// A ":::" run inside a host collapses to "::" (RFC 5118 robustness).
fn collapse_colon_runs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut colons = 0;
    for c in s.chars() {
        if c == ':' {
            colons += 1;
            if colons > 2 {
                continue;
            }
        } else {
            colons = 0;
        }
        out.push(c);
    }
    out
}

/// A type for parsing SIP messages.
///
/// This struct provides methods for parsing the components of SIP
/// messages, such as headers, URIs, and start lines. All produced values
/// are owned; the parser only borrows the input buffer while running.
pub struct Parser<'buf> {
    scanner: Scanner<'buf>,
}

impl<'buf> Parser<'buf> {
    /// Create a new `Parser` from the given slice.
    pub fn new(buf: &'buf [u8]) -> Self {
        Self {
            scanner: Scanner::new(buf),
        }
    }

    /// Parse a buffer of bytes into a `SipMsg`.
    ///
    /// # Example
    ///
    /// This example parses a simple SIP response message and asserts its
    /// contents:
    ///
    /// ```rust
    /// use sipwire::parser::Parser;
    /// use sipwire::headers::{ContentLength, Header};
    ///
    /// let buf = b"SIP/2.0 200 OK\r\nContent-Length: 0\r\n\r\n";
    /// let parser = &mut Parser::new(buf);
    /// let result = parser.parse_sip_msg().unwrap();
    /// let response = result.response().unwrap();
    /// assert_eq!(response.code().into_i32(), 200);
    /// assert_eq!(response.reason(), "OK");
    /// assert_eq!(response.headers.len(), 1);
    /// assert_eq!(response.headers[0], Header::ContentLength(0.into()));
    /// ```
    pub fn parse_sip_msg(&mut self) -> Result<SipMsg> {
        // Parse the start line of the SIP message and initialize the
        // message with empty headers and body.
        let mut msg = self.parse_start_line()?;
        let mut content_length: Option<usize> = None;

        // Parse headers.
        let headers = msg.headers_mut();

        loop {
            if matches!(self.peek(), Some(b'\r') | Some(b'\n') | None) {
                break;
            }

            // Get name.
            let name = self.parse_token()?;

            self.take_ws();

            let Some(b':') = self.advance() else {
                return self.parse_error(Field::Header, "Missing ':' after header name");
            };

            self.take_ws();

            let name = name.as_bytes();

            if Via::matches_name(name) {
                comma_sep!(self => {
                    let header = parse_header!(Via, self, Field::Via);
                    headers.push(Header::Via(header));
                });
            } else if Route::matches_name(name) {
                comma_sep!(self => {
                    let header = parse_header!(Route, self, Field::Route);
                    headers.push(Header::Route(header));
                });
            } else if RecordRoute::matches_name(name) {
                comma_sep!(self => {
                    let header = parse_header!(RecordRoute, self, Field::RecordRoute);
                    headers.push(Header::RecordRoute(header));
                });
            } else if Contact::matches_name(name) {
                comma_sep!(self => {
                    let header = parse_header!(Contact, self, Field::Contact);
                    headers.push(Header::Contact(header));
                });
            } else if From::matches_name(name) {
                let header = parse_header!(From, self, Field::From);
                headers.push(Header::From(header));
            } else if To::matches_name(name) {
                let header = parse_header!(To, self, Field::To);
                headers.push(Header::To(header));
            } else if CallId::matches_name(name) {
                let header = parse_header!(CallId, self, Field::CallId);
                headers.push(Header::CallId(header));
            } else if CSeq::matches_name(name) {
                let header = parse_header!(CSeq, self, Field::CSeq);
                headers.push(Header::CSeq(header));
            } else if ContentLength::matches_name(name) {
                let header = parse_header!(ContentLength, self, Field::ContentLength);
                content_length = Some(header.length() as usize);
                headers.push(Header::ContentLength(header));
            } else if ContentType::matches_name(name) {
                let header = parse_header!(ContentType, self, Field::ContentType);
                headers.push(Header::ContentType(header));
            } else if MaxForwards::matches_name(name) {
                let header = parse_header!(MaxForwards, self, Field::MaxForwards);
                headers.push(Header::MaxForwards(header));
            } else if Expires::matches_name(name) {
                let header = parse_header!(Expires, self, Field::Expires);
                headers.push(Header::Expires(header));
            } else if ProxyRequire::matches_name(name) {
                let header = parse_header!(ProxyRequire, self, Field::Header);
                headers.push(Header::ProxyRequire(header));
            } else if ProxyReceivedOn::matches_name(name) {
                let header = parse_header!(ProxyReceivedOn, self, Field::Header);
                headers.push(Header::ProxyReceivedOn(header));
            } else if ProxyReceivedFrom::matches_name(name) {
                let header = parse_header!(ProxyReceivedFrom, self, Field::Header);
                headers.push(Header::ProxyReceivedFrom(header));
            } else if ProxySendFrom::matches_name(name) {
                let header = parse_header!(ProxySendFrom, self, Field::Header);
                headers.push(Header::ProxySendFrom(header));
            } else {
                // A header this crate has no typed representation for; it
                // is retained verbatim.
                let name = str::from_utf8(name)?;
                let value = self.parse_header_value_as_str()?;

                headers.push(Header::Other(OtherHeader {
                    name: name.into(),
                    value,
                }));
            }

            if !matches!(self.peek(), Some(b'\r') | Some(b'\n')) {
                return self.parse_error(Field::Header, "Missing CRLF on header end!");
            }

            self.consume_newline();
        }

        // The empty line between headers and body.
        self.consume_newline();

        let rem = self.scanner.remaining();
        let length = content_length.unwrap_or(rem.len()).min(rem.len());
        if length > 0 {
            msg.set_body(Some(Bytes::copy_from_slice(&rem[..length])));
        }

        Ok(msg)
    }

    pub(crate) fn parse_error<T, S>(&self, field: Field, msg: S) -> Result<T>
    where
        S: AsRef<str>,
    {
        parse_error!(field, msg.as_ref(), self)
    }

    /// Reads a header value up to the end of the header, joining folded
    /// continuation lines with a single space.
    pub(crate) fn parse_header_value_as_str(&mut self) -> Result<ArcStr> {
        let first = self.scanner.read_while(|b| !is_newline(b));
        let mut value = String::from(str::from_utf8(first)?.trim_end());

        while self.at_line_fold() {
            self.consume_newline();
            self.scanner.read_while(is_space);
            let cont = self.scanner.read_while(|b| !is_newline(b));
            value.push(' ');
            value.push_str(str::from_utf8(cont)?.trim_end());
        }

        Ok(value.into())
    }

    // Is the scanner at a newline that continues the current header
    // (CRLF followed by SP or HTAB)?
    fn at_line_fold(&self) -> bool {
        match self.scanner.peek() {
            Some(&b'\r') => {
                let after = if self.scanner.peek_at(1) == Some(&b'\n') { 2 } else { 1 };
                matches!(self.scanner.peek_at(after), Some(&b' ') | Some(&b'\t'))
            }
            Some(&b'\n') => matches!(self.scanner.peek_at(1), Some(&b' ') | Some(&b'\t')),
            _ => false,
        }
    }

    // Read whitespace, folding line continuations (LWS).
    pub(crate) fn take_ws(&mut self) {
        loop {
            self.scanner.read_while(is_space);
            if !self.at_line_fold() {
                break;
            }
            self.consume_newline();
        }
    }

    // Consume a single CRLF (or a bare CR / LF).
    pub(crate) fn consume_newline(&mut self) {
        self.scanner.consume_if(|b| b == b'\r');
        self.scanner.consume_if(|b| b == b'\n');
    }

    // Read alphabetic bytes.
    #[inline]
    pub(crate) fn alpha(&mut self) -> &'buf [u8] {
        self.scanner.read_while(|b| b.is_ascii_alphabetic())
    }

    // Read a transport token after "SIP/2.0/".
    #[inline]
    pub(crate) fn read_transport(&mut self) -> &'buf [u8] {
        self.scanner.read_while(|b| b.is_ascii_alphanumeric())
    }

    // SIP version.
    #[inline]
    pub(crate) fn parse_sip_v2(&mut self) -> Result<()> {
        Ok(self.scanner.matches_slice(B_SIPV2)?)
    }

    // SIP Request-Line.
    pub(crate) fn parse_request_line(&mut self) -> Result<RequestLine> {
        let method_bytes = self.scanner.read_while(is_token);
        let method = Method::from(method_bytes);

        self.take_ws();

        if self.scanner.starts_with(B_SIPV2) || self.is_next_newline() || self.scanner.is_eof() {
            return self.parse_error(Field::Request, "missing request URI");
        }

        let uri = self.parse_uri(true)?;
        self.take_ws();

        if self.parse_sip_v2().is_err() {
            return self.parse_error(Field::Request, "malformed SIP version");
        }

        self.consume_newline();

        Ok(RequestLine { method, uri })
    }

    // SIP Status-Line.
    pub(crate) fn parse_status_line(&mut self) -> Result<StatusLine> {
        if self.parse_sip_v2().is_err() {
            return self.parse_error(Field::Response, "malformed SIP version");
        }

        self.take_ws();
        let digits = self.scanner.read_while(is_digit);
        if digits.is_empty() {
            return self.parse_error(Field::Response, "missing status code");
        }
        self.take_ws();

        let code = digits.into();

        let reason_bytes = self.scanner.read_while(|b| !is_newline(b));
        let reason = str::from_utf8(reason_bytes)?.trim_end();

        self.consume_newline();

        Ok(StatusLine::new(code, reason))
    }

    fn parse_scheme(&mut self) -> Result<Scheme> {
        let (scheme_b, colon) = self.scanner.peek_while(is_token);

        let Some(b':') = colon else {
            return self.parse_error(Field::Uri, "Missing ':' in uri");
        };

        let scheme = if scheme_b.eq_ignore_ascii_case(b"sip") {
            Scheme::Sip
        } else if scheme_b.eq_ignore_ascii_case(b"sips") {
            Scheme::Sips
        } else {
            return Err(ValidationError::with_code(
                Field::Scheme,
                StatusCode::UnsupportedUriScheme,
                format!("Unsupported URI scheme: {}", String::from_utf8_lossy(scheme_b)),
            )
            .into());
        };

        // Take the scheme and the character ":".
        self.scanner.bump_n(scheme_b.len() + 1);

        Ok(scheme)
    }

    fn exists_user_part_in_uri(&self) -> bool {
        let rem = self.scanner.remaining();

        rem.iter()
            .take_while(|&&b| b != b' ' && b != b'>' && !is_newline(b))
            .any(|&b| b == b'@')
    }

    // User info in SIP uri.
    pub(crate) fn parse_user_info(&mut self) -> Result<Option<UriUser>> {
        // Checks if uri has an user part.
        if !self.exists_user_part_in_uri() {
            return Ok(None);
        }

        // We have user part in uri.
        let user = self.read_user_str();
        let pass = if self.scanner.consume_if(|b| b == b':').is_some() {
            Some(self.read_pass_str())
        } else {
            None
        };
        let user = UriUser::new(user, pass);

        // Take '@'.
        self.advance();

        Ok(Some(user))
    }

    pub(crate) fn parse_host_port(&mut self) -> Result<HostPort> {
        if self.scanner.peek() == Some(&b'[') {
            // Is an Ipv6 host. The '[' and ']' characters are removed
            // from the host.
            self.advance();
            let host = self.scanner.read_while(|b| b != b']');
            let host = str::from_utf8(host)?;
            self.advance();

            let host = collapse_colon_runs(host);
            let host = match host.parse() {
                Ok(addr) => Host::IpAddr(addr),
                Err(_) => return self.parse_error(Field::Uri, "Error parsing Ipv6 host"),
            };

            let port = self.parse_port()?;
            return Ok(HostPort { host, port });
        }

        let first = self.read_host_str();
        if first.is_empty() {
            return self.parse_error(Field::Uri, "Can't parse the host");
        }

        // An unbracketed run with more than one ':' cannot be host:port;
        // keep the whole run as the host after collapsing ":::" to "::".
        if self.colons_ahead() > 1 {
            let rest = self.scanner.read_while(|b| b == b':' || is_host(b));
            let mut full = String::with_capacity(first.len() + rest.len());
            full.push_str(first);
            full.push_str(str::from_utf8(rest)?);
            let full = collapse_colon_runs(&full);

            let host = match full.parse() {
                Ok(addr) => Host::IpAddr(addr),
                Err(_) => Host::DomainName(full.as_str().into()),
            };
            return Ok(HostPort { host, port: None });
        }

        let host = match first.parse() {
            Ok(addr) => Host::IpAddr(addr),
            Err(_) => Host::DomainName(first.into()),
        };

        let port = self.parse_port()?;

        Ok(HostPort { host, port })
    }

    // Number of ':' bytes before the next uri delimiter.
    fn colons_ahead(&self) -> usize {
        self.scanner
            .remaining()
            .iter()
            .take_while(|&&b| !matches!(b, b';' | b'?' | b'>' | b',' | b' ' | b'\t') && !is_newline(b))
            .filter(|&&b| b == b':')
            .count()
    }

    fn parse_port(&mut self) -> Result<Option<u16>> {
        if self.scanner.consume_if(|b| b == b':').is_none() {
            return Ok(None);
        }
        let digits = self.scanner.read_u16()?;

        if is_valid_port(digits) {
            Ok(Some(digits))
        } else {
            self.parse_error(Field::Uri, "invalid uri port")
        }
    }

    // Parse URI.
    pub(crate) fn parse_uri(&mut self, parse_params: bool) -> Result<Uri> {
        if self.scanner.peek() == Some(&b'*') {
            // REGISTER "remove all bindings".
            self.advance();
            return Ok(Uri::wildcard());
        }

        let scheme = self.parse_scheme()?;
        let user = self.parse_user_info()?;
        let host_port = self.parse_host_port()?;

        if !parse_params {
            return Ok(Uri::new(scheme, user, host_port));
        }

        // Parse SIP uri parameters.
        let mut user_param: Option<ArcStr> = None;
        let mut method_param: Option<ArcStr> = None;
        let mut transport_param: Option<ArcStr> = None;
        let mut ttl_param: Option<ArcStr> = None;
        let mut maddr_param: Option<ArcStr> = None;

        let mut params = crate::macros::parse_param!(
            self,
            parse_uri_param,
            USER_PARAM = user_param,
            METHOD_PARAM = method_param,
            TRANSPORT_PARAM = transport_param,
            TTL_PARAM = ttl_param,
            MADDR_PARAM = maddr_param
        );

        // The valueless `lr` flag has to be fished out of the generic
        // parameters.
        let lr_param = match &mut params {
            Some(p) if p.has(LR_PARAM) => {
                p.remove_all(LR_PARAM);
                true
            }
            _ => false,
        };
        let params = params.filter(|p| !p.is_empty());

        let transport_param = transport_param.map(|s| s.as_str().into());
        let ttl_param = ttl_param.and_then(|ttl| ttl.parse().ok());
        let method_param = method_param.map(|p| p.as_str().as_bytes().into());
        let maddr_param = maddr_param.and_then(|m| m.parse().ok());

        let hdr_params = if self.scanner.consume_if(|b| b == b'?').is_some() {
            // The uri has header parameters.
            Some(self.parse_header_params_in_sip_uri()?)
        } else {
            None
        };

        Ok(Uri {
            scheme,
            user,
            host_port,
            user_param,
            method_param,
            transport_param,
            ttl_param,
            lr_param,
            maddr_param,
            parameters: params,
            headers: hdr_params,
        })
    }

    fn parse_header_params_in_sip_uri(&mut self) -> Result<UriHeaders> {
        let mut params = crate::message::Parameters::new();

        loop {
            let param = unsafe { self.parse_param_unchecked(is_hdr) }?;
            params.push(param);

            if self.scanner.consume_if(|b| b == b'&').is_none() {
                break;
            }
        }
        Ok(params.into())
    }

    // Parse start line.
    fn parse_start_line(&mut self) -> Result<SipMsg> {
        // Might be enough for most messages.
        let probable_number_of_headers = 10;

        if self.scanner.starts_with(B_SIPV2) {
            // Is an status line, e.g, "SIP/2.0 200 OK".
            let status_line = self.parse_status_line()?;
            let headers = Headers::with_capacity(probable_number_of_headers);

            Ok(SipMsg::Response(Response {
                status_line,
                headers,
                body: None,
            }))
        } else {
            // Is an request line, e.g, "OPTIONS sip:localhost SIP/2.0".
            let req_line = self.parse_request_line()?;
            let headers = Headers::with_capacity(probable_number_of_headers);

            Ok(SipMsg::Request(Request {
                req_line,
                headers,
                body: None,
            }))
        }
    }

    fn parse_display_name(&mut self) -> Result<Option<&'buf str>> {
        match self.scanner.lookahead()? {
            b'"' => {
                self.advance(); // consume '"'
                let name = self.scanner.read_while(|b| b != b'"');
                self.advance(); // consume closing '"'
                Ok(Some(str::from_utf8(name)?))
            }
            b'<' => Ok(None), // no display name
            _ => {
                let name = self.scanner.read_while(|b| b != b'<' && !is_newline(b));
                let name = str::from_utf8(name)?.trim_end();
                Ok((!name.is_empty()).then_some(name))
            }
        }
    }

    #[inline]
    pub(crate) fn parse_token(&mut self) -> Result<&'buf str> {
        if self.scanner.consume_if(|b| b == b'"').is_some() {
            let value = self.scanner.read_while(|b| b != b'"');
            self.advance();

            Ok(str::from_utf8(value)?)
        } else {
            // is_token ensures that the bytes are valid UTF-8
            Ok(self.read_token_str())
        }
    }

    // Parse a `name-addr` or a bare `addr-spec`.
    pub(crate) fn parse_sip_addr(&mut self, parse_params: bool) -> Result<SipAddr> {
        self.take_ws();

        let rem = self.scanner.remaining();
        let bare_uri = rem.len() >= 4 && rem[..4].eq_ignore_ascii_case(b"sip:")
            || rem.len() >= 5 && rem[..5].eq_ignore_ascii_case(b"sips:");

        if bare_uri {
            let uri = self.parse_uri(parse_params)?;
            Ok(SipAddr::Uri(uri))
        } else {
            let addr = self.parse_name_addr()?;
            Ok(SipAddr::NameAddr(addr))
        }
    }

    #[inline]
    pub(crate) fn advance(&mut self) -> Option<u8> {
        self.scanner.next()
    }

    #[inline]
    pub(crate) fn read_until_byte(&mut self, byte: u8) -> &'buf [u8] {
        self.scanner.take_until(byte)
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<&u8> {
        self.scanner.peek()
    }

    #[inline]
    pub(crate) fn must_read(&mut self, b: u8) -> Result<()> {
        Ok(self.scanner.must_read(b)?)
    }

    #[inline]
    pub(crate) fn position(&self) -> &Position {
        self.scanner.position()
    }

    #[inline]
    pub(crate) fn remaining(&self) -> &[u8] {
        self.scanner.remaining()
    }

    #[inline]
    pub(crate) fn is_next_newline(&self) -> bool {
        self.scanner.cur_is_some_and(is_newline)
    }

    #[inline]
    pub(crate) fn parse_u32(&mut self) -> Result<u32> {
        Ok(self.scanner.read_u32()?)
    }

    pub(crate) fn parse_name_addr(&mut self) -> Result<NameAddr> {
        self.take_ws();
        let display = self.parse_display_name()?;
        self.take_ws();

        // must be an '<'
        let Some(b'<') = self.scanner.next() else {
            return self.parse_error(Field::Uri, "Expected '<' in NameAddr!");
        };

        let uri = self.parse_uri(true)?;

        // must be an '>'
        let Some(b'>') = self.scanner.next() else {
            return self.parse_error(Field::Uri, "Expected '>' in NameAddr!");
        };

        Ok(NameAddr {
            display: display.map(|d| d.into()),
            uri,
        })
    }

    pub(crate) unsafe fn parse_param_unchecked<F>(&mut self, func: F) -> Result<Parameter>
    where
        F: Fn(u8) -> bool,
    {
        self.take_ws();

        let name = unsafe { self.scanner.read_as_str(&func) };

        let Some(b'=') = self.scanner.peek() else {
            return Ok(Parameter::new(name, None));
        };

        self.advance();

        let value = if self.scanner.consume_if(|b| b == b'"').is_some() {
            let value = self.scanner.read_while(|b| b != b'"');
            self.advance();

            str::from_utf8(value)?
        } else {
            unsafe { self.scanner.read_as_str(func) }
        };

        Ok(Parameter::new(name, Some(value)))
    }

    // Parse parameter (";" pname ["=" pvalue]).
    pub(crate) fn parse_param(&mut self) -> Result<Parameter> {
        unsafe { self.parse_param_unchecked(is_token) }
    }

    #[inline]
    fn read_user_str(&mut self) -> &'buf str {
        unsafe { self.scanner.read_as_str(is_user) }
    }

    #[inline]
    fn read_pass_str(&mut self) -> &'buf str {
        unsafe { self.scanner.read_as_str(is_pass) }
    }

    #[inline]
    fn read_host_str(&mut self) -> &'buf str {
        unsafe { self.scanner.read_as_str(is_host) }
    }

    #[inline]
    fn read_token_str(&mut self) -> &'buf str {
        unsafe { self.scanner.read_as_str(is_token) }
    }
}
