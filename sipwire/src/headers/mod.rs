#![warn(missing_docs)]
//! SIP Headers types
//!
//! The module provide the [`Headers`] struct that contains an list of
//! [`Header`] and can be used to manipulate SIP headers.

mod call_id;
mod contact;
mod content_length;
mod content_type;
mod cseq;
mod expires;
mod from;
mod header;
mod max_forwards;
mod proxy_info;
mod proxy_require;
mod record_route;
mod route;
mod to;
mod via;

pub use call_id::CallId;
pub use contact::Contact;
pub use content_length::ContentLength;
pub use content_type::ContentType;
pub use cseq::CSeq;
pub use expires::Expires;
pub use from::From;
pub use header::*;
pub use max_forwards::MaxForwards;
pub use proxy_info::{ProxyReceivedFrom, ProxyReceivedOn, ProxySendFrom};
pub use proxy_require::ProxyRequire;
pub use record_route::RecordRoute;
pub use route::Route;
pub use to::To;
pub use via::{Via, MAGIC_COOKIE};

use core::fmt;
use std::iter::{Filter, FilterMap};
use std::ops::{Index, Range, RangeFrom};

use crate::error::Result;
use crate::parser::Parser;

/// The tag parameter that is used normally in [`From`] and [`To`]
/// headers.
pub(crate) const TAG_PARAM: &str = "tag";

/// The q parameter that is used normally in [`Contact`] headers.
pub(crate) const Q_PARAM: &str = "q";

/// The expires parameter that is used normally in [`Contact`] headers.
pub(crate) const EXPIRES_PARAM: &str = "expires";

/// Trait to parse SIP headers.
///
/// This trait defines how a specific SIP header type can be parsed from a
/// byte slice, as typically received in SIP messages.
pub trait SipHeaderParse: Sized {
    /// The full name of the SIP header (e.g., `"Contact"`).
    const NAME: &'static str;
    /// The abbreviated name of the SIP header, if any (e.g., `"f"` for
    /// `"From"`). Empty when the header has no compact form.
    const SHORT_NAME: &'static str = "";

    /// Checks if the given name matches this header's name or its compact
    /// form, ASCII-case-insensitively.
    fn matches_name(name: &[u8]) -> bool {
        name.eq_ignore_ascii_case(Self::NAME.as_bytes())
            || (!Self::SHORT_NAME.is_empty() && name.eq_ignore_ascii_case(Self::SHORT_NAME.as_bytes()))
    }

    /// Parses this header's value from the given [`Parser`].
    fn parse(parser: &mut Parser<'_>) -> Result<Self>;

    /// Parses this header from a raw byte slice.
    ///
    /// This is a convenience method that creates a [`Parser`] and
    /// delegates to [`SipHeaderParse::parse`].
    fn from_bytes(src: &[u8]) -> Result<Self> {
        Self::parse(&mut Parser::new(src))
    }
}

/// A collection of SIP Headers.
///
/// A wrapper over Vec<[`Header`]> that contains the header list.
/// Insertion order is preserved; serialization emits the well known
/// headers in a stable order (Via, Route, From, To, Call-ID, CSeq,
/// Max-Forwards, Contact, Content-Length, Content-Type) ahead of the
/// rest.
///
/// # Examples
///
/// ```
/// # use sipwire::headers::Headers;
/// # use sipwire::headers::Header;
/// # use sipwire::headers::ContentLength;
/// let mut headers = Headers::new();
/// headers.push(Header::ContentLength(ContentLength::new(10)));
///
/// assert_eq!(headers.len(), 1);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct Headers(Vec<Header>);

impl Headers {
    /// Create a new empty collection of headers.
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Constructs a new, empty collection of `Headers` with at least the
    /// specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Applies function to the headers and return the first non-none
    /// result.
    #[inline]
    pub fn find_map<'a, T, F>(&'a self, f: F) -> Option<&'a T>
    where
        F: Fn(&'a Header) -> Option<&'a T>,
    {
        self.0.iter().find_map(f)
    }

    /// Extends the headers collection with the contents of another.
    #[inline]
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Header>,
    {
        self.0.extend(iter);
    }

    /// Returns an iterator over headers.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.0.iter()
    }

    /// Returns a mutable iterator over headers.
    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, Header> {
        self.0.iter_mut()
    }

    /// Creates an iterator that both filters and maps a header.
    #[inline]
    pub fn filter_map<'a, T: 'a, F>(&'a self, f: F) -> FilterMap<impl Iterator<Item = &'a Header>, F>
    where
        F: FnMut(&'a Header) -> Option<&'a T>,
    {
        self.0.iter().filter_map(f)
    }

    /// Creates an iterator which uses a closure to determine if a header
    /// should be yielded.
    #[inline]
    pub fn filter<F>(&self, f: F) -> Filter<impl Iterator<Item = &Header>, F>
    where
        F: FnMut(&&Header) -> bool,
    {
        self.0.iter().filter(f)
    }

    /// Searches for a header that satisfies a predicate.
    #[inline]
    pub fn find<F>(&self, f: F) -> Option<&Header>
    where
        F: FnMut(&&Header) -> bool,
    {
        self.0.iter().find(f)
    }

    /// Moves all the elements of `other` into `self`, leaving `other`
    /// empty.
    #[inline]
    pub fn append(&mut self, other: &mut Self) {
        self.0.append(&mut other.0);
    }

    /// Push a new header.
    #[inline]
    pub fn push(&mut self, hdr: Header) {
        self.0.push(hdr);
    }

    /// Returns the number of headers in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a reference to a header at the index specified.
    pub fn get(&self, index: usize) -> Option<&Header> {
        self.0.get(index)
    }

    /// Removes the last element and returns it, or `None` if it is
    /// empty.
    #[inline]
    pub fn pop(&mut self) -> Option<Header> {
        self.0.pop()
    }

    /// Returns `true` if the header collection contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the `Call-ID` header if present.
    pub fn call_id(&self) -> Option<&CallId> {
        self.0.iter().find_map(|h| h.as_call_id())
    }

    /// Returns the `CSeq` header if present.
    pub fn cseq(&self) -> Option<&CSeq> {
        self.0.iter().find_map(|h| h.as_c_seq())
    }

    /// Returns the `From` header if present.
    pub fn from_header(&self) -> Option<&From> {
        self.0.iter().find_map(|h| h.as_from())
    }

    /// Returns the `To` header if present.
    pub fn to_header(&self) -> Option<&To> {
        self.0.iter().find_map(|h| h.as_to())
    }

    /// Returns the top-most `Via` header if present.
    pub fn top_via(&self) -> Option<&Via> {
        self.vias().next()
    }

    /// Returns the `Via` headers, top-most first.
    pub fn vias(&self) -> impl Iterator<Item = &Via> {
        self.0.iter().filter_map(|h| h.as_via())
    }

    /// Returns the `Route` headers in order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.0.iter().filter_map(|h| h.as_route())
    }

    /// Returns the `Record-Route` headers in order.
    pub fn record_routes(&self) -> impl Iterator<Item = &RecordRoute> {
        self.0.iter().filter_map(|h| h.as_record_route())
    }

    /// Returns the `Contact` headers in order.
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.0.iter().filter_map(|h| h.as_contact())
    }

    /// Returns the `Content-Length` header if present.
    pub fn content_length(&self) -> Option<&ContentLength> {
        self.0.iter().find_map(|h| h.as_content_length())
    }

    /// Returns the `Content-Type` header if present.
    pub fn content_type(&self) -> Option<&ContentType> {
        self.0.iter().find_map(|h| h.as_content_type())
    }

    /// Returns the `Max-Forwards` header if present.
    pub fn max_forwards(&self) -> Option<&MaxForwards> {
        self.0.iter().find_map(|h| h.as_max_forwards())
    }

    /// Returns the `Expires` header if present.
    pub fn expires(&self) -> Option<&Expires> {
        self.0.iter().find_map(|h| h.as_expires())
    }

    /// Returns the `Proxy-Require` header if present.
    pub fn proxy_require(&self) -> Option<&ProxyRequire> {
        self.0.iter().find_map(|h| h.as_proxy_require())
    }

    /// Returns the `Proxy-Received-On` header if present.
    pub fn proxy_received_on(&self) -> Option<&ProxyReceivedOn> {
        self.0.iter().find_map(|h| h.as_proxy_received_on())
    }

    /// Returns the `Proxy-Received-From` header if present.
    pub fn proxy_received_from(&self) -> Option<&ProxyReceivedFrom> {
        self.0.iter().find_map(|h| h.as_proxy_received_from())
    }

    /// Returns the `Proxy-Send-From` header if present.
    pub fn proxy_send_from(&self) -> Option<&ProxySendFrom> {
        self.0.iter().find_map(|h| h.as_proxy_send_from())
    }
}

impl Index<usize> for Headers {
    type Output = Header;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const N: usize> std::convert::From<[Header; N]> for Headers {
    fn from(array: [Header; N]) -> Self {
        array.into_iter().collect()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<I: IntoIterator<Item = Header>>(iter: I) -> Self {
        let headers: Vec<Header> = iter.into_iter().collect();
        Headers(headers)
    }
}

impl Index<Range<usize>> for Headers {
    type Output = [Header];

    fn index(&self, range: Range<usize>) -> &Self::Output {
        &self.0[range]
    }
}

impl Index<RangeFrom<usize>> for Headers {
    type Output = [Header];

    fn index(&self, range: RangeFrom<usize>) -> &Self::Output {
        &self.0[range]
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn class(hdr: &Header) -> u8 {
            match hdr {
                Header::Via(_) => 0,
                Header::Route(_) => 1,
                Header::From(_) => 2,
                Header::To(_) => 3,
                Header::CallId(_) => 4,
                Header::CSeq(_) => 5,
                Header::MaxForwards(_) => 6,
                Header::Contact(_) => 7,
                Header::ContentLength(_) => 8,
                Header::ContentType(_) => 9,
                _ => 10,
            }
        }

        // Emission order is stable: within each class headers keep their
        // arrival order.
        for current in 0..=10u8 {
            for hdr in self.0.iter().filter(|h| class(h) == current) {
                write!(f, "{hdr}\r\n")?;
            }
        }
        Ok(())
    }
}

impl Default for Headers {
    fn default() -> Self {
        Self::new()
    }
}

impl std::convert::From<Vec<Header>> for Headers {
    fn from(headers: Vec<Header>) -> Self {
        Self(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieves_header_by_index_correctly() {
        let mut headers = Headers::new();

        let clen = ContentLength::new(10);
        let cid = CallId::new("bs9ki9iqbee8k5kal8mpqb");

        headers.push(Header::CallId(cid.clone()));
        headers.push(Header::ContentLength(clen));

        assert_eq!(headers.get(0), Some(&Header::CallId(cid)));
        assert_eq!(headers.get(1), Some(&Header::ContentLength(clen)));

        assert!(headers.get(2).is_none());
    }

    #[test]
    fn test_finds_header_matching_predicate() {
        let clen = ContentLength::new(10);
        let headers = Headers::from([Header::ContentLength(clen)]);
        let header = headers.iter().find(|h| matches!(h, Header::ContentLength(_)));

        assert_eq!(header.unwrap().to_string(), "Content-Length: 10");
    }

    #[test]
    fn test_typed_accessors() {
        let mut headers = Headers::new();
        headers.push(Header::CallId(CallId::new("x7a9")));
        headers.push(Header::ContentLength(ContentLength::new(0)));

        assert_eq!(headers.call_id().unwrap().id(), "x7a9");
        assert_eq!(headers.content_length().unwrap().length(), 0);
        assert!(headers.cseq().is_none());
    }

    #[test]
    fn test_display_emits_stable_order() {
        let mut headers = Headers::new();
        headers.push(Header::ContentLength(ContentLength::new(0)));
        headers.push(Header::CallId(CallId::new("abc")));
        headers.push(Header::Via(Via::from_bytes(b"SIP/2.0/UDP host;branch=z9hG4bK1").unwrap()));

        let out = headers.to_string();
        let via = out.find("Via:").unwrap();
        let call_id = out.find("Call-ID:").unwrap();
        let content_length = out.find("Content-Length:").unwrap();

        assert!(via < call_id);
        assert!(call_id < content_length);
    }

    #[test]
    fn test_appends_headers_from_another_collection() {
        let mut headers1 = Headers::new();
        let mut headers2 = Headers::new();

        headers1.push(Header::Expires(Expires::new(10)));
        headers2.push(Header::ContentLength(ContentLength::new(20)));

        headers1.append(&mut headers2);

        assert_eq!(headers1.len(), 2);
        assert!(headers2.is_empty());
    }

    #[test]
    fn test_filters_headers_by_variant() {
        let mut headers = Headers::new();

        headers.push(Header::Expires(Expires::new(10)));
        headers.push(Header::ContentLength(ContentLength::new(20)));

        let filtered: Vec<_> = headers.filter(|h| matches!(h, Header::Expires(_))).collect();

        assert_eq!(filtered.len(), 1);
        assert!(matches!(filtered[0], Header::Expires(_)));
    }
}
