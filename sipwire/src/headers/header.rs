use enum_as_inner::EnumAsInner;
use std::fmt;

use sipwire_util::ArcStr;

use crate::headers::*;

/// A SIP Header.
///
/// This enum contains the SIP headers handled by this crate; headers
/// outside that set are kept verbatim in [`Header::Other`].
#[derive(Debug, PartialEq, EnumAsInner, Clone)]
pub enum Header {
    /// `Via` Header
    Via(Via),
    /// `Route` Header
    Route(Route),
    /// `Record-Route` Header
    RecordRoute(RecordRoute),
    /// `From` Header
    From(From),
    /// `To` Header
    To(To),
    /// `Call-ID` Header
    CallId(CallId),
    /// `CSeq` Header
    CSeq(CSeq),
    /// `Contact` Header
    Contact(Contact),
    /// `Content-Length` Header
    ContentLength(ContentLength),
    /// `Content-Type` Header
    ContentType(ContentType),
    /// `Max-Forwards` Header
    MaxForwards(MaxForwards),
    /// `Expires` Header
    Expires(Expires),
    /// `Proxy-Require` Header
    ProxyRequire(ProxyRequire),
    /// `Proxy-Received-On` Header
    ProxyReceivedOn(ProxyReceivedOn),
    /// `Proxy-Received-From` Header
    ProxyReceivedFrom(ProxyReceivedFrom),
    /// `Proxy-Send-From` Header
    ProxySendFrom(ProxySendFrom),
    /// Other Generic Header
    Other(OtherHeader),
}

/// Other generic Header.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OtherHeader {
    /// Generic Header name
    pub name: ArcStr,
    /// Generic Header value
    pub value: ArcStr,
}

impl OtherHeader {
    /// Creates a generic header from a name and value.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for OtherHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

macro_rules! impl_header_display {
    ( $($variant:ident),* $(,)? ) => {
        impl fmt::Display for Header {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( Header::$variant(inner) => inner.fmt(f), )*
                }
            }
        }
    };
}

impl_header_display!(
    Via,
    Route,
    RecordRoute,
    From,
    To,
    CallId,
    CSeq,
    Contact,
    ContentLength,
    ContentType,
    MaxForwards,
    Expires,
    ProxyRequire,
    ProxyReceivedOn,
    ProxyReceivedFrom,
    ProxySendFrom,
    Other,
);
