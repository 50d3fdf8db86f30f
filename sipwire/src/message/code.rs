use std::fmt;

/// An SIP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// `Trying` status code (100).
    Trying,
    /// `Ringing` status code (180).
    Ringing,
    /// `Call Is Being Forwarded` status code (181).
    CallIsBeingForwarded,
    /// `Queued` status code (182).
    Queued,
    /// `Session Progress` status code (183).
    SessionProgress,
    /// `OK` status code (200).
    Ok,
    /// `Accepted` status code (202).
    Accepted,
    /// `Multiple Choices` status code (300).
    MultipleChoices,
    /// `Moved Permanently` status code (301).
    MovedPermanently,
    /// `Moved Temporarily` status code (302).
    MovedTemporarily,
    /// `Use Proxy` status code (305).
    UseProxy,
    /// `Alternative Service` status code (380).
    AlternativeService,
    /// `Bad Request` status code (400).
    BadRequest,
    /// `Unauthorized` status code (401).
    Unauthorized,
    /// `Payment Required` status code (402).
    PaymentRequired,
    /// `Forbidden` status code (403).
    Forbidden,
    /// `Not Found` status code (404).
    NotFound,
    /// `Method Not Allowed` status code (405).
    MethodNotAllowed,
    /// `Not Acceptable` status code (406).
    NotAcceptable,
    /// `Proxy Authentication Required` status code (407).
    ProxyAuthenticationRequired,
    /// `Request Timeout` status code (408).
    RequestTimeout,
    /// `Gone` status code (410).
    Gone,
    /// `Request Entity Too Large` status code (413).
    RequestEntityTooLarge,
    /// `Request-URI Too Long` status code (414).
    RequestUriTooLong,
    /// `Unsupported Media Type` status code (415).
    UnsupportedMediaType,
    /// `Unsupported URI Scheme` status code (416).
    UnsupportedUriScheme,
    /// `Bad Extension` status code (420).
    BadExtension,
    /// `Extension Required` status code (421).
    ExtensionRequired,
    /// `Interval Too Brief` status code (423).
    IntervalTooBrief,
    /// `Temporarily Unavailable` status code (480).
    TemporarilyUnavailable,
    /// `Call/Transaction Does Not Exist` status code (481).
    CallOrTransactionDoesNotExist,
    /// `Loop Detected` status code (482).
    LoopDetected,
    /// `Too Many Hops` status code (483).
    TooManyHops,
    /// `Address Incomplete` status code (484).
    AddressIncomplete,
    /// `Ambiguous` status code (485).
    Ambiguous,
    /// `Busy Here` status code (486).
    BusyHere,
    /// `Request Terminated` status code (487).
    RequestTerminated,
    /// `Not Acceptable Here` status code (488).
    NotAcceptableHere,
    /// `Request Pending` status code (491).
    RequestPending,
    /// `Undecipherable` status code (493).
    Undecipherable,
    /// `Server Internal Error` status code (500).
    ServerInternalError,
    /// `Not Implemented` status code (501).
    NotImplemented,
    /// `Bad Gateway` status code (502).
    BadGateway,
    /// `Service Unavailable` status code (503).
    ServiceUnavailable,
    /// `Server Time-out` status code (504).
    ServerTimeout,
    /// `Version Not Supported` status code (505).
    VersionNotSupported,
    /// `Message Too Large` status code (513).
    MessageTooLarge,
    /// `Busy Everywhere` status code (600).
    BusyEverywhere,
    /// `Decline` status code (603).
    Decline,
    /// `Does Not Exist Anywhere` status code (604).
    DoesNotExistAnywhere,
    /// `Not Acceptable` status code (606).
    NotAcceptableAnywhere,
    /// A status code outside the set above, kept as received.
    Other(i32),
}

impl StatusCode {
    /// Returns the numeric code.
    pub const fn into_i32(self) -> i32 {
        match self {
            StatusCode::Trying => 100,
            StatusCode::Ringing => 180,
            StatusCode::CallIsBeingForwarded => 181,
            StatusCode::Queued => 182,
            StatusCode::SessionProgress => 183,
            StatusCode::Ok => 200,
            StatusCode::Accepted => 202,
            StatusCode::MultipleChoices => 300,
            StatusCode::MovedPermanently => 301,
            StatusCode::MovedTemporarily => 302,
            StatusCode::UseProxy => 305,
            StatusCode::AlternativeService => 380,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::PaymentRequired => 402,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::NotAcceptable => 406,
            StatusCode::ProxyAuthenticationRequired => 407,
            StatusCode::RequestTimeout => 408,
            StatusCode::Gone => 410,
            StatusCode::RequestEntityTooLarge => 413,
            StatusCode::RequestUriTooLong => 414,
            StatusCode::UnsupportedMediaType => 415,
            StatusCode::UnsupportedUriScheme => 416,
            StatusCode::BadExtension => 420,
            StatusCode::ExtensionRequired => 421,
            StatusCode::IntervalTooBrief => 423,
            StatusCode::TemporarilyUnavailable => 480,
            StatusCode::CallOrTransactionDoesNotExist => 481,
            StatusCode::LoopDetected => 482,
            StatusCode::TooManyHops => 483,
            StatusCode::AddressIncomplete => 484,
            StatusCode::Ambiguous => 485,
            StatusCode::BusyHere => 486,
            StatusCode::RequestTerminated => 487,
            StatusCode::NotAcceptableHere => 488,
            StatusCode::RequestPending => 491,
            StatusCode::Undecipherable => 493,
            StatusCode::ServerInternalError => 500,
            StatusCode::NotImplemented => 501,
            StatusCode::BadGateway => 502,
            StatusCode::ServiceUnavailable => 503,
            StatusCode::ServerTimeout => 504,
            StatusCode::VersionNotSupported => 505,
            StatusCode::MessageTooLarge => 513,
            StatusCode::BusyEverywhere => 600,
            StatusCode::Decline => 603,
            StatusCode::DoesNotExistAnywhere => 604,
            StatusCode::NotAcceptableAnywhere => 606,
            StatusCode::Other(code) => code,
        }
    }

    /// Returns the default reason phrase for this status code.
    ///
    /// [`StatusCode::Other`] codes have no registered phrase and yield an
    /// empty string.
    pub const fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Trying => "Trying",
            StatusCode::Ringing => "Ringing",
            StatusCode::CallIsBeingForwarded => "Call Is Being Forwarded",
            StatusCode::Queued => "Queued",
            StatusCode::SessionProgress => "Session Progress",
            StatusCode::Ok => "OK",
            StatusCode::Accepted => "Accepted",
            StatusCode::MultipleChoices => "Multiple Choices",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::MovedTemporarily => "Moved Temporarily",
            StatusCode::UseProxy => "Use Proxy",
            StatusCode::AlternativeService => "Alternative Service",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::PaymentRequired => "Payment Required",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::NotAcceptable => "Not Acceptable",
            StatusCode::ProxyAuthenticationRequired => "Proxy Authentication Required",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::Gone => "Gone",
            StatusCode::RequestEntityTooLarge => "Request Entity Too Large",
            StatusCode::RequestUriTooLong => "Request-URI Too Long",
            StatusCode::UnsupportedMediaType => "Unsupported Media Type",
            StatusCode::UnsupportedUriScheme => "Unsupported URI Scheme",
            StatusCode::BadExtension => "Bad Extension",
            StatusCode::ExtensionRequired => "Extension Required",
            StatusCode::IntervalTooBrief => "Interval Too Brief",
            StatusCode::TemporarilyUnavailable => "Temporarily Unavailable",
            StatusCode::CallOrTransactionDoesNotExist => "Call/Transaction Does Not Exist",
            StatusCode::LoopDetected => "Loop Detected",
            StatusCode::TooManyHops => "Too Many Hops",
            StatusCode::AddressIncomplete => "Address Incomplete",
            StatusCode::Ambiguous => "Ambiguous",
            StatusCode::BusyHere => "Busy Here",
            StatusCode::RequestTerminated => "Request Terminated",
            StatusCode::NotAcceptableHere => "Not Acceptable Here",
            StatusCode::RequestPending => "Request Pending",
            StatusCode::Undecipherable => "Undecipherable",
            StatusCode::ServerInternalError => "Server Internal Error",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::BadGateway => "Bad Gateway",
            StatusCode::ServiceUnavailable => "Service Unavailable",
            StatusCode::ServerTimeout => "Server Time-out",
            StatusCode::VersionNotSupported => "Version Not Supported",
            StatusCode::MessageTooLarge => "Message Too Large",
            StatusCode::BusyEverywhere => "Busy Everywhere",
            StatusCode::Decline => "Decline",
            StatusCode::DoesNotExistAnywhere => "Does Not Exist Anywhere",
            StatusCode::NotAcceptableAnywhere => "Not Acceptable",
            StatusCode::Other(_) => "",
        }
    }

    /// Returns `true` for 1xx codes.
    pub const fn is_provisional(&self) -> bool {
        let code = self.into_i32();
        code >= 100 && code < 200
    }

    /// Returns `true` for 2xx..6xx codes.
    pub const fn is_final(&self) -> bool {
        self.into_i32() >= 200
    }

    /// Returns `true` for 2xx codes.
    pub const fn is_success(&self) -> bool {
        let code = self.into_i32();
        code >= 200 && code < 300
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        match code {
            100 => StatusCode::Trying,
            180 => StatusCode::Ringing,
            181 => StatusCode::CallIsBeingForwarded,
            182 => StatusCode::Queued,
            183 => StatusCode::SessionProgress,
            200 => StatusCode::Ok,
            202 => StatusCode::Accepted,
            300 => StatusCode::MultipleChoices,
            301 => StatusCode::MovedPermanently,
            302 => StatusCode::MovedTemporarily,
            305 => StatusCode::UseProxy,
            380 => StatusCode::AlternativeService,
            400 => StatusCode::BadRequest,
            401 => StatusCode::Unauthorized,
            402 => StatusCode::PaymentRequired,
            403 => StatusCode::Forbidden,
            404 => StatusCode::NotFound,
            405 => StatusCode::MethodNotAllowed,
            406 => StatusCode::NotAcceptable,
            407 => StatusCode::ProxyAuthenticationRequired,
            408 => StatusCode::RequestTimeout,
            410 => StatusCode::Gone,
            413 => StatusCode::RequestEntityTooLarge,
            414 => StatusCode::RequestUriTooLong,
            415 => StatusCode::UnsupportedMediaType,
            416 => StatusCode::UnsupportedUriScheme,
            420 => StatusCode::BadExtension,
            421 => StatusCode::ExtensionRequired,
            423 => StatusCode::IntervalTooBrief,
            480 => StatusCode::TemporarilyUnavailable,
            481 => StatusCode::CallOrTransactionDoesNotExist,
            482 => StatusCode::LoopDetected,
            483 => StatusCode::TooManyHops,
            484 => StatusCode::AddressIncomplete,
            485 => StatusCode::Ambiguous,
            486 => StatusCode::BusyHere,
            487 => StatusCode::RequestTerminated,
            488 => StatusCode::NotAcceptableHere,
            491 => StatusCode::RequestPending,
            493 => StatusCode::Undecipherable,
            500 => StatusCode::ServerInternalError,
            501 => StatusCode::NotImplemented,
            502 => StatusCode::BadGateway,
            503 => StatusCode::ServiceUnavailable,
            504 => StatusCode::ServerTimeout,
            505 => StatusCode::VersionNotSupported,
            513 => StatusCode::MessageTooLarge,
            600 => StatusCode::BusyEverywhere,
            603 => StatusCode::Decline,
            604 => StatusCode::DoesNotExistAnywhere,
            606 => StatusCode::NotAcceptableAnywhere,
            other => StatusCode::Other(other),
        }
    }
}

impl From<&[u8]> for StatusCode {
    fn from(digits: &[u8]) -> Self {
        let mut code = 0i32;
        for &b in digits {
            if !b.is_ascii_digit() {
                return StatusCode::Other(0);
            }
            code = code * 10 + (b - b'0') as i32;
        }
        code.into()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_i32() {
        assert_eq!(StatusCode::from(200), StatusCode::Ok);
        assert_eq!(StatusCode::Ok.into_i32(), 200);
        assert_eq!(StatusCode::from(299), StatusCode::Other(299));
        assert_eq!(StatusCode::Other(299).into_i32(), 299);
    }

    #[test]
    fn test_classes() {
        assert!(StatusCode::Ringing.is_provisional());
        assert!(StatusCode::Ok.is_success());
        assert!(StatusCode::Ok.is_final());
        assert!(StatusCode::BusyHere.is_final());
        assert!(!StatusCode::Trying.is_final());
    }

    #[test]
    fn test_from_digits() {
        assert_eq!(StatusCode::from(&b"180"[..]), StatusCode::Ringing);
        assert_eq!(StatusCode::from(&b"486"[..]), StatusCode::BusyHere);
    }
}
