use std::fmt;
use std::str::FromStr;

use sipwire_util::ArcStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// An SIP Method.
///
/// This enum declares SIP methods as described by RFC3261 and others.
/// Methods outside that set are preserved verbatim in the
/// [`Method::Unknown`] variant so that round-tripping a message keeps
/// their spelling.
pub enum Method {
    /// SIP INVITE Method.
    Invite,
    /// SIP ACK Method.
    Ack,
    /// SIP BYE Method.
    Bye,
    /// SIP CANCEL Method.
    Cancel,
    /// SIP REGISTER Method.
    Register,
    /// SIP OPTIONS Method.
    Options,
    /// SIP INFO Method.
    Info,
    /// SIP NOTIFY Method.
    Notify,
    /// SIP SUBSCRIBE Method.
    Subscribe,
    /// SIP UPDATE Method.
    Update,
    /// SIP REFER Method.
    Refer,
    /// SIP PRACK Method.
    Prack,
    /// SIP MESSAGE Method.
    Message,
    /// SIP PUBLISH Method.
    Publish,
    /// An unknown SIP method, kept as received.
    Unknown(ArcStr),
}

impl Method {
    /// Returns the byte representation of a method.
    pub fn as_bytes(&self) -> &[u8] {
        self.as_str().as_bytes()
    }

    pub fn is_invite(&self) -> bool {
        matches!(self, Self::Invite)
    }

    pub fn is_ack(&self) -> bool {
        matches!(self, Self::Ack)
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Self::Bye)
    }

    /// Returns the string representation of a method.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            Method::Invite => "INVITE",
            Method::Ack => "ACK",
            Method::Bye => "BYE",
            Method::Cancel => "CANCEL",
            Method::Register => "REGISTER",
            Method::Options => "OPTIONS",
            Method::Info => "INFO",
            Method::Notify => "NOTIFY",
            Method::Subscribe => "SUBSCRIBE",
            Method::Update => "UPDATE",
            Method::Refer => "REFER",
            Method::Prack => "PRACK",
            Method::Message => "MESSAGE",
            Method::Publish => "PUBLISH",
            Method::Unknown(name) => name,
        }
    }

    /// Returns `true` if this method can establish a dialog.
    pub const fn can_establish_a_dialog(&self) -> bool {
        matches!(self, Method::Invite | Method::Subscribe)
    }
}

impl From<&[u8]> for Method {
    fn from(value: &[u8]) -> Self {
        match value {
            b"INVITE" => Method::Invite,
            b"CANCEL" => Method::Cancel,
            b"ACK" => Method::Ack,
            b"BYE" => Method::Bye,
            b"REGISTER" => Method::Register,
            b"OPTIONS" => Method::Options,
            b"INFO" => Method::Info,
            b"NOTIFY" => Method::Notify,
            b"SUBSCRIBE" => Method::Subscribe,
            b"UPDATE" => Method::Update,
            b"REFER" => Method::Refer,
            b"PRACK" => Method::Prack,
            b"MESSAGE" => Method::Message,
            b"PUBLISH" => Method::Publish,
            other => Method::Unknown(String::from_utf8_lossy(other).as_ref().into()),
        }
    }
}

impl FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.as_bytes().into())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_method_round_trips() {
        let method = Method::from(&b"WIBBLE"[..]);

        assert_matches!(method, Method::Unknown(ref name) => {
            assert_eq!(name, &"WIBBLE");
        });
        assert_eq!(method.to_string(), "WIBBLE");
    }

    #[test]
    fn test_dialog_establishing_methods() {
        assert!(Method::Invite.can_establish_a_dialog());
        assert!(Method::Subscribe.can_establish_a_dialog());
        assert!(!Method::Bye.can_establish_a_dialog());
    }
}
