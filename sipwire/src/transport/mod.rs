#![warn(missing_docs)]
//! SIP transport seam.
//!
//! The byte-stream framer plus the narrow types the dialog layer uses to
//! hand requests to a transport implementation. Actual socket handling
//! lives outside this crate.

use std::time::SystemTime;

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::message::{Endpoint, Request};

mod decoder;

pub use decoder::{frame_buffer, FrameOutcome, Framed, StreamingDecoder};

/// The number of bytes a single SIP message may not exceed by default.
pub const MAX_RECEIVE_LENGTH: usize = 20480;

/// Returns `true` for the byte sequences NAT keep-alives are typically
/// made of: `CRLF`, `CRLFCRLF`, `jaK\0`, `png` and four NUL bytes.
pub fn is_ping(buf: &[u8]) -> bool {
    matches!(buf, b"\r\n" | b"\r\n\r\n" | b"jaK\0" | b"png" | b"\0\0\0\0")
}

/// Represents the raw binary content of a message or data block.
///
/// Commonly used for message bodies or framed network packets.
#[derive(Debug, Clone)]
pub struct Payload(Bytes);

impl Payload {
    /// Creates a new `Payload`.
    #[inline]
    pub fn new(bytes: Bytes) -> Self {
        Payload(bytes)
    }

    /// Returns the raw byte buffer of this payload.
    pub fn buf(&self) -> &[u8] {
        &self.0
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the payload holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// This type represents a received SIP packet.
#[derive(Debug, Clone)]
pub struct Packet {
    /// The packet payload.
    pub payload: Payload,
    /// The remote endpoint the packet came from.
    pub remote: Endpoint,
    /// The local endpoint the packet arrived on, when known.
    pub local: Option<Endpoint>,
    /// The time the packet was received.
    pub time: SystemTime,
}

impl Packet {
    /// Creates a `Packet` received now.
    pub fn new(payload: Payload, remote: Endpoint, local: Option<Endpoint>) -> Self {
        Self {
            payload,
            remote,
            local,
            time: SystemTime::now(),
        }
    }
}

/// An outbound request together with its destination hint.
#[derive(Debug)]
pub struct OutgoingRequest {
    /// The SIP request message.
    pub request: Request,
    /// Where to send the request; `None` means the transport derives the
    /// destination from the request URI.
    pub destination: Option<Endpoint>,
    /// The serialized message, when already rendered.
    pub buf: Option<Bytes>,
}

/// The channel half the dialog layer uses to hand requests to the
/// transport. Sending never blocks; a closed channel surfaces as
/// [`Error::ChannelClosed`](crate::Error::ChannelClosed).
pub type TransportSender = mpsc::UnboundedSender<OutgoingRequest>;

/// The receiving half consumed by transport implementations.
pub type TransportReceiver = mpsc::UnboundedReceiver<OutgoingRequest>;
