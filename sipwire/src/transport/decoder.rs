use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::Decoder;

use super::{is_ping, Payload, MAX_RECEIVE_LENGTH};
use crate::error::{Error, Result};
use crate::headers::{ContentLength, SipHeaderParse};

/// The outcome of a framing attempt over a caller-owned buffer.
#[derive(Debug)]
pub enum FrameOutcome {
    /// One complete message was framed.
    Message(Framed),
    /// The buffer does not yet hold a complete message.
    Partial {
        /// Leading junk bytes the caller should discard anyway.
        skipped: usize,
    },
}

/// One framed SIP message copied out of the receive buffer.
#[derive(Debug)]
pub struct Framed {
    /// The message bytes, exactly one SIP message.
    pub data: Bytes,
    /// Leading junk bytes discarded before the message.
    pub skipped: usize,
    /// Total bytes consumed from the buffer, junk included.
    pub consumed: usize,
}

/// Frames one SIP message out of `src` without consuming past it.
///
/// Leading bytes below ASCII `A` (keep-alive CRLFs, NUL padding and the
/// like) are skipped and reported in the outcome so the caller can
/// advance its read pointer. The message boundary is the header block,
/// the blank line, and as many body bytes as Content-Length announces
/// (both the long and the compact `l` form are recognised; a missing
/// header means an empty body). A message longer than `max_len` is
/// rejected with a recoverable [`Error::Framing`].
pub fn frame_buffer(src: &[u8], max_len: usize) -> Result<FrameOutcome> {
    let skipped = src.iter().take_while(|&&b| b < b'A').count();
    let src = &src[skipped..];

    if src.is_empty() {
        return Ok(FrameOutcome::Partial { skipped });
    }

    let Some(pos) = find_subslice(src, b"\r\n\r\n") else {
        if src.len() > max_len {
            return Err(Error::Framing {
                len: src.len(),
                max: max_len,
            });
        }
        return Ok(FrameOutcome::Partial { skipped });
    };
    let body_start = pos + 4;

    if find_subslice(&src[..body_start], b"SIP").is_none() {
        return Err(Error::NoSipString);
    }

    let content_length = scan_content_length(&src[..body_start]);
    let total = body_start + content_length;
    if total > max_len {
        return Err(Error::Framing {
            len: total,
            max: max_len,
        });
    }
    if src.len() < total {
        return Ok(FrameOutcome::Partial { skipped });
    }

    Ok(FrameOutcome::Message(Framed {
        data: Bytes::copy_from_slice(&src[..total]),
        skipped,
        consumed: skipped + total,
    }))
}

// Find the Content-Length header inside a raw header block. Whitespace
// before the ':' and the compact `l` form are tolerated.
fn scan_content_length(hdr: &[u8]) -> usize {
    for line in hdr.split(|&b| b == b'\n') {
        let mut split = line.splitn(2, |&c| c == b':');
        let Some(name) = split.next() else {
            continue;
        };
        if !ContentLength::matches_name(name.trim_ascii()) {
            continue;
        }
        let Some(value) = split.next() else {
            continue;
        };
        let Ok(value_str) = std::str::from_utf8(value) else {
            continue;
        };
        if let Ok(parsed_value) = value_str.trim().parse::<usize>() {
            return parsed_value;
        }
    }
    0
}

fn find_subslice(src: &[u8], buf: &[u8]) -> Option<usize> {
    src.windows(buf.len()).position(|w| w == buf)
}

/// Frames SIP messages out of a reliable byte stream.
///
/// A [`Decoder`] for use with `FramedRead`; keep-alive pings and junk
/// bytes are skipped silently, oversized messages are dropped with an
/// error after clearing the buffer so the transport can stay open.
#[derive(Debug)]
pub struct StreamingDecoder {
    max_len: usize,
}

impl StreamingDecoder {
    /// Creates a decoder with an explicit message size cap.
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl Default for StreamingDecoder {
    fn default() -> Self {
        Self::new(MAX_RECEIVE_LENGTH)
    }
}

impl Decoder for StreamingDecoder {
    type Error = Error;
    type Item = Payload;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        // Check if is keep-alive.
        if is_ping(src) {
            src.advance(src.len());
            return Ok(None);
        }

        match frame_buffer(src, self.max_len) {
            Ok(FrameOutcome::Message(framed)) => {
                src.advance(framed.consumed);
                Ok(Some(Payload::new(framed.data)))
            }
            Ok(FrameOutcome::Partial { skipped }) => {
                src.advance(skipped);
                Ok(None)
            }
            Err(err) => {
                log::warn!("dropping unframeable input: {err}");
                src.advance(src.len());
                Err(err)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None => {
                // A truncated trailing message is dropped when the
                // stream ends.
                if !src.is_empty() {
                    log::debug!("discarding {} trailing bytes at end of stream", src.len());
                    src.advance(src.len());
                }
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;
    use tokio_util::codec::FramedRead;

    use super::*;

    const MESSAGE_NO_BODY: &[u8] = b"OPTIONS sip:carol@chicago.example.com SIP/2.0\r\n\
        Via: SIP/2.0/UDP pc33.atlanta.example.com;branch=z9hG4bKhjhs8ass877\r\n\
        Content-Length: 0\r\n\r\n";

    const MESSAGE_WITH_BODY: &[u8] = b"MESSAGE sip:bob@biloxi.example.com SIP/2.0\r\n\
        Via: SIP/2.0/TCP client.atlanta.example.com;branch=z9hG4bK776s\r\n\
        l: 5\r\n\r\nhello";

    #[test]
    fn test_is_ping() {
        assert!(is_ping(b"\r\n"));
        assert!(is_ping(b"\r\n\r\n"));
        assert!(is_ping(b"jaK\0"));
        assert!(is_ping(b"png"));
        assert!(is_ping(b"\0\0\0\0"));
        assert!(!is_ping(b"INVITE"));
    }

    #[test]
    fn test_skips_leading_junk_and_frames() {
        let mut buf = Vec::from(&b"\r\n"[..]);
        buf.extend_from_slice(MESSAGE_NO_BODY);

        let outcome = frame_buffer(&buf, MAX_RECEIVE_LENGTH).unwrap();
        assert_matches!(outcome, FrameOutcome::Message(framed) => {
            assert_eq!(framed.skipped, 2);
            assert_eq!(framed.data.as_ref(), MESSAGE_NO_BODY);
            assert_eq!(framed.consumed, 2 + MESSAGE_NO_BODY.len());
        });
    }

    #[test]
    fn test_partial_buffer_needs_more_data() {
        let outcome = frame_buffer(&MESSAGE_WITH_BODY[..20], MAX_RECEIVE_LENGTH).unwrap();
        assert_matches!(outcome, FrameOutcome::Partial { skipped: 0 });

        // Header block complete but the body is short one byte.
        let short = &MESSAGE_WITH_BODY[..MESSAGE_WITH_BODY.len() - 1];
        let outcome = frame_buffer(short, MAX_RECEIVE_LENGTH).unwrap();
        assert_matches!(outcome, FrameOutcome::Partial { skipped: 0 });
    }

    #[test]
    fn test_compact_content_length_sizes_the_body() {
        let outcome = frame_buffer(MESSAGE_WITH_BODY, MAX_RECEIVE_LENGTH).unwrap();
        assert_matches!(outcome, FrameOutcome::Message(framed) => {
            assert!(framed.data.ends_with(b"hello"));
            assert_eq!(framed.consumed, MESSAGE_WITH_BODY.len());
        });
    }

    #[test]
    fn test_oversized_message_is_a_framing_error() {
        let err = frame_buffer(MESSAGE_WITH_BODY, 16).unwrap_err();
        assert_matches!(err, Error::Framing { .. });
    }

    #[test]
    fn test_non_sip_input_is_rejected() {
        let err = frame_buffer(b"GARBAGE nothing here\r\n\r\n", MAX_RECEIVE_LENGTH).unwrap_err();
        assert_matches!(err, Error::NoSipString);
    }

    #[test]
    fn test_framer_never_consumes_past_one_message() {
        let mut buf = Vec::from(MESSAGE_NO_BODY);
        buf.extend_from_slice(MESSAGE_WITH_BODY);

        let outcome = frame_buffer(&buf, MAX_RECEIVE_LENGTH).unwrap();
        assert_matches!(outcome, FrameOutcome::Message(framed) => {
            assert_eq!(framed.consumed, MESSAGE_NO_BODY.len());
        });
    }

    #[tokio::test]
    async fn test_streaming_decoder_yields_messages_in_order() {
        // CRLF keep-alive, a message without body, a message with body,
        // then the first bytes of a third message.
        let mut stream = Vec::from(&b"\r\n"[..]);
        stream.extend_from_slice(MESSAGE_NO_BODY);
        stream.extend_from_slice(MESSAGE_WITH_BODY);
        stream.extend_from_slice(&MESSAGE_NO_BODY[..10]);

        let mut reader = FramedRead::new(&stream[..], StreamingDecoder::default());

        let first = reader.next().await.unwrap().unwrap();
        assert_eq!(first.buf(), MESSAGE_NO_BODY);

        let second = reader.next().await.unwrap().unwrap();
        assert_eq!(second.buf(), MESSAGE_WITH_BODY);

        // The partial third message never completes; the stream ends.
        assert!(reader.next().await.is_none());
    }
}
