//! SIP Dialog identity and in-dialog request construction.
//!
//! A dialog is the peer-to-peer relationship identified by
//! `(Call-ID, local tag, remote tag)` that persists across requests.
//!
//! ```text
//! UAC (Caller)                 UAS (Receiver)
//!     |--- INVITE ----------->|    // Request to establish a session
//!     |<--- 180 Ringing ------|    // Indicates ringing (early dialog)
//!     |<--- 200 OK -----------|    // Session accepted, dialog confirmed
//!     |--- ACK -------------->|    // Confirms receipt of 200 OK
//!     |--- BYE -------------->|    // Terminates the session
//!     |<--- 200 OK -----------|    // Confirms termination
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use rand::distr::Alphanumeric;
use rand::Rng;
use sipwire_util::ArcStr;
use tracing::{info, warn};

use crate::error::{Error, Field, Result, ValidationError};
use crate::headers::{CSeq, CallId, ContentLength, From, Header, MaxForwards, ProxySendFrom, Route, To, Via};
use crate::message::{Endpoint, HostPort, Method, Request, Response, SipAddr, StatusCode, Uri};
use crate::transport::{OutgoingRequest, TransportSender};

/// The state of a SIP dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    /// No dialog-establishing response processed yet.
    #[default]
    Unknown,
    /// A provisional response carrying a To tag was processed.
    Early,
    /// A 2xx to the dialog-establishing request was processed.
    Confirmed,
    /// The dialog ended; terminal, no transitions out.
    Terminated,
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogState::Unknown => f.write_str("Unknown"),
            DialogState::Early => f.write_str("Early"),
            DialogState::Confirmed => f.write_str("Confirmed"),
            DialogState::Terminated => f.write_str("Terminated"),
        }
    }
}

/// Which side of the call this dialog represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogDirection {
    /// The dialog was created by a received request (UAS).
    In,
    /// The dialog was created by a request we sent (UAC).
    Out,
    /// Not determined.
    #[default]
    None,
}

/// How call transfers (REFER) are treated for this dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// Transfers are processed normally.
    #[default]
    Default,
    /// Transfers are passed through to the application.
    PassThru,
    /// Transfers are rejected.
    NotAllowed,
    /// A transfer places a new call without consulting the peer.
    BlindPlaceCall,
}

/// Unique identifier of a SIP dialog (Call-ID + local tag + remote tag).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DialogId {
    /// The Call-ID of the dialog.
    pub call_id: CallId,
    /// The tag of the local party.
    pub local_tag: ArcStr,
    /// The tag of the remote party.
    pub remote_tag: ArcStr,
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.call_id.id(), self.local_tag, self.remote_tag)
    }
}

// Opaque application-level fields carried on the dialog but not
// interpreted by it.
#[derive(Debug, Default)]
struct AppData {
    owner: Option<ArcStr>,
    bridge_id: Option<ArcStr>,
    cdr_id: Option<ArcStr>,
    local_sdp: Option<ArcStr>,
    remote_sdp: Option<ArcStr>,
}

struct DialogInner {
    // Unique identifier for the dialog
    id: DialogId,
    // Local party address (From of requests we send)
    local_addr: SipAddr,
    // Remote party address (To of requests we send)
    remote_addr: SipAddr,
    // Ordered list of proxies in-dialog requests traverse, copied from
    // Record-Route at construction
    route_set: Vec<Route>,
    // Where the peer expects in-dialog requests, possibly NAT-rewritten
    remote_target: Uri,
    // Next CSeq to be sent is local_seq + 1
    local_seq: AtomicU32,
    // Highest CSeq observed from the peer
    remote_seq: AtomicU32,
    // Current state of the dialog
    state: Mutex<DialogState>,
    // UAC or UAS
    direction: DialogDirection,
    transfer_mode: Mutex<TransferMode>,
    // Socket the upstream proxy received the call on; replies follow it
    proxy_send_from: Option<Endpoint>,
    app: Mutex<AppData>,
    sender: TransportSender,
}

/// Represents a SIP Dialog.
///
/// The dialog is the one mutable aggregate of this crate: the CSeq
/// counters, state and transfer mode change over its lifetime, everything
/// else is fixed at construction. Clones share the same underlying
/// dialog.
#[derive(Clone)]
pub struct Dialog {
    inner: Arc<DialogInner>,
}

impl Dialog {
    /// Creates a dialog on the receiving side of a dialog-establishing
    /// request, from the request and the 2xx (or provisional) response
    /// sent for it.
    ///
    /// The route set is taken from the response Record-Routes in the
    /// order they arrived; the remote target comes from the request's
    /// first `Contact` (falling back to the request URI) and is rewritten
    /// to `received_from` when it names a private IPv4 host and no
    /// Record-Route is present.
    pub fn new_uas(
        request: &Request,
        response: &Response,
        received_from: Option<&Endpoint>,
        sender: TransportSender,
    ) -> Result<Dialog> {
        let method = request.method();
        if !method.can_establish_a_dialog() {
            return Err(ValidationError::new(Field::Request, format!("{method} cannot establish a dialog")).into());
        }

        let call_id = request.headers.call_id().ok_or(Error::MissingRequiredHeader("Call-ID"))?;
        let to = response.headers.to_header().ok_or(Error::MissingRequiredHeader("To"))?;
        let from = response.headers.from_header().ok_or(Error::MissingRequiredHeader("From"))?;
        let local_tag = to.tag().ok_or(Error::MissingRequiredHeader("To tag"))?;
        let remote_tag = from.tag().ok_or(Error::MissingRequiredHeader("From tag"))?;
        let cseq = request.headers.cseq().ok_or(Error::MissingRequiredHeader("CSeq"))?.cseq();

        // The receiving side traverses the Record-Route set in the order
        // it arrived.
        let route_set: Vec<Route> = response.headers.record_routes().cloned().map(Route::from).collect();

        // An upstream proxy can supply the true source through
        // Proxy-Received-From when the socket address is not ours.
        let received_from = received_from
            .copied()
            .or_else(|| request.headers.proxy_received_from().map(|h| *h.endpoint()));

        let mut remote_target = remote_target_from_request(request);
        if route_set.is_empty() {
            if let Some(received_from) = &received_from {
                if let Some(mangled) = remote_target.mangled(received_from) {
                    info!("rewriting private remote target {} to {}", remote_target, mangled);
                    remote_target = mangled;
                }
            }
        }

        let proxy_send_from = request.headers.proxy_received_on().map(|h| *h.endpoint());

        Ok(Dialog {
            inner: Arc::new(DialogInner {
                id: DialogId {
                    call_id: call_id.clone(),
                    local_tag: local_tag.into(),
                    remote_tag: remote_tag.into(),
                },
                local_addr: to.addr().clone(),
                remote_addr: from.addr().clone(),
                route_set,
                remote_target,
                local_seq: AtomicU32::new(cseq),
                remote_seq: AtomicU32::new(cseq),
                state: Mutex::new(state_for(response.code())),
                direction: DialogDirection::In,
                transfer_mode: Mutex::new(TransferMode::Default),
                proxy_send_from,
                app: Mutex::new(AppData::default()),
                sender,
            }),
        })
    }

    /// Creates a dialog on the calling side, from the request we sent
    /// and the response received for it.
    ///
    /// Mirror of [`Dialog::new_uas`]: local identity comes from `From`,
    /// remote identity from `To`, the remote target from the response's
    /// first `Contact` and the route set from the response Record-Routes
    /// in reverse order.
    pub fn new_uac(request: &Request, response: &Response, sender: TransportSender) -> Result<Dialog> {
        let method = request.method();
        if !method.can_establish_a_dialog() {
            return Err(ValidationError::new(Field::Request, format!("{method} cannot establish a dialog")).into());
        }

        let call_id = request.headers.call_id().ok_or(Error::MissingRequiredHeader("Call-ID"))?;
        let to = response.headers.to_header().ok_or(Error::MissingRequiredHeader("To"))?;
        let from = response.headers.from_header().ok_or(Error::MissingRequiredHeader("From"))?;
        let local_tag = from.tag().ok_or(Error::MissingRequiredHeader("From tag"))?;
        let remote_tag = to.tag().ok_or(Error::MissingRequiredHeader("To tag"))?;
        let cseq = request.headers.cseq().ok_or(Error::MissingRequiredHeader("CSeq"))?.cseq();

        let mut route_set: Vec<Route> = response.headers.record_routes().cloned().map(Route::from).collect();
        route_set.reverse();

        let remote_target = match response.headers.contacts().next() {
            Some(contact) => contact.uri().clone(),
            None => request.uri().clone(),
        };

        let proxy_send_from = response.headers.proxy_received_on().map(|h| *h.endpoint());

        Ok(Dialog {
            inner: Arc::new(DialogInner {
                id: DialogId {
                    call_id: call_id.clone(),
                    local_tag: local_tag.into(),
                    remote_tag: remote_tag.into(),
                },
                local_addr: from.addr().clone(),
                remote_addr: to.addr().clone(),
                route_set,
                remote_target,
                local_seq: AtomicU32::new(cseq),
                remote_seq: AtomicU32::new(0),
                state: Mutex::new(state_for(response.code())),
                direction: DialogDirection::Out,
                transfer_mode: Mutex::new(TransferMode::Default),
                proxy_send_from,
                app: Mutex::new(AppData::default()),
                sender,
            }),
        })
    }

    /// Creates a dialog from an accepted SUBSCRIBE request. The local
    /// tag is supplied by the caller; the route set is the request's
    /// Record-Routes reversed. The remote target comes from the
    /// request's first `Contact` and, as on the UAS path, is rewritten
    /// to `received_from` when it names a private IPv4 host and no
    /// Record-Route is present.
    pub fn new_subscriber(
        request: &Request,
        local_tag: &str,
        received_from: Option<&Endpoint>,
        sender: TransportSender,
    ) -> Result<Dialog> {
        let call_id = request.headers.call_id().ok_or(Error::MissingRequiredHeader("Call-ID"))?;
        let to = request.headers.to_header().ok_or(Error::MissingRequiredHeader("To"))?;
        let from = request.headers.from_header().ok_or(Error::MissingRequiredHeader("From"))?;
        let remote_tag = from.tag().ok_or(Error::MissingRequiredHeader("From tag"))?;
        let cseq = request.headers.cseq().ok_or(Error::MissingRequiredHeader("CSeq"))?.cseq();

        let mut route_set: Vec<Route> = request.headers.record_routes().cloned().map(Route::from).collect();
        route_set.reverse();

        let received_from = received_from
            .copied()
            .or_else(|| request.headers.proxy_received_from().map(|h| *h.endpoint()));

        let mut remote_target = remote_target_from_request(request);
        if route_set.is_empty() {
            if let Some(received_from) = &received_from {
                if let Some(mangled) = remote_target.mangled(received_from) {
                    info!("rewriting private remote target {} to {}", remote_target, mangled);
                    remote_target = mangled;
                }
            }
        }

        Ok(Dialog {
            inner: Arc::new(DialogInner {
                id: DialogId {
                    call_id: call_id.clone(),
                    local_tag: local_tag.into(),
                    remote_tag: remote_tag.into(),
                },
                local_addr: to.addr().clone(),
                remote_addr: from.addr().clone(),
                route_set,
                remote_target,
                local_seq: AtomicU32::new(cseq),
                remote_seq: AtomicU32::new(cseq),
                state: Mutex::new(DialogState::Confirmed),
                direction: DialogDirection::In,
                transfer_mode: Mutex::new(TransferMode::Default),
                proxy_send_from: request.headers.proxy_received_on().map(|h| *h.endpoint()),
                app: Mutex::new(AppData::default()),
                sender,
            }),
        })
    }

    /// Returns the dialog identifier.
    pub fn id(&self) -> &DialogId {
        &self.inner.id
    }

    /// Returns the Call-ID of the dialog.
    pub fn call_id(&self) -> &CallId {
        &self.inner.id.call_id
    }

    /// Returns the tag of the local party.
    pub fn local_tag(&self) -> &str {
        &self.inner.id.local_tag
    }

    /// Returns the tag of the remote party.
    pub fn remote_tag(&self) -> &str {
        &self.inner.id.remote_tag
    }

    /// Returns a snapshot of the dialog state.
    pub fn state(&self) -> DialogState {
        *self.inner.state.lock().unwrap()
    }

    /// Returns which side of the call this dialog represents.
    pub fn direction(&self) -> DialogDirection {
        self.inner.direction
    }

    /// Returns the URI the peer expects in-dialog requests at.
    pub fn remote_target(&self) -> &Uri {
        &self.inner.remote_target
    }

    /// Returns the route set copied at construction.
    pub fn route_set(&self) -> &[Route] {
        &self.inner.route_set
    }

    /// Returns the CSeq of the last request we built.
    pub fn local_seq(&self) -> u32 {
        self.inner.local_seq.load(Ordering::SeqCst)
    }

    /// Returns the highest CSeq observed from the peer.
    pub fn remote_seq(&self) -> u32 {
        self.inner.remote_seq.load(Ordering::SeqCst)
    }

    /// Returns the transfer mode of this dialog.
    pub fn transfer_mode(&self) -> TransferMode {
        *self.inner.transfer_mode.lock().unwrap()
    }

    /// Sets the transfer mode of this dialog.
    pub fn set_transfer_mode(&self, mode: TransferMode) {
        *self.inner.transfer_mode.lock().unwrap() = mode;
    }

    /// Returns the owner assigned by the application, if any.
    pub fn owner(&self) -> Option<ArcStr> {
        self.inner.app.lock().unwrap().owner.clone()
    }

    /// Assigns an application-level owner.
    pub fn set_owner(&self, owner: &str) {
        self.inner.app.lock().unwrap().owner = Some(owner.into());
    }

    /// Returns the bridge identifier, if any.
    pub fn bridge_id(&self) -> Option<ArcStr> {
        self.inner.app.lock().unwrap().bridge_id.clone()
    }

    /// Assigns the bridge identifier.
    pub fn set_bridge_id(&self, bridge_id: &str) {
        self.inner.app.lock().unwrap().bridge_id = Some(bridge_id.into());
    }

    /// Returns the call detail record identifier, if any.
    pub fn cdr_id(&self) -> Option<ArcStr> {
        self.inner.app.lock().unwrap().cdr_id.clone()
    }

    /// Assigns the call detail record identifier.
    pub fn set_cdr_id(&self, cdr_id: &str) {
        self.inner.app.lock().unwrap().cdr_id = Some(cdr_id.into());
    }

    /// Returns the local session description, if any.
    pub fn local_sdp(&self) -> Option<ArcStr> {
        self.inner.app.lock().unwrap().local_sdp.clone()
    }

    /// Stores the local session description; it is not interpreted.
    pub fn set_local_sdp(&self, sdp: &str) {
        self.inner.app.lock().unwrap().local_sdp = Some(sdp.into());
    }

    /// Returns the remote session description, if any.
    pub fn remote_sdp(&self) -> Option<ArcStr> {
        self.inner.app.lock().unwrap().remote_sdp.clone()
    }

    /// Stores the remote session description; it is not interpreted.
    pub fn set_remote_sdp(&self, sdp: &str) {
        self.inner.app.lock().unwrap().remote_sdp = Some(sdp.into());
    }

    /// Builds the next in-dialog request.
    ///
    /// Advances the local CSeq atomically, addresses the request at the
    /// remote target, copies the route set and pushes one fresh `Via` on
    /// top. The transport layer fills in the Via sent-by and branch
    /// before sending (see
    /// [`Request::synthesize_branch`](crate::message::Request::synthesize_branch)).
    pub fn make_request(&self, method: Method) -> Request {
        let cseq = self.inner.local_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let mut request = Request::new(method.clone(), self.inner.remote_target.clone());
        let headers = &mut request.headers;

        headers.push(Header::Via(Via::new(
            self.inner.remote_target.protocol(),
            HostPort::default(),
            None,
        )));
        for route in &self.inner.route_set {
            headers.push(Header::Route(route.clone()));
        }
        headers.push(Header::From(From::with_tag(
            self.inner.local_addr.clone(),
            &self.inner.id.local_tag,
        )));
        headers.push(Header::To(To::with_tag(
            self.inner.remote_addr.clone(),
            &self.inner.id.remote_tag,
        )));
        headers.push(Header::CallId(self.inner.id.call_id.clone()));
        headers.push(Header::CSeq(CSeq::new(cseq, method)));
        headers.push(Header::MaxForwards(MaxForwards::new(70)));
        if let Some(proxy_send_from) = &self.inner.proxy_send_from {
            headers.push(Header::ProxySendFrom(ProxySendFrom::new(*proxy_send_from)));
        }
        headers.push(Header::ContentLength(ContentLength::new(0)));

        request
    }

    /// Delivers an inbound in-dialog request to the dialog.
    ///
    /// The request CSeq must be strictly greater than the highest one
    /// seen so far (replay and reordering protection). A BYE terminates
    /// the dialog.
    pub fn on_in_dialog_request(&self, request: &Request) -> Result<()> {
        let cseq = request.headers.cseq().ok_or(Error::MissingRequiredHeader("CSeq"))?.cseq();

        let current = self.inner.remote_seq.load(Ordering::SeqCst);
        if current != 0 && cseq <= current {
            return Err(ValidationError::new(
                Field::CSeq,
                format!("out of order CSeq {cseq}, highest seen {current}"),
            )
            .into());
        }
        self.inner.remote_seq.store(cseq, Ordering::SeqCst);

        if request.method().is_bye() {
            self.transition(DialogState::Terminated);
        }

        Ok(())
    }

    /// Processes a response to the dialog-establishing request.
    ///
    /// A provisional response with a To tag moves the dialog to `Early`,
    /// a 2xx confirms it and any other final response terminates it.
    pub fn on_response(&self, response: &Response) {
        let has_tag = response.headers.to_header().and_then(|to| to.tag()).is_some();

        if response.code().is_provisional() {
            if has_tag && self.state() == DialogState::Unknown {
                self.transition(DialogState::Early);
            }
            return;
        }
        self.transition(state_for(response.code()));
    }

    /// Tears the dialog down and hands a BYE to the transport.
    ///
    /// The outbound proxy is chosen as: the supplied proxy when it is a
    /// loopback address, else the upstream proxy socket the call arrived
    /// on (re-pointed at the default SIP port), else the supplied proxy.
    /// Send failures are logged and swallowed; the local teardown is
    /// authoritative.
    pub fn hangup(&self, proxy: Option<Endpoint>) {
        self.transition(DialogState::Terminated);

        let bye = self.make_request(Method::Bye);
        let destination = match proxy {
            Some(proxy) if proxy.is_loopback() => Some(proxy),
            _ => match &self.inner.proxy_send_from {
                Some(proxy_send_from) => Some(proxy_send_from.with_default_port()),
                None => proxy,
            },
        };

        let outgoing = OutgoingRequest {
            request: bye,
            destination,
            buf: None,
        };
        if let Err(err) = self.inner.sender.send(outgoing) {
            // The far end will time the call out on its own.
            warn!("failed to hand BYE to the transport: {err}");
        }
    }

    fn transition(&self, next: DialogState) {
        let mut state = self.inner.state.lock().unwrap();
        if *state == DialogState::Terminated || *state == next {
            return;
        }
        info!("dialog {} state {} -> {}", self.inner.id, state, next);
        *state = next;
    }
}

fn state_for(code: StatusCode) -> DialogState {
    if code.is_provisional() {
        DialogState::Early
    } else if code.is_success() {
        DialogState::Confirmed
    } else {
        DialogState::Terminated
    }
}

// The peer's first Contact, falling back to the request URI's transport
// endpoint when none is present.
fn remote_target_from_request(request: &Request) -> Uri {
    match request.headers.contacts().next() {
        Some(contact) => contact.uri().clone(),
        None => match Endpoint::from_uri(request.uri()) {
            Ok(endpoint) => Uri::from_endpoint(&endpoint),
            Err(_) => request.uri().clone(),
        },
    }
}

/// Generates a random token usable as a From/To tag.
pub fn generate_tag() -> ArcStr {
    let tag: String = rand::rng().sample_iter(&Alphanumeric).take(10).map(char::from).collect();

    tag.into()
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::parser::Parser;
    use crate::transport::TransportReceiver;

    fn parse_request(buf: &[u8]) -> Request {
        Parser::new(buf).parse_sip_msg().unwrap().request().unwrap().clone()
    }

    fn parse_response(buf: &[u8]) -> Response {
        Parser::new(buf).parse_sip_msg().unwrap().response().unwrap().clone()
    }

    fn invite() -> Request {
        parse_request(
            b"INVITE sip:callee@192.0.2.10 SIP/2.0\r\n\
            Via: SIP/2.0/UDP 198.51.100.1:5060;branch=z9hG4bK74bf9\r\n\
            From: \"Caller\" <sip:caller@atlanta.example.com>;tag=9fxced76sl\r\n\
            To: <sip:callee@biloxi.example.com>\r\n\
            Call-ID: 3848276298220188511@atlanta.example.com\r\n\
            CSeq: 7 INVITE\r\n\
            Contact: <sip:caller@10.0.0.5:5060>\r\n\
            Content-Length: 0\r\n\r\n",
        )
    }

    fn ok_response(record_routes: bool) -> Response {
        let mut buf = Vec::from(
            &b"SIP/2.0 200 OK\r\n\
            Via: SIP/2.0/UDP 198.51.100.1:5060;branch=z9hG4bK74bf9\r\n\
            From: \"Caller\" <sip:caller@atlanta.example.com>;tag=9fxced76sl\r\n\
            To: <sip:callee@biloxi.example.com>;tag=314159abc\r\n\
            Call-ID: 3848276298220188511@atlanta.example.com\r\n\
            CSeq: 7 INVITE\r\n\
            Contact: <sip:callee@192.0.2.10>\r\n"[..],
        );
        if record_routes {
            buf.extend_from_slice(
                b"Record-Route: <sip:p1.example.com;lr>\r\n\
                Record-Route: <sip:p2.example.com;lr>\r\n",
            );
        }
        buf.extend_from_slice(b"Content-Length: 0\r\n\r\n");
        parse_response(&buf)
    }

    fn channel() -> (TransportSender, TransportReceiver) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn test_uas_and_uac_dialogs_mirror_each_other() {
        let request = invite();
        let response = ok_response(true);

        let (tx, _rx) = channel();
        let uas = Dialog::new_uas(&request, &response, None, tx.clone()).unwrap();
        let uac = Dialog::new_uac(&request, &response, tx).unwrap();

        assert_eq!(uas.call_id(), uac.call_id());
        assert_eq!(uas.local_tag(), uac.remote_tag());
        assert_eq!(uas.remote_tag(), uac.local_tag());
        assert_eq!(uas.direction(), DialogDirection::In);
        assert_eq!(uac.direction(), DialogDirection::Out);

        // The route sets are mirror images of one another.
        let uas_routes: Vec<String> = uas.route_set().iter().map(|r| r.uri().to_string()).collect();
        let uac_routes: Vec<String> = uac.route_set().iter().map(|r| r.uri().to_string()).collect();
        let mut reversed = uas_routes.clone();
        reversed.reverse();

        assert_eq!(uas_routes.len(), 2);
        assert_eq!(uac_routes, reversed);
        assert_eq!(uas_routes[0], "sip:p1.example.com;lr");

        assert_eq!(uas.state(), DialogState::Confirmed);
        assert_eq!(uac.state(), DialogState::Confirmed);
    }

    #[test]
    fn test_local_cseq_is_monotone() {
        let request = invite();
        let response = ok_response(false);

        let (tx, _rx) = channel();
        let dialog = Dialog::new_uac(&request, &response, tx).unwrap();
        let initial = dialog.local_seq();

        let mut last = initial;
        for _ in 0..5 {
            let request = dialog.make_request(Method::Info);
            let cseq = request.headers.cseq().unwrap().cseq();
            assert_eq!(cseq, last + 1);
            last = cseq;
        }

        assert_eq!(dialog.local_seq(), initial + 5);
    }

    #[test_log::test]
    fn test_remote_target_is_mangled_only_without_record_route() {
        let request = invite();
        let received_from: Endpoint = "udp:203.0.113.7:5060".parse().unwrap();

        let (tx, _rx) = channel();
        let no_routes = Dialog::new_uas(&request, &ok_response(false), Some(&received_from), tx.clone()).unwrap();
        assert_eq!(no_routes.remote_target().host_port.to_string(), "203.0.113.7:5060");

        let with_routes = Dialog::new_uas(&request, &ok_response(true), Some(&received_from), tx).unwrap();
        assert_eq!(with_routes.remote_target().host_port.to_string(), "10.0.0.5:5060");
    }

    #[test]
    fn test_proxy_received_from_header_drives_the_rewrite() {
        let request = parse_request(
            b"INVITE sip:callee@192.0.2.10 SIP/2.0\r\n\
            Via: SIP/2.0/UDP 198.51.100.1:5060;branch=z9hG4bK74bf9\r\n\
            From: <sip:caller@atlanta.example.com>;tag=9fxced76sl\r\n\
            To: <sip:callee@biloxi.example.com>\r\n\
            Call-ID: 4b4c76e66710@atlanta.example.com\r\n\
            CSeq: 1 INVITE\r\n\
            Contact: <sip:caller@10.0.0.5:5060>\r\n\
            Proxy-Received-From: udp:203.0.113.9:5062\r\n\
            Content-Length: 0\r\n\r\n",
        );

        let (tx, _rx) = channel();
        let dialog = Dialog::new_uas(&request, &ok_response(false), None, tx).unwrap();

        assert_eq!(dialog.remote_target().host_port.to_string(), "203.0.113.9:5062");
    }

    #[test_log::test]
    fn test_hangup_sends_in_dialog_bye() {
        let request = invite();
        let response = ok_response(false);

        let (tx, mut rx) = channel();
        let dialog = Dialog::new_uac(&request, &response, tx).unwrap();
        let creation_seq = dialog.local_seq();

        dialog.hangup(None);

        assert_eq!(dialog.state(), DialogState::Terminated);

        let outgoing = rx.try_recv().expect("BYE handed to the transport");
        let bye = &outgoing.request;

        assert!(bye.method().is_bye());
        assert_eq!(bye.uri(), dialog.remote_target());
        assert_eq!(bye.headers.cseq().unwrap().cseq(), creation_seq + 1);
        assert_eq!(bye.headers.call_id(), Some(dialog.call_id()));
        assert_eq!(bye.headers.from_header().unwrap().tag(), Some(dialog.local_tag()));
        assert_eq!(bye.headers.to_header().unwrap().tag(), Some(dialog.remote_tag()));
        assert!(bye.headers.top_via().is_some());
    }

    #[test]
    fn test_hangup_outbound_proxy_selection() {
        let request = parse_request(
            b"INVITE sip:callee@192.0.2.10 SIP/2.0\r\n\
            Via: SIP/2.0/UDP 198.51.100.1:5060;branch=z9hG4bK74bf9\r\n\
            From: <sip:caller@atlanta.example.com>;tag=9fxced76sl\r\n\
            To: <sip:callee@biloxi.example.com>\r\n\
            Call-ID: 84b4c76e66710@atlanta.example.com\r\n\
            CSeq: 1 INVITE\r\n\
            Contact: <sip:caller@198.51.100.1>\r\n\
            Proxy-Received-On: udp:192.0.2.200:9060\r\n\
            Content-Length: 0\r\n\r\n",
        );
        let response = ok_response(false);

        // A non-loopback proxy loses against Proxy-Received-On,
        // re-pointed at the default SIP port.
        let (tx, mut rx) = channel();
        let dialog = Dialog::new_uas(&request, &response, None, tx).unwrap();
        dialog.hangup(Some("udp:198.51.100.99:5070".parse().unwrap()));

        let outgoing = rx.try_recv().unwrap();
        assert_eq!(outgoing.destination, Some("udp:192.0.2.200:5060".parse().unwrap()));

        // A loopback proxy wins.
        let (tx, mut rx) = channel();
        let dialog = Dialog::new_uas(&request, &response, None, tx).unwrap();
        dialog.hangup(Some("udp:127.0.0.1:5080".parse().unwrap()));

        let outgoing = rx.try_recv().unwrap();
        assert_eq!(outgoing.destination, Some("udp:127.0.0.1:5080".parse().unwrap()));
    }

    #[test]
    fn test_inbound_cseq_must_advance() {
        let request = invite();
        let response = ok_response(false);

        let (tx, _rx) = channel();
        let dialog = Dialog::new_uas(&request, &response, None, tx).unwrap();
        assert_eq!(dialog.remote_seq(), 7);

        // Replays and reordered requests are rejected.
        let replay = dialog.make_request_from_peer(7);
        assert!(dialog.on_in_dialog_request(&replay).is_err());

        let next = dialog.make_request_from_peer(8);
        dialog.on_in_dialog_request(&next).unwrap();
        assert_eq!(dialog.remote_seq(), 8);
    }

    #[test]
    fn test_bye_terminates_and_termination_is_terminal() {
        let request = invite();
        let response = ok_response(false);

        let (tx, _rx) = channel();
        let dialog = Dialog::new_uas(&request, &response, None, tx).unwrap();

        let bye = dialog.make_request_from_peer(8);
        dialog.on_in_dialog_request(&bye).unwrap();
        assert_eq!(dialog.state(), DialogState::Terminated);

        // No transitions out of Terminated.
        dialog.on_response(&ok_response(false));
        assert_eq!(dialog.state(), DialogState::Terminated);
    }

    #[test]
    fn test_early_dialog_confirms_or_terminates() {
        let request = invite();
        let ringing = parse_response(
            b"SIP/2.0 180 Ringing\r\n\
            Via: SIP/2.0/UDP 198.51.100.1:5060;branch=z9hG4bK74bf9\r\n\
            From: <sip:caller@atlanta.example.com>;tag=9fxced76sl\r\n\
            To: <sip:callee@biloxi.example.com>;tag=314159abc\r\n\
            Call-ID: 3848276298220188511@atlanta.example.com\r\n\
            CSeq: 7 INVITE\r\n\
            Content-Length: 0\r\n\r\n",
        );

        let (tx, _rx) = channel();
        let dialog = Dialog::new_uac(&request, &ringing, tx).unwrap();
        assert_eq!(dialog.state(), DialogState::Early);

        dialog.on_response(&ok_response(false));
        assert_eq!(dialog.state(), DialogState::Confirmed);

        let (tx, _rx) = channel();
        let dialog = Dialog::new_uac(&request, &ringing, tx).unwrap();
        let busy = parse_response(
            b"SIP/2.0 486 Busy Here\r\n\
            Via: SIP/2.0/UDP 198.51.100.1:5060;branch=z9hG4bK74bf9\r\n\
            From: <sip:caller@atlanta.example.com>;tag=9fxced76sl\r\n\
            To: <sip:callee@biloxi.example.com>;tag=314159abc\r\n\
            Call-ID: 3848276298220188511@atlanta.example.com\r\n\
            CSeq: 7 INVITE\r\n\
            Content-Length: 0\r\n\r\n",
        );
        dialog.on_response(&busy);
        assert_eq!(dialog.state(), DialogState::Terminated);
    }

    #[test]
    fn test_subscribe_dialog_reverses_the_request_route_set() {
        let request = parse_request(
            b"SUBSCRIBE sip:presence@192.0.2.10 SIP/2.0\r\n\
            Via: SIP/2.0/UDP 198.51.100.1:5060;branch=z9hG4bKsub1\r\n\
            From: <sip:watcher@atlanta.example.com>;tag=xfg9\r\n\
            To: <sip:presence@biloxi.example.com>\r\n\
            Call-ID: subscribe-4711@atlanta.example.com\r\n\
            CSeq: 3 SUBSCRIBE\r\n\
            Contact: <sip:watcher@198.51.100.1>\r\n\
            Record-Route: <sip:p1.example.com;lr>\r\n\
            Record-Route: <sip:p2.example.com;lr>\r\n\
            Expires: 3600\r\n\
            Content-Length: 0\r\n\r\n",
        );

        let (tx, _rx) = channel();
        let tag = generate_tag();
        let dialog = Dialog::new_subscriber(&request, &tag, None, tx).unwrap();

        assert_eq!(dialog.local_tag(), tag.as_str());
        assert_eq!(dialog.remote_tag(), "xfg9");

        let routes: Vec<String> = dialog.route_set().iter().map(|r| r.uri().to_string()).collect();
        assert_eq!(routes, vec!["sip:p2.example.com;lr", "sip:p1.example.com;lr"]);
        assert_eq!(dialog.remote_target().to_string(), "sip:watcher@198.51.100.1");
    }

    #[test]
    fn test_subscribe_dialog_mangles_private_contact() {
        let request = parse_request(
            b"SUBSCRIBE sip:presence@192.0.2.10 SIP/2.0\r\n\
            Via: SIP/2.0/UDP 198.51.100.1:5060;branch=z9hG4bKsub2\r\n\
            From: <sip:watcher@atlanta.example.com>;tag=xfg9\r\n\
            To: <sip:presence@biloxi.example.com>\r\n\
            Call-ID: subscribe-4712@atlanta.example.com\r\n\
            CSeq: 1 SUBSCRIBE\r\n\
            Contact: <sip:watcher@10.0.0.9:5060>\r\n\
            Expires: 3600\r\n\
            Content-Length: 0\r\n\r\n",
        );
        let received_from: Endpoint = "udp:203.0.113.7:5060".parse().unwrap();

        let (tx, _rx) = channel();
        let dialog = Dialog::new_subscriber(&request, "sub-tag-1", Some(&received_from), tx).unwrap();

        assert_eq!(dialog.remote_target().host_port.to_string(), "203.0.113.7:5060");
    }

    #[test]
    fn test_requests_carry_the_route_set_and_proxy_send_from() {
        let request = invite();
        let response = ok_response(true);

        let (tx, _rx) = channel();
        let dialog = Dialog::new_uas(&request, &response, None, tx).unwrap();
        let info = dialog.make_request(Method::Info);

        let routes: Vec<String> = info.headers.routes().map(|r| r.uri().to_string()).collect();
        assert_eq!(routes, vec!["sip:p1.example.com;lr", "sip:p2.example.com;lr"]);
        assert!(info.headers.proxy_send_from().is_none());
        assert_eq!(info.headers.max_forwards().unwrap().max_forwards(), 70);
    }

    impl Dialog {
        // Builds a request as the peer would send it, for tests.
        fn make_request_from_peer(&self, cseq: u32) -> Request {
            let mut request = Request::new(Method::Bye, "sip:local@198.51.100.1".parse().unwrap());
            request.headers.push(Header::CSeq(CSeq::new(cseq, Method::Bye)));
            request.headers.push(Header::CallId(self.call_id().clone()));
            request
        }
    }
}
