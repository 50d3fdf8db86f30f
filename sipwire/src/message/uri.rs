use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::str::FromStr;

use itertools::Itertools;
use sipwire_util::ArcStr;

use super::{Endpoint, Method, Parameter, Parameters, TransportProtocol};
use crate::error::{Error, Field, Result, ValidationError};
use crate::parser::Parser;
use crate::Config;

/// A SIP address as it appears in `From`, `To`, `Contact`, `Route` and
/// `Record-Route` headers.
///
/// Can either be a plain [`Uri`] or a [`NameAddr`] (an angle-bracketed
/// address with an optional display name).
///
/// # Examples
///
/// ```rust
/// use sipwire::message::SipAddr;
///
/// let uri: SipAddr = "sip:alice@example.com".parse().unwrap();
/// assert!(uri.is_uri());
///
/// let name_addr: SipAddr = "\"Alice\" <sip:alice@example.com>".parse().unwrap();
/// assert!(name_addr.is_name_addr());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SipAddr {
    /// A plain SIP URI (e.g. `sip:user@example.com`)
    Uri(Uri),
    /// A named address (e.g. `"Alice" <sip:user@example.com>`)
    NameAddr(NameAddr),
}

impl SipAddr {
    /// Returns `true` if this is a [`SipAddr::NameAddr`] variant.
    pub fn is_name_addr(&self) -> bool {
        matches!(self, SipAddr::NameAddr(_))
    }

    /// Returns `true` if this is a [`SipAddr::Uri`] variant.
    pub fn is_uri(&self) -> bool {
        matches!(self, SipAddr::Uri(_))
    }

    /// Returns a reference to the [`Uri`].
    pub fn uri(&self) -> &Uri {
        match self {
            SipAddr::Uri(uri) => uri,
            SipAddr::NameAddr(name_addr) => &name_addr.uri,
        }
    }

    /// Returns the display part if present.
    pub fn display(&self) -> Option<&str> {
        if let SipAddr::NameAddr(addr) = self {
            addr.display()
        } else {
            None
        }
    }

    /// Returns the scheme of the uri.
    pub fn scheme(&self) -> Scheme {
        self.uri().scheme
    }

    /// Returns a reference to the [`HostPort`] of the uri.
    pub fn host_port(&self) -> &HostPort {
        &self.uri().host_port
    }
}

impl From<Uri> for SipAddr {
    fn from(uri: Uri) -> Self {
        SipAddr::Uri(uri)
    }
}

impl FromStr for SipAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Parser::new(s.as_bytes()).parse_sip_addr(true)
    }
}

impl fmt::Display for SipAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SipAddr::Uri(uri) => write!(f, "{}", uri),
            SipAddr::NameAddr(addr) => write!(f, "{}", addr),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
/// A SIP URI scheme, either `sip` or `sips`.
pub enum Scheme {
    #[default]
    /// An `sip` uri scheme.
    Sip,
    /// An `sips` uri scheme.
    Sips,
}

impl Scheme {
    /// Returns the scheme string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Sip => "sip",
            Scheme::Sips => "sips",
        }
    }

    /// The transport implied when a URI carries no `transport` parameter.
    pub fn default_protocol(&self) -> TransportProtocol {
        match self {
            Scheme::Sip => TransportProtocol::Udp,
            Scheme::Sips => TransportProtocol::Tls,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the header parameters embedded in a SIP URI after `?`.
#[derive(Debug, PartialEq, Eq, Default, Clone, Hash)]
pub struct UriHeaders {
    pub(crate) inner: Parameters,
}

impl UriHeaders {
    /// Creates an empty set of embedded headers.
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<Parameters> for UriHeaders {
    fn from(inner: Parameters) -> Self {
        Self { inner }
    }
}

impl std::ops::Deref for UriHeaders {
    type Target = Parameters;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// An SIP uri.
///
/// `Uri` is an immutable value object; operations that "modify" it, like
/// [`Uri::mangled`], return a new copy.
#[derive(Debug, Clone, Default)]
pub struct Uri {
    /// The uri scheme.
    pub scheme: Scheme,
    /// Optional user part of uri, escape-preserved.
    pub user: Option<UriUser>,
    /// The uri host.
    pub host_port: HostPort,
    /// The user parameter.
    pub user_param: Option<ArcStr>,
    /// The method parameter.
    pub method_param: Option<Method>,
    /// The transport parameter.
    pub transport_param: Option<TransportProtocol>,
    /// The ttl parameter.
    pub ttl_param: Option<u8>,
    /// The lr parameter.
    pub lr_param: bool,
    /// The maddr parameter.
    pub maddr_param: Option<Host>,
    /// Other parameters.
    pub parameters: Option<Parameters>,
    /// Optional header parameters.
    pub headers: Option<UriHeaders>,
}

impl Uri {
    /// Returns a builder to create an `Uri`.
    pub fn builder() -> UriBuilder {
        UriBuilder::new()
    }

    /// Creates an `Uri` instance.
    pub fn new(scheme: Scheme, user: Option<UriUser>, host_port: HostPort) -> Self {
        Uri {
            scheme,
            user,
            host_port,
            ..Default::default()
        }
    }

    /// The `*` uri used by REGISTER to remove all bindings.
    pub fn wildcard() -> Self {
        Uri {
            scheme: Scheme::Sip,
            host_port: HostPort {
                host: Host::DomainName(DomainName::new("*")),
                port: None,
            },
            ..Default::default()
        }
    }

    /// Returns `true` if this is the `*` uri.
    pub fn is_wildcard(&self) -> bool {
        matches!(&self.host_port.host, Host::DomainName(d) if d.as_str() == "*")
    }

    /// Parses `s`, prepending the configured default scheme when none is
    /// present.
    pub fn parse_relaxed(s: &str, config: &Config) -> Result<Uri> {
        match s.parse() {
            Ok(uri) => Ok(uri),
            Err(original) => {
                let prefixed = format!("{}:{}", config.default_scheme, s);
                prefixed.parse().map_err(|_| original)
            }
        }
    }

    /// Creates a uri addressing a literal transport endpoint.
    pub fn from_endpoint(endpoint: &Endpoint) -> Uri {
        Uri {
            scheme: Scheme::Sip,
            host_port: HostPort {
                host: Host::IpAddr(endpoint.ip()),
                port: Some(endpoint.port()),
            },
            transport_param: (endpoint.protocol() != TransportProtocol::Udp).then_some(endpoint.protocol()),
            ..Default::default()
        }
    }

    /// The transport this uri resolves to: `tls` when the scheme is
    /// `sips`, otherwise the `transport` parameter when present and
    /// valid, otherwise `udp`.
    pub fn protocol(&self) -> TransportProtocol {
        if self.scheme == Scheme::Sips {
            return TransportProtocol::Tls;
        }
        match self.transport_param {
            Some(protocol) if protocol != TransportProtocol::Unknown => protocol,
            _ => TransportProtocol::Udp,
        }
    }

    /// The canonical `scheme:user@host:port` spelling used for equality
    /// and hashing. The port is elided when it equals the protocol
    /// default.
    pub fn canonical_address(&self) -> String {
        if self.is_wildcard() {
            return "*".to_string();
        }

        let mut out = String::with_capacity(64);
        out.push_str(self.scheme.as_str());
        out.push(':');
        if let Some(user) = &self.user {
            out.push_str(&user.user);
            if let Some(pass) = &user.pass {
                out.push(':');
                out.push_str(pass);
            }
            out.push('@');
        }
        out.push_str(&self.host_port.host.to_string());
        if let Some(port) = self.host_port.port {
            if port != self.protocol().default_port() {
                out.push(':');
                out.push_str(&port.to_string());
            }
        }
        out
    }

    /// The uri stripped of parameters and embedded headers, keeping only
    /// a `transport` parameter when it is needed to disambiguate the
    /// protocol. Applying this twice yields the same string.
    pub fn to_parameterless(&self) -> String {
        if self.is_wildcard() {
            return "*".to_string();
        }

        let mut out = String::with_capacity(64);
        out.push_str(self.scheme.as_str());
        out.push(':');
        if let Some(user) = &self.user {
            out.push_str(&user.user);
            if let Some(pass) = &user.pass {
                out.push(':');
                out.push_str(pass);
            }
            out.push('@');
        }
        out.push_str(&self.host_port.to_string());

        let protocol = self.protocol();
        if protocol != self.scheme.default_protocol() {
            out.push_str(";transport=");
            out.push_str(protocol.as_lower_str());
        }
        out
    }

    /// Returns a copy of this uri re-hosted at `received_from` when the
    /// host is a private IPv4 address different from where the message
    /// actually came from. Returns `None` when no rewrite is needed.
    /// Domain names and IPv6 hosts are never rewritten.
    pub fn mangled(&self, received_from: &Endpoint) -> Option<Uri> {
        let Host::IpAddr(IpAddr::V4(v4)) = self.host_port.host else {
            return None;
        };
        if !v4.is_private() {
            return None;
        }

        let same_host = IpAddr::V4(v4) == received_from.ip();
        let same_port = self.host_port.port.unwrap_or_else(|| self.protocol().default_port()) == received_from.port();
        if same_host && same_port {
            return None;
        }

        let mut out = self.clone();
        out.host_port = HostPort {
            host: Host::IpAddr(received_from.ip()),
            port: Some(received_from.port()),
        };
        Some(out)
    }
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut p = Parser::new(s.as_bytes());

        p.parse_uri(true)
    }
}

/// Uri equality is the canonical address (ASCII-case-insensitive, with
/// default ports elided) plus case-insensitive set equality of the
/// parameters and embedded headers.
impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        fn opt_params_eq(a: Option<&Parameters>, b: Option<&Parameters>) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a == b,
                (Some(p), None) | (None, Some(p)) => p.is_empty(),
            }
        }

        self.canonical_address().eq_ignore_ascii_case(&other.canonical_address())
            && self.transport_param.unwrap_or(self.scheme.default_protocol())
                == other.transport_param.unwrap_or(other.scheme.default_protocol())
            && opt_ci_eq(self.user_param.as_deref(), other.user_param.as_deref())
            && self.method_param == other.method_param
            && self.ttl_param == other.ttl_param
            && self.lr_param == other.lr_param
            && opt_ci_eq(
                self.maddr_param.as_ref().map(|m| m.to_string()).as_deref(),
                other.maddr_param.as_ref().map(|m| m.to_string()).as_deref(),
            )
            && opt_params_eq(self.parameters.as_ref(), other.parameters.as_ref())
            && opt_params_eq(
                self.headers.as_ref().map(|h| &h.inner),
                other.headers.as_ref().map(|h| &h.inner),
            )
    }
}

impl Eq for Uri {}

impl Hash for Uri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_address().to_ascii_lowercase().hash(state);
    }
}

fn opt_ci_eq(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            return f.write_str("*");
        }

        write!(f, "{}:", self.scheme)?;

        if let Some(user) = &self.user {
            write!(f, "{}", user.user)?;
            if let Some(pass) = &user.pass {
                write!(f, ":{}", pass)?;
            }
            write!(f, "@")?;
        }
        write!(f, "{}", self.host_port)?;

        if let Some(user) = &self.user_param {
            write!(f, ";user={}", user)?;
        }
        if let Some(method) = &self.method_param {
            write!(f, ";method={}", method)?;
        }
        if let Some(maddr) = &self.maddr_param {
            write!(f, ";maddr={}", maddr)?;
        }
        if let Some(transport) = &self.transport_param {
            write!(f, ";transport={}", transport.as_lower_str())?;
        }
        if let Some(ttl) = self.ttl_param {
            write!(f, ";ttl={}", ttl)?;
        }
        if self.lr_param {
            write!(f, ";lr")?;
        }
        if let Some(params) = &self.parameters {
            write!(f, "{}", params)?;
        }
        if let Some(hdr_params) = &self.headers {
            let formatter = Itertools::format_with(hdr_params.inner.iter(), "&", |it, f| {
                match it.value() {
                    Some(value) => f(&format_args!("{}={}", it.name(), value)),
                    None => f(&format_args!("{}", it.name())),
                }
            });
            write!(f, "?{}", formatter)?;
        }

        Ok(())
    }
}

#[derive(Default)]
/// Builder for creating a new SIP URI.
pub struct UriBuilder {
    uri: Uri,
}

impl UriBuilder {
    /// Returns a builder to create an `Uri`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the uri scheme.
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.uri.scheme = scheme;
        self
    }

    /// Sets the user part of the uri.
    pub fn user(mut self, user: UriUser) -> Self {
        self.uri.user = Some(user);
        self
    }

    /// Sets the host of the uri.
    pub fn host(mut self, host_port: HostPort) -> Self {
        self.uri.host_port = host_port;
        self
    }

    /// Sets the user parameter of the uri.
    pub fn user_param(mut self, param: &str) -> Self {
        self.uri.user_param = Some(param.into());
        self
    }

    /// Sets the method parameter of the uri.
    pub fn method_param(mut self, param: Method) -> Self {
        self.uri.method_param = Some(param);
        self
    }

    /// Sets the transport parameter of the uri.
    pub fn transport_param(mut self, param: TransportProtocol) -> Self {
        self.uri.transport_param = Some(param);
        self
    }

    /// Sets the ttl parameter of the uri.
    pub fn ttl_param(mut self, param: u8) -> Self {
        self.uri.ttl_param = Some(param);
        self
    }

    /// Sets the lr parameter of the uri.
    pub fn lr_param(mut self, param: bool) -> Self {
        self.uri.lr_param = param;
        self
    }

    /// Sets the maddr parameter of the uri.
    pub fn maddr_param(mut self, param: Host) -> Self {
        self.uri.maddr_param = Some(param);
        self
    }

    /// Sets other parameters of the uri.
    pub fn params(mut self, params: Parameters) -> Self {
        self.uri.parameters = Some(params);
        self
    }

    /// Set a generic parameter of the uri.
    pub fn param(mut self, name: &str, value: Option<&str>) -> Self {
        self.uri
            .parameters
            .get_or_insert_with(Parameters::new)
            .push(Parameter::new(name, value));
        self
    }

    /// Set a header parameter of the uri.
    pub fn header(mut self, name: &str, value: Option<&str>) -> Self {
        self.uri
            .headers
            .get_or_insert_with(UriHeaders::new)
            .inner
            .push(Parameter::new(name, value));
        self
    }

    /// Finalize the builder into a `Uri`.
    pub fn build(self) -> Uri {
        self.uri
    }
}

/// Represents an SIP `name-addr`.
///
/// Typically appears in `From`, `To`, and `Contact` headers. Contains an
/// sip uri and an optional display part.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NameAddr {
    /// The optional display part.
    pub display: Option<ArcStr>,
    /// The uri of the `name-addr`.
    pub uri: Uri,
}

impl NameAddr {
    /// Creates a `NameAddr` without a display part.
    pub fn new(uri: Uri) -> Self {
        Self { display: None, uri }
    }

    /// Returns the display part if present.
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }
}

impl FromStr for NameAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut p = Parser::new(s.as_bytes());

        p.parse_name_addr()
    }
}

impl fmt::Display for NameAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(display) = &self.display {
            write!(f, "\"{}\" ", display)?;
        }
        write!(f, "<{}>", self.uri)?;

        Ok(())
    }
}

/// Represents the user information component of a URI.
///
/// The user is kept in its escaped wire form.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct UriUser {
    /// The username part of the URI.
    pub user: ArcStr,
    /// The optional password associated with the user.
    pub pass: Option<ArcStr>,
}

impl UriUser {
    /// Creates a new `UriUser` with the given `user` and optional `pass`.
    pub fn new(user: &str, pass: Option<&str>) -> Self {
        Self {
            user: user.into(),
            pass: pass.map(|pass| pass.into()),
        }
    }

    /// Returns the user.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the pass.
    pub fn pass(&self) -> Option<&str> {
        self.pass.as_deref()
    }
}

/// Represents a domain name in a SIP URI.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct DomainName(pub(crate) ArcStr);

impl From<&str> for DomainName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl DomainName {
    /// Creates a new `DomainName` from a string slice.
    pub fn new(name: &str) -> Self {
        DomainName(name.into())
    }

    /// Returns the string representation of the domain name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents the host part of a URI, which can be either a domain name
/// or an IP address.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Host {
    /// A domain name, such as `example.com`.
    DomainName(DomainName),
    /// An IP address, either IPv4 or IPv6.
    IpAddr(IpAddr),
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::DomainName(domain) => write!(f, "{domain}"),
            Host::IpAddr(IpAddr::V4(ip)) => write!(f, "{ip}"),
            Host::IpAddr(IpAddr::V6(ip)) => write!(f, "[{ip}]"),
        }
    }
}

impl Host {
    /// Returns `true` if the host is an IP address (IPv4 or IPv6).
    pub fn is_ip_addr(&self) -> bool {
        matches!(self, Host::IpAddr(_))
    }
}

impl FromStr for Host {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip_addr) = trimmed.parse::<IpAddr>() {
            Ok(Host::IpAddr(ip_addr))
        } else if s.contains(',') || s.contains('"') {
            Err(ValidationError::new(Field::Uri, format!("invalid host '{s}'")).into())
        } else {
            Ok(Host::DomainName(DomainName(s.into())))
        }
    }
}

/// Represents a combination of a host (domain or IP address) and an
/// optional port.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct HostPort {
    /// The host part, which may be a domain name or an IP address.
    pub host: Host,
    /// The optional port number.
    pub port: Option<u16>,
}

impl FromStr for HostPort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut p = Parser::new(s.as_bytes());

        p.parse_host_port()
    }
}

impl HostPort {
    /// Creates a new `HostPort` from a host and optional port.
    pub fn new(host: Host, port: Option<u16>) -> Self {
        Self { host, port }
    }

    /// Returns the IP address if the host is an IP address, otherwise
    /// `None`.
    pub fn ip_addr(&self) -> Option<IpAddr> {
        match self.host {
            Host::DomainName(_) => None,
            Host::IpAddr(ip_addr) => Some(ip_addr),
        }
    }

    /// Returns `true` if the host is an IP address.
    pub fn is_ip_addr(&self) -> bool {
        self.ip_addr().is_some()
    }

    /// Returns `true` if the host is a domain name.
    pub fn is_domain(&self) -> bool {
        matches!(self.host, Host::DomainName(_))
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

impl From<Host> for HostPort {
    fn from(host: Host) -> Self {
        Self { host, port: None }
    }
}

impl Default for HostPort {
    fn default() -> Self {
        Self {
            host: Host::IpAddr(IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)),
            port: Some(5060),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_is_implicit_in_equality() {
        let a: Uri = "sip:alice@host".parse().unwrap();
        let b: Uri = "sip:alice@host:5060".parse().unwrap();

        assert_eq!(a, b);

        let c: Uri = "sip:alice@host:5070".parse().unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_transport_param_compares_case_insensitively() {
        let a: Uri = "sip:alice@host;transport=TCP".parse().unwrap();
        let b: Uri = "sip:alice@host;transport=tcp".parse().unwrap();

        assert_eq!(a, b);
        assert_eq!(a.protocol(), TransportProtocol::Tcp);
    }

    #[test]
    fn test_sips_implies_tls() {
        let uri: Uri = "sips:alice@secure.example.com".parse().unwrap();
        assert_eq!(uri.protocol(), TransportProtocol::Tls);
    }

    #[test]
    fn test_ipv6_round_trip() {
        let uri: Uri = "sip:[::1]:5060".parse().unwrap();

        assert_eq!(uri.host_port.ip_addr(), Some("::1".parse().unwrap()));
        assert_eq!(uri.host_port.port, Some(5060));
        assert_eq!(uri.to_string(), "sip:[::1]:5060");
    }

    #[test]
    fn test_to_parameterless_is_idempotent() {
        let uri: Uri = "sip:alice@host:5070;transport=tcp;lr?Subject=hi".parse().unwrap();
        let first = uri.to_parameterless();
        assert_eq!(first, "sip:alice@host:5070;transport=tcp");

        let reparsed: Uri = first.parse().unwrap();
        assert_eq!(reparsed.to_parameterless(), first);
    }

    #[test]
    fn test_to_parameterless_drops_default_transport() {
        let uri: Uri = "sip:alice@host;transport=udp;foo=bar".parse().unwrap();
        assert_eq!(uri.to_parameterless(), "sip:alice@host");
    }

    #[test]
    fn test_wildcard() {
        let uri: Uri = "*".parse().unwrap();
        assert!(uri.is_wildcard());
        assert_eq!(uri.to_string(), "*");
    }

    #[test]
    fn test_mangle_private_host() {
        let uri: Uri = "sip:bob@10.0.0.5:5060".parse().unwrap();
        let received_from: Endpoint = "udp:203.0.113.7:5060".parse().unwrap();

        let mangled = uri.mangled(&received_from).unwrap();
        assert_eq!(mangled.host_port.to_string(), "203.0.113.7:5060");
        // user part survives the rewrite
        assert_eq!(mangled.user.as_ref().unwrap().user(), "bob");
    }

    #[test]
    fn test_mangle_leaves_public_and_domain_hosts_alone() {
        let received_from: Endpoint = "udp:203.0.113.7:5060".parse().unwrap();

        let public: Uri = "sip:bob@198.51.100.1".parse().unwrap();
        assert!(public.mangled(&received_from).is_none());

        let domain: Uri = "sip:bob@example.com".parse().unwrap();
        assert!(domain.mangled(&received_from).is_none());

        let v6: Uri = "sip:bob@[2001:db8::1]".parse().unwrap();
        assert!(v6.mangled(&received_from).is_none());
    }

    #[test]
    fn test_relaxed_parse_prepends_scheme() {
        let config = Config::default();
        let uri = Uri::parse_relaxed("alice@example.com", &config).unwrap();

        assert_eq!(uri.to_string(), "sip:alice@example.com");
    }

    #[test]
    fn test_display_quotes_name_addr() {
        let addr = NameAddr {
            display: Some("Alice Liddell".into()),
            uri: "sip:alice@wonderland.com".parse().unwrap(),
        };

        assert_eq!(addr.to_string(), "\"Alice Liddell\" <sip:alice@wonderland.com>");
    }
}

#[cfg(test)]
mod prop_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn parse_serialize_round_trips(
            user in proptest::option::of("[a-z][a-z0-9]{0,8}"),
            host in "[a-z][a-z0-9]{0,10}\\.[a-z]{2,3}",
            port in proptest::option::of(1025u16..65535),
            transport in proptest::option::of(
                prop_oneof![Just("udp"), Just("tcp"), Just("tls"), Just("ws")],
            ),
            lr in any::<bool>(),
        ) {
            let mut input = String::from("sip:");
            if let Some(user) = &user {
                input.push_str(user);
                input.push('@');
            }
            input.push_str(&host);
            if let Some(port) = port {
                input.push(':');
                input.push_str(&port.to_string());
            }
            if let Some(transport) = transport {
                input.push_str(";transport=");
                input.push_str(transport);
            }
            if lr {
                input.push_str(";lr");
            }

            let parsed: Uri = input.parse().unwrap();
            let serialized = parsed.to_string();
            let reparsed: Uri = serialized.parse().unwrap();

            prop_assert_eq!(&parsed, &reparsed);
            prop_assert_eq!(serialized, reparsed.to_string());
        }
    }
}
