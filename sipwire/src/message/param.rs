use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use sipwire_util::ArcStr;

use crate::error::Error;
use crate::parser::Parser;

/// A parameter.
///
/// This struct represents a parameter in a SIP message, consisting of a
/// name and an optional value. Values are stored in their escaped wire
/// form; read them through [`Parameter::unescaped_value`] or
/// [`Parameters::get`].
///
/// # Examples
///
/// ```
/// use sipwire::message::Parameter;
///
/// let param: Parameter = "param=value".parse().unwrap();
///
/// assert_eq!(param.name(), "param");
/// assert_eq!(param.value(), Some("value"));
/// ```
#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct Parameter {
    /// The parameter name.
    pub(crate) name: ArcStr,
    /// The parameter optional value.
    pub(crate) value: Option<ArcStr>,
}

impl Parameter {
    /// Creates a new `Parameter` with the given `name` and optional
    /// `value`.
    pub fn new(name: &str, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            value: value.map(|v| v.into()),
        }
    }

    /// Returns the param `name`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the param `value` if any, in its escaped wire form.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the param `value` with percent escapes decoded.
    pub fn unescaped_value(&self) -> Option<Cow<'_, str>> {
        self.value.as_deref().map(unescape_param)
    }
}

impl FromStr for Parameter {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Parser::new(s.as_bytes()).parse_param()
    }
}

/// A collection of SIP parameters.
///
/// A parameter takes the form `name=value` and can appear in a SIP
/// message as either a URI parameter or a header parameter. Insertion
/// order is preserved so serialization is stable; name lookup is
/// ASCII-case-insensitive.
#[derive(Debug, Default, Clone, Eq)]
pub struct Parameters {
    inner: Vec<Parameter>,
}

impl Parameters {
    /// Creates an empty `Parameters`.
    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    /// Parses a `;`-delimited parameter string.
    pub fn parse(s: &str) -> Self {
        Self::parse_delimited(s, ';')
    }

    /// Parses a parameter string split on `delim`.
    ///
    /// Double-quoted runs may contain the delimiter and `\"` escapes a
    /// quote inside them. Leading and doubled delimiters are tolerated.
    /// When the same name appears twice the first occurrence wins.
    pub fn parse_delimited(s: &str, delim: char) -> Self {
        let mut params = Parameters::new();

        for piece in split_quoted(s, delim) {
            let (name, value) = match piece.split_once('=') {
                Some((name, value)) => (name.trim(), Some(value.trim())),
                None => (piece.trim(), None),
            };
            if name.is_empty() || params.has(name) {
                continue;
            }
            params.push(Parameter::new(name, value));
        }

        params
    }

    /// Returns the number of elements in the parameters.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks if the parameter list is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Checks if a parameter with the given name exists.
    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Gets the unescaped value of a parameter by name.
    ///
    /// Returns `None` when the parameter is missing or valueless.
    pub fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        self.position(name)
            .and_then(|i| self.inner[i].value.as_deref())
            .map(unescape_param)
    }

    /// Gets the raw (escape-preserved) value of a parameter by name.
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.position(name).and_then(|i| self.inner[i].value.as_deref())
    }

    /// Sets a parameter, replacing the value of an existing one with the
    /// same name.
    pub fn set(&mut self, name: &str, value: Option<&str>) {
        match self.position(name) {
            Some(i) => self.inner[i].value = value.map(|v| v.into()),
            None => self.push(Parameter::new(name, value)),
        }
    }

    /// Removes the first parameter with the given name.
    pub fn remove(&mut self, name: &str) {
        if let Some(i) = self.position(name) {
            self.inner.remove(i);
        }
    }

    /// Removes every parameter with the given name.
    pub fn remove_all(&mut self, name: &str) {
        self.inner.retain(|p| !p.name.eq_ignore_ascii_case(name));
    }

    /// Returns an iterator over the parameter names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(|p| p.name())
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.inner.iter()
    }

    /// Pushes a new parameter into the collection.
    pub fn push(&mut self, param: Parameter) {
        self.inner.push(param)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.inner.iter().position(|p| p.name.eq_ignore_ascii_case(name))
    }

    fn contains_pair(&self, other: &Parameter) -> bool {
        self.inner.iter().any(|p| {
            p.name.eq_ignore_ascii_case(&other.name)
                && match (&p.value, &other.value) {
                    (None, None) => true,
                    (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                    _ => false,
                }
        })
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for Parameter { name, value } in &self.inner {
            write!(f, ";{}", name)?;
            if let Some(v) = value {
                // Quoted values go out as-is; anything else gets the
                // reserved characters escaped.
                if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
                    write!(f, "={}", v)?;
                } else {
                    write!(f, "={}", escape_param(v))?;
                }
            }
        }
        Ok(())
    }
}

/// Two parameter collections are equal when they hold the same set of
/// name/value pairs, compared ASCII-case-insensitively. Order does not
/// matter for equality (it only matters for serialization).
impl PartialEq for Parameters {
    fn eq(&self, other: &Self) -> bool {
        self.inner.iter().all(|p| other.contains_pair(p)) && other.inner.iter().all(|p| self.contains_pair(p))
    }
}

impl Hash for Parameters {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut pairs: Vec<(String, Option<String>)> = self
            .inner
            .iter()
            .map(|p| {
                (
                    p.name.to_ascii_lowercase(),
                    p.value.as_deref().map(|v| v.to_ascii_lowercase()),
                )
            })
            .collect();
        pairs.sort();
        pairs.dedup();
        pairs.hash(state);
    }
}

impl<'a, const N: usize> From<[(&'a str, &'a str); N]> for Parameters {
    fn from(params: [(&'a str, &'a str); N]) -> Self {
        let params = params.map(|(name, value)| Parameter::new(name, Some(value))).to_vec();

        Self { inner: params }
    }
}

/// Splits `s` on `delim` while honouring double-quoted substrings and
/// angle brackets.
///
/// A delimiter inside a quoted run or inside `<...>` does not split;
/// `\"` escapes a quote inside a quoted run. Empty segments produced by
/// leading or doubled delimiters are dropped.
pub fn split_quoted(s: &str, delim: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut angle_depth = 0usize;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => angle_depth += 1,
            '>' if !in_quotes => angle_depth = angle_depth.saturating_sub(1),
            c if c == delim && !in_quotes && angle_depth == 0 => {
                let piece = s[start..i].trim();
                if !piece.is_empty() {
                    pieces.push(piece);
                }
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    let piece = s[start..].trim();
    if !piece.is_empty() {
        pieces.push(piece);
    }

    pieces
}

/// Percent-encodes the reserved `;=?&` set, quotes, spaces, controls and
/// non-ASCII bytes. Already escaped `%HH` sequences are left untouched.
pub fn escape_param(s: &str) -> Cow<'_, str> {
    fn needs_escape(b: u8) -> bool {
        matches!(b, b';' | b'=' | b'?' | b'&' | b'"' | b' ') || b < 0x20 || b > 0x7e
    }

    if !s.bytes().any(needs_escape) {
        return Cow::Borrowed(s);
    }

    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = String::with_capacity(s.len() + 4);
    for b in s.bytes() {
        if needs_escape(b) {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0xf) as usize] as char);
        } else {
            out.push(b as char);
        }
    }
    Cow::Owned(out)
}

/// Decodes `%HH` escapes. Malformed sequences pass through unchanged.
pub fn unescape_param(s: &str) -> Cow<'_, str> {
    if !s.contains('%') {
        return Cow::Borrowed(s);
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push(((hi << 4) | lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    match String::from_utf8(out) {
        Ok(decoded) => Cow::Owned(decoded),
        Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_from_str() {
        let param: Parameter = "param=value".parse().unwrap();
        assert_eq!(param.name(), "param");
        assert_eq!(param.value(), Some("value"));
    }

    #[test]
    fn test_parameters_display() {
        let params = Parameters::from([("param1", "value1"), ("param2", "value2")]);
        assert_eq!(params.to_string(), ";param1=value1;param2=value2");
    }

    #[test]
    fn test_split_quoted_keeps_quoted_delimiters() {
        assert_eq!(split_quoted("a=1;b=\"x;y\";c", ';'), vec!["a=1", "b=\"x;y\"", "c"]);
    }

    #[test]
    fn test_split_quoted_tolerates_leading_and_doubled_delimiters() {
        assert_eq!(split_quoted(";;a=1;;b", ';'), vec!["a=1", "b"]);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let params = Parameters::parse("a=1;a=2");
        assert_eq!(params.get("a").unwrap(), "1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let params = Parameters::parse("Branch=z9hG4bK77asjd");
        assert!(params.has("branch"));
        assert_eq!(params.get("BRANCH").unwrap(), "z9hG4bK77asjd");
    }

    #[test]
    fn test_valueless_flag() {
        let params = Parameters::parse("lr;maddr=239.255.255.1");
        assert!(params.has("lr"));
        assert_eq!(params.get("lr"), None);
        assert_eq!(params.to_string(), ";lr;maddr=239.255.255.1");
    }

    #[test]
    fn test_equality_ignores_order_and_case() {
        let a = Parameters::parse("transport=TCP;lr");
        let b = Parameters::parse("lr;Transport=tcp");
        assert_eq!(a, b);

        let c = Parameters::parse("transport=udp;lr");
        assert_ne!(a, c);
    }

    #[test]
    fn test_set_and_remove() {
        let mut params = Parameters::parse("a=1;b=2");
        params.set("A", Some("3"));
        assert_eq!(params.get("a").unwrap(), "3");

        params.remove("b");
        assert!(!params.has("b"));

        params.push(Parameter::new("x", None));
        params.push(Parameter::new("X", Some("1")));
        params.remove_all("x");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_escape_round_trip() {
        assert_eq!(escape_param("a b;c"), "a%20b%3Bc");
        assert_eq!(unescape_param("a%20b%3Bc"), "a b;c");
        assert_eq!(unescape_param("100%"), "100%");
    }
}
