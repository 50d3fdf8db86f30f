macro_rules! b_map {
    ($name:ident => $( $slice:expr ),+) => {
        const $name: [bool; 256] = {
            let mut arr = [false; 256];
            $(
                let slice = $slice;
                let mut i = 0;
                while i < slice.len() {
                    arr[slice[i] as usize] = true;
                    i += 1;
                }
            )*
            arr
        };
    };
}

macro_rules! parse_header_param {
    ($parser:ident) => (
        $crate::macros::parse_param!(
            $parser,
            $crate::parser::Parser::parse_param,
        )
    );

    ($parser:ident, $($name:ident = $var:expr),*) => (
        $crate::macros::parse_param!(
            $parser,
            $crate::parser::Parser::parse_param,
            $($name = $var),*
        )
    );
}

macro_rules! parse_param {
    (
        $parser:ident,
        $func:expr,
        $($name:ident = $var:expr),*
    ) =>  {{
        $parser.take_ws();
        match $parser.peek() {
            Some(b';') => {
                let mut params = $crate::message::Parameters::new();
                while let Some(b';') = $parser.peek() {
                        // take ';' character
                        $parser.advance();
                        let param = $func($parser)?;
                        $(
                            if param.name().eq_ignore_ascii_case($name) {
                                $var = param.value;
                                $parser.take_ws();
                                continue;
                            }
                        )*
                        params.push(param);
                        $parser.take_ws();
                    }
                    if params.is_empty() {
                        None
                    } else {
                        Some(params)
                    }
                },
                _ => {
                    None
                }
            }
        }};
    }

macro_rules! hdr_list {
    ($parser:ident => $body:expr) => {{
        let mut hdr_items = Vec::new();
        $crate::macros::comma_sep!($parser => {
            hdr_items.push($body);
        });
        hdr_items
    }};
}

macro_rules! comma_sep {
    ($parser:ident => $body:expr) => {{
        $parser.take_ws();
        $body

        while let Some(b',') = $parser.peek() {
            $parser.advance();
            $parser.take_ws();
            $body
        }
    }};
}

#[macro_export]
macro_rules! filter_map_header {
    ($hdrs:expr, $header:ident) => {
        $hdrs.filter_map(|hdr| {
            if let $crate::headers::Header::$header(v) = hdr {
                Some(v)
            } else {
                None
            }
        })
    };
}

#[macro_export]
macro_rules! find_map_header {
    ($hdrs:expr, $header:ident) => {
        $hdrs.find_map(|hdr| {
            if let $crate::headers::Header::$header(v) = hdr {
                Some(v)
            } else {
                None
            }
        })
    };
}

macro_rules! parse_error {
    ($field:expr, $message:expr) => {{
        Err($crate::error::Error::Validation($crate::error::ValidationError::new(
            $field, $message,
        )))
    }};
    ($field:expr, $message:expr, $parser:expr) => {{
        Err($crate::error::Error::Validation($crate::error::ValidationError::new(
            $field,
            format!(
                "{} at line {} col {}",
                $message,
                $parser.position().line(),
                $parser.position().col()
            ),
        )))
    }};
}

macro_rules! parse_header {
    ($header:ident, $parser:ident, $field:expr) => {{
        let Ok(header) = $header::parse($parser) else {
            return parse_error!($field, format!("error parsing '{}' header", $header::NAME), $parser);
        };
        header
    }};
}

pub(crate) use b_map;
pub(crate) use comma_sep;
pub(crate) use hdr_list;
pub(crate) use parse_header;
pub(crate) use parse_header_param;
pub(crate) use parse_param;

pub(crate) use parse_error;
