use std::fmt;


/// Request methods accepted by the parser
///
/// Method names are case-sensitive, `get` is not a valid method. Anything
/// outside of this set is rejected with `405 Method Not Allowed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Head,
    Put,
    Delete,
    Options,
    Patch,
}

impl Method {
    /// Longest method name, `OPTIONS`
    pub const MAX_LEN: usize = 7;

    pub fn from_bytes(s: &[u8]) -> Option<Method> {
        match s {
            b"GET"      => Some(Method::Get),
            b"POST"     => Some(Method::Post),
            b"HEAD"     => Some(Method::Head),
            b"PUT"      => Some(Method::Put),
            b"DELETE"   => Some(Method::Delete),
            b"OPTIONS"  => Some(Method::Options),
            b"PATCH"    => Some(Method::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Head => "HEAD",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
