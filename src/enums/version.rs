use std::fmt;

/// Enum reprsenting HTTP version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Copy)]
pub enum Version {
    Http10,
    Http11,
}

impl Version {
    /// Parses the version segment of a request line
    ///
    /// The segment must be exactly 8 bytes: `HTTP/1.0` or `HTTP/1.1`.
    pub fn from_request_line(segment: &[u8]) -> Option<Version> {
        if segment.len() != 8 || !segment.starts_with(b"HTTP/1.") {
            return None;
        }
        match segment[7] {
            b'0' => Some(Version::Http10),
            b'1' => Some(Version::Http11),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Version::Http10 => f.write_str("HTTP/1.0"),
            Version::Http11 => f.write_str("HTTP/1.1"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Version;

    #[test]
    fn request_line_versions() {
        assert_eq!(Version::from_request_line(b"HTTP/1.0"),
                   Some(Version::Http10));
        assert_eq!(Version::from_request_line(b"HTTP/1.1"),
                   Some(Version::Http11));
        assert_eq!(Version::from_request_line(b"HTTP/1.2"), None);
        assert_eq!(Version::from_request_line(b"HTTP/2.0"), None);
        assert_eq!(Version::from_request_line(b"HTTP/1.1 "), None);
        assert_eq!(Version::from_request_line(b"HTTP/1."), None);
    }

    #[test]
    fn ordering() {
        assert!(Version::Http11 > Version::Http10);
    }
}
