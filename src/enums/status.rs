/// Enum with HTTP status codes used by the server
///
/// `Custom` covers anything not listed here, its reason phrase is left
/// empty on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    //  1xx status codes
    Continue,                        // 100
    SwitchingProtocol,               // 101
    //  2xx status codes
    Ok,                              // 200
    Created,                         // 201
    Accepted,                        // 202
    NoContent,                       // 204
    PartialContent,                  // 206
    //  3xx status codes
    MovedPermanently,                // 301
    Found,                           // 302
    SeeOther,                        // 303
    NotModified,                     // 304
    TemporaryRedirect,               // 307
    PermanentRedirect,               // 308
    //  4xx status codes
    BadRequest,                      // 400
    Unauthorized,                    // 401
    Forbidden,                       // 403
    NotFound,                        // 404
    MethodNotAllowed,                // 405
    RequestTimeout,                  // 408
    Conflict,                        // 409
    LengthRequired,                  // 411
    RequestEntityTooLarge,           // 413
    RequestURITooLong,               // 414
    UnsupportedMediaType,            // 415
    ExpectationFailed,               // 417
    TooManyRequests,                 // 429
    //  5xx status codes
    InternalServerError,             // 500
    NotImplemented,                  // 501
    BadGateway,                      // 502
    ServiceUnavailable,              // 503
    VersionNotSupported,             // 505
    Custom(u16),
}

impl Status {
    pub fn code(&self) -> u16 {
        use self::Status::*;
        match *self {
            Continue                    => 100,
            SwitchingProtocol           => 101,
            Ok                          => 200,
            Created                     => 201,
            Accepted                    => 202,
            NoContent                   => 204,
            PartialContent              => 206,
            MovedPermanently            => 301,
            Found                       => 302,
            SeeOther                    => 303,
            NotModified                 => 304,
            TemporaryRedirect           => 307,
            PermanentRedirect           => 308,
            BadRequest                  => 400,
            Unauthorized                => 401,
            Forbidden                   => 403,
            NotFound                    => 404,
            MethodNotAllowed            => 405,
            RequestTimeout              => 408,
            Conflict                    => 409,
            LengthRequired              => 411,
            RequestEntityTooLarge       => 413,
            RequestURITooLong           => 414,
            UnsupportedMediaType        => 415,
            ExpectationFailed           => 417,
            TooManyRequests             => 429,
            InternalServerError         => 500,
            NotImplemented              => 501,
            BadGateway                  => 502,
            ServiceUnavailable          => 503,
            VersionNotSupported         => 505,
            Custom(code) => code,
        }
    }

    pub fn reason(&self) -> &'static str {
        use self::Status::*;
        match *self {
            Continue                    => "Continue",
            SwitchingProtocol           => "Switching Protocols",
            Ok                          => "OK",
            Created                     => "Created",
            Accepted                    => "Accepted",
            NoContent                   => "No Content",
            PartialContent              => "Partial Content",
            MovedPermanently            => "Moved Permanently",
            Found                       => "Found",
            SeeOther                    => "See Other",
            NotModified                 => "Not Modified",
            TemporaryRedirect           => "Temporary Redirect",
            PermanentRedirect           => "Permanent Redirect",
            BadRequest                  => "Bad Request",
            Unauthorized                => "Unauthorized",
            Forbidden                   => "Forbidden",
            NotFound                    => "Not Found",
            MethodNotAllowed            => "Method Not Allowed",
            RequestTimeout              => "Request Timeout",
            Conflict                    => "Conflict",
            LengthRequired              => "Length Required",
            RequestEntityTooLarge       => "Request Entity Too Large",
            RequestURITooLong           => "Request-URI Too Long",
            UnsupportedMediaType        => "Unsupported Media Type",
            ExpectationFailed           => "Expectation Failed",
            TooManyRequests             => "Too Many Requests",
            InternalServerError         => "Internal Server Error",
            NotImplemented              => "Not Implemented",
            BadGateway                  => "Bad Gateway",
            ServiceUnavailable          => "Service Unavailable",
            VersionNotSupported         => "HTTP Version Not Supported",
            Custom(_) => "",
        }
    }

    /// Returns `false` for statuses whose responses never carry a body
    ///
    /// These are 1xx (Informational), 204 (No Content) and
    /// 304 (Not Modified).
    pub fn has_body(&self) -> bool {
        let code = self.code();
        !((code >= 100 && code < 200) || code == 204 || code == 304)
    }
}

#[cfg(test)]
mod test {
    use super::Status;

    #[test]
    fn error_codes() {
        assert_eq!(Status::BadRequest.code(), 400);
        assert_eq!(Status::MethodNotAllowed.code(), 405);
        assert_eq!(Status::RequestEntityTooLarge.code(), 413);
        assert_eq!(Status::RequestURITooLong.code(), 414);
        assert_eq!(Status::ExpectationFailed.code(), 417);
        assert_eq!(Status::NotImplemented.code(), 501);
    }

    #[test]
    fn bodyless() {
        assert!(!Status::Continue.has_body());
        assert!(!Status::NoContent.has_body());
        assert!(!Status::NotModified.has_body());
        assert!(!Status::Custom(142).has_body());
        assert!(Status::Ok.has_body());
        assert!(Status::BadRequest.has_body());
    }
}
