//! HTTP status taxonomy.
//!
//! Every non-success status maps to exactly one [`StatusKind`]. Codes with no
//! dedicated variant fall back to [`StatusKind::UnknownError`], so the lookup is
//! total and never fails.

mod exception;

pub use exception::{StatusException, bucket_of};

use std::fmt;

/// Statuses treated as success by the classifier.
const SUCCESS_CODES: &[u16] = &[200, 201, 202, 203, 204, 205, 206, 207, 208, 226];

/// Returns true if `status` is one of the recognized 2xx success codes.
///
/// Unregistered 2xx codes such as 299 are not successes.
pub fn is_success(status: u16) -> bool {
    SUCCESS_CODES.contains(&status)
}

/// One exception kind per mapped HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    MovedPermanently,
    Found,
    SeeOther,
    NotModified,
    UseProxy,
    Unused,
    TemporaryRedirect,
    PermanentRedirect,
    BadRequest,
    Unauthorized,
    PaymentRequired,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    ProxyAuthenticationRequired,
    RequestTimeout,
    Conflict,
    Gone,
    LengthRequired,
    PreconditionFailed,
    RequestEntityTooLarge,
    RequestUriTooLong,
    UnsupportedMediaType,
    RequestedRangeNotSatisfiable,
    ExpectationFailed,
    ImATeapot,
    MisdirectedRequest,
    UnprocessableEntity,
    PreconditionRequired,
    TooManyRequests,
    RequestHeaderFieldsTooLarge,
    UnavailableForLegalReasons,
    InternalServerError,
    NotImplemented,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    HttpVersionNotSupported,
    NetworkAuthenticationRequired,
    /// Unknown upstream error. Also the fallback for every unmapped code.
    UnknownError,
    ConnectionTimedOut,
    TimeoutOccurred,
}

impl StatusKind {
    /// All variants, ordered by status code.
    pub const ALL: [StatusKind; 43] = [
        StatusKind::MovedPermanently,
        StatusKind::Found,
        StatusKind::SeeOther,
        StatusKind::NotModified,
        StatusKind::UseProxy,
        StatusKind::Unused,
        StatusKind::TemporaryRedirect,
        StatusKind::PermanentRedirect,
        StatusKind::BadRequest,
        StatusKind::Unauthorized,
        StatusKind::PaymentRequired,
        StatusKind::Forbidden,
        StatusKind::NotFound,
        StatusKind::MethodNotAllowed,
        StatusKind::NotAcceptable,
        StatusKind::ProxyAuthenticationRequired,
        StatusKind::RequestTimeout,
        StatusKind::Conflict,
        StatusKind::Gone,
        StatusKind::LengthRequired,
        StatusKind::PreconditionFailed,
        StatusKind::RequestEntityTooLarge,
        StatusKind::RequestUriTooLong,
        StatusKind::UnsupportedMediaType,
        StatusKind::RequestedRangeNotSatisfiable,
        StatusKind::ExpectationFailed,
        StatusKind::ImATeapot,
        StatusKind::MisdirectedRequest,
        StatusKind::UnprocessableEntity,
        StatusKind::PreconditionRequired,
        StatusKind::TooManyRequests,
        StatusKind::RequestHeaderFieldsTooLarge,
        StatusKind::UnavailableForLegalReasons,
        StatusKind::InternalServerError,
        StatusKind::NotImplemented,
        StatusKind::BadGateway,
        StatusKind::ServiceUnavailable,
        StatusKind::GatewayTimeout,
        StatusKind::HttpVersionNotSupported,
        StatusKind::NetworkAuthenticationRequired,
        StatusKind::UnknownError,
        StatusKind::ConnectionTimedOut,
        StatusKind::TimeoutOccurred,
    ];

    /// Looks up the variant for an HTTP status.
    ///
    /// Total over `u16`: anything without an exact entry is `UnknownError`.
    pub fn for_status(status: u16) -> StatusKind {
        match status {
            301 => StatusKind::MovedPermanently,
            302 => StatusKind::Found,
            303 => StatusKind::SeeOther,
            304 => StatusKind::NotModified,
            305 => StatusKind::UseProxy,
            306 => StatusKind::Unused,
            307 => StatusKind::TemporaryRedirect,
            308 => StatusKind::PermanentRedirect,
            400 => StatusKind::BadRequest,
            401 => StatusKind::Unauthorized,
            402 => StatusKind::PaymentRequired,
            403 => StatusKind::Forbidden,
            404 => StatusKind::NotFound,
            405 => StatusKind::MethodNotAllowed,
            406 => StatusKind::NotAcceptable,
            407 => StatusKind::ProxyAuthenticationRequired,
            408 => StatusKind::RequestTimeout,
            409 => StatusKind::Conflict,
            410 => StatusKind::Gone,
            411 => StatusKind::LengthRequired,
            412 => StatusKind::PreconditionFailed,
            413 => StatusKind::RequestEntityTooLarge,
            414 => StatusKind::RequestUriTooLong,
            415 => StatusKind::UnsupportedMediaType,
            416 => StatusKind::RequestedRangeNotSatisfiable,
            417 => StatusKind::ExpectationFailed,
            418 => StatusKind::ImATeapot,
            421 => StatusKind::MisdirectedRequest,
            422 => StatusKind::UnprocessableEntity,
            428 => StatusKind::PreconditionRequired,
            429 => StatusKind::TooManyRequests,
            431 => StatusKind::RequestHeaderFieldsTooLarge,
            451 => StatusKind::UnavailableForLegalReasons,
            500 => StatusKind::InternalServerError,
            501 => StatusKind::NotImplemented,
            502 => StatusKind::BadGateway,
            503 => StatusKind::ServiceUnavailable,
            504 => StatusKind::GatewayTimeout,
            505 => StatusKind::HttpVersionNotSupported,
            511 => StatusKind::NetworkAuthenticationRequired,
            522 => StatusKind::ConnectionTimedOut,
            524 => StatusKind::TimeoutOccurred,
            _ => StatusKind::UnknownError,
        }
    }

    /// The status code this variant is keyed to.
    pub fn code(self) -> u16 {
        match self {
            StatusKind::MovedPermanently => 301,
            StatusKind::Found => 302,
            StatusKind::SeeOther => 303,
            StatusKind::NotModified => 304,
            StatusKind::UseProxy => 305,
            StatusKind::Unused => 306,
            StatusKind::TemporaryRedirect => 307,
            StatusKind::PermanentRedirect => 308,
            StatusKind::BadRequest => 400,
            StatusKind::Unauthorized => 401,
            StatusKind::PaymentRequired => 402,
            StatusKind::Forbidden => 403,
            StatusKind::NotFound => 404,
            StatusKind::MethodNotAllowed => 405,
            StatusKind::NotAcceptable => 406,
            StatusKind::ProxyAuthenticationRequired => 407,
            StatusKind::RequestTimeout => 408,
            StatusKind::Conflict => 409,
            StatusKind::Gone => 410,
            StatusKind::LengthRequired => 411,
            StatusKind::PreconditionFailed => 412,
            StatusKind::RequestEntityTooLarge => 413,
            StatusKind::RequestUriTooLong => 414,
            StatusKind::UnsupportedMediaType => 415,
            StatusKind::RequestedRangeNotSatisfiable => 416,
            StatusKind::ExpectationFailed => 417,
            StatusKind::ImATeapot => 418,
            StatusKind::MisdirectedRequest => 421,
            StatusKind::UnprocessableEntity => 422,
            StatusKind::PreconditionRequired => 428,
            StatusKind::TooManyRequests => 429,
            StatusKind::RequestHeaderFieldsTooLarge => 431,
            StatusKind::UnavailableForLegalReasons => 451,
            StatusKind::InternalServerError => 500,
            StatusKind::NotImplemented => 501,
            StatusKind::BadGateway => 502,
            StatusKind::ServiceUnavailable => 503,
            StatusKind::GatewayTimeout => 504,
            StatusKind::HttpVersionNotSupported => 505,
            StatusKind::NetworkAuthenticationRequired => 511,
            StatusKind::UnknownError => 520,
            StatusKind::ConnectionTimedOut => 522,
            StatusKind::TimeoutOccurred => 524,
        }
    }

    /// Fixed human-readable message for this variant.
    pub fn message(self) -> &'static str {
        match self {
            StatusKind::MovedPermanently => "Moved Permanently",
            StatusKind::Found => "Found",
            StatusKind::SeeOther => "See Other",
            StatusKind::NotModified => "Not Modified",
            StatusKind::UseProxy => "Use Proxy",
            StatusKind::Unused => "Unused",
            StatusKind::TemporaryRedirect => "Temporary Redirect",
            StatusKind::PermanentRedirect => "Permanent Redirect",
            StatusKind::BadRequest => "Bad Request",
            StatusKind::Unauthorized => "Unauthorized",
            StatusKind::PaymentRequired => "Payment Required",
            StatusKind::Forbidden => "Forbidden",
            StatusKind::NotFound => "Not Found",
            StatusKind::MethodNotAllowed => "Method Not Allowed",
            StatusKind::NotAcceptable => "Not Acceptable",
            StatusKind::ProxyAuthenticationRequired => "Proxy Authentication Required",
            StatusKind::RequestTimeout => "Request Timeout",
            StatusKind::Conflict => "Conflict",
            StatusKind::Gone => "Gone",
            StatusKind::LengthRequired => "Length Required",
            StatusKind::PreconditionFailed => "Precondition Failed",
            StatusKind::RequestEntityTooLarge => "Request Entity Too Large",
            StatusKind::RequestUriTooLong => "Request-URI Too Long",
            StatusKind::UnsupportedMediaType => "Unsupported Media Type",
            StatusKind::RequestedRangeNotSatisfiable => "Requested Range Not Satisfiable",
            StatusKind::ExpectationFailed => "Expectation Failed",
            StatusKind::ImATeapot => "I'm a teapot",
            StatusKind::MisdirectedRequest => "Misdirected Request",
            StatusKind::UnprocessableEntity => "Unprocessable Entity",
            StatusKind::PreconditionRequired => "Precondition Required",
            StatusKind::TooManyRequests => "Too Many Requests",
            StatusKind::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
            StatusKind::UnavailableForLegalReasons => "Unavailable For Legal Reasons",
            StatusKind::InternalServerError => "Internal Server Error",
            StatusKind::NotImplemented => "Not Implemented",
            StatusKind::BadGateway => "Bad Gateway",
            StatusKind::ServiceUnavailable => "Service Unavailable",
            StatusKind::GatewayTimeout => "Gateway Timeout",
            StatusKind::HttpVersionNotSupported => "HTTP Version Not Supported",
            StatusKind::NetworkAuthenticationRequired => "Network Authentication Required",
            StatusKind::UnknownError => "Web Server Is Returning An Unknown Error",
            StatusKind::ConnectionTimedOut => "Connection Timed Out",
            StatusKind::TimeoutOccurred => "A Timeout Occurred",
        }
    }

    // Keyed to the variant's own code: `UnknownError` is always 5xx here.
    // `StatusException` has predicates keyed to the status actually sent.

    /// Returns true for the 3xx variants.
    pub fn is_redirection(self) -> bool {
        (300..400).contains(&self.code())
    }

    /// Returns true for the 4xx variants.
    pub fn is_client_error(self) -> bool {
        (400..500).contains(&self.code())
    }

    /// Returns true for the 5xx variants, including the unknown-upstream fallback.
    pub fn is_server_error(self) -> bool {
        (500..600).contains(&self.code())
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}
