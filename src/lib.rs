pub mod classify;
pub mod client;
pub mod error;
pub mod http;
pub mod jsonapi;
pub mod options;
pub mod response;
pub mod status;

pub use classify::create_exception;
pub use client::{MockRestClient, RestClient, RestVerbs};
pub use error::{ConnectionError, ConnectionErrorKind, Error, Result, UsageError};
pub use jsonapi::JsonApiError;
pub use options::{ClientConfig, ErrorMode, RequestOptions};
pub use response::{Headers, Response};
pub use status::{StatusException, StatusKind};
