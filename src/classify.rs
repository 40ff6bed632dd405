//! Turns a completed exchange into a success value or a typed exception.

use log::debug;

use crate::options::ErrorMode;
use crate::response::Response;
use crate::status::{StatusException, StatusKind, is_success};

/// Classifies a terminal response.
///
/// In [`ErrorMode::Response`] every response is returned unchanged. Otherwise
/// recognized 2xx statuses succeed and everything else becomes the
/// [`StatusException`] for its status.
pub fn classify(response: Response, error_mode: ErrorMode) -> Result<Response, StatusException> {
    if error_mode == ErrorMode::Response || is_success(response.status_code) {
        return Ok(response);
    }

    let exception = StatusException::from_response(response);
    debug!(
        "Classified HTTP {} as {:?} with {} structured error(s)",
        exception.status_code(),
        exception.kind(),
        exception.error_count()
    );
    Err(exception)
}

/// Classifies a redirect response that cannot be followed.
///
/// Without a usable `Location` the redirect status says nothing reliable, so
/// it is reported as an unknown upstream error.
pub fn classify_unroutable(
    response: Response,
    error_mode: ErrorMode,
) -> Result<Response, StatusException> {
    match error_mode {
        ErrorMode::Response => Ok(response),
        ErrorMode::Throw => Err(StatusException::with_kind(
            StatusKind::UnknownError,
            response,
        )),
    }
}

/// Builds the exception the classifier would produce for `response`,
/// ignoring error mode and the success set.
///
/// Handy for priming [`MockRestClient::mock_reject`](crate::client::MockRestClient::mock_reject).
pub fn create_exception(response: Response) -> StatusException {
    StatusException::from_response(response)
}
