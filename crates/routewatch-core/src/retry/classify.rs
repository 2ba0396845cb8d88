//! Classify HTTP status and curl errors into retry policy error kinds.

use super::error::FetchError;
use super::policy::ErrorKind;

/// Classify an HTTP status code. Every non-2xx status counts as a network failure.
pub fn classify_http_status(code: u32) -> ErrorKind {
    ErrorKind::HttpStatus(u16::try_from(code).unwrap_or(u16::MAX))
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Transport
}

/// Classify a fetch error (curl, HTTP, or parse) into an ErrorKind.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http(code) => classify_http_status(*code),
        FetchError::Parse(_) => ErrorKind::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::ParseError;

    #[test]
    fn http_statuses_keep_their_code() {
        assert_eq!(classify_http_status(503), ErrorKind::HttpStatus(503));
        assert_eq!(classify_http_status(403), ErrorKind::HttpStatus(403));
    }

    #[test]
    fn parse_errors_are_malformed() {
        let e = FetchError::Parse(ParseError::NoRoutes);
        assert_eq!(classify(&e), ErrorKind::Malformed);
        assert!(!e.is_network());
        assert!(FetchError::Http(500).is_network());
    }

    #[test]
    fn curl_timeout_and_connect() {
        // CURLE_OPERATION_TIMEDOUT = 28, CURLE_COULDNT_CONNECT = 7
        assert_eq!(
            classify_curl_error(&curl::Error::new(28)),
            ErrorKind::Timeout
        );
        assert_eq!(
            classify_curl_error(&curl::Error::new(7)),
            ErrorKind::Connection
        );
    }
}
