use std::fmt;

use crate::source::Scope;

/// A request-scoped logger for parameter extraction.
///
/// `ParamLog` is obtained from [`Request::log`](crate::Request::log) and borrows the request id,
/// so every event it emits can be correlated with the request.
///
/// Only parameter names and value types are logged. Raw values are
/// untrusted client input and never reach the log.
#[derive(Debug, Clone, Copy)]
pub struct ParamLog<'a> {
    request_id: &'a str,
}

impl<'a> ParamLog<'a> {
    /// Creates a new ParamLog for the given request id.
    pub(crate) fn new(request_id: &'a str) -> Self {
        Self { request_id }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &'a str {
        self.request_id
    }

    /// A required parameter was absent.
    pub fn missing(&self, scope: Scope, param: &str, kind: &str) {
        tracing::debug!(
            request_id = %self.request_id,
            %scope,
            param,
            kind,
            "required parameter missing"
        );
    }

    /// An optional parameter was absent and the default was returned.
    pub fn defaulted(&self, scope: Scope, param: &str, kind: &str) {
        tracing::debug!(
            request_id = %self.request_id,
            %scope,
            param,
            kind,
            "parameter absent, using default"
        );
    }

    /// A parameter was present but could not be coerced.
    pub fn invalid(&self, scope: Scope, param: &str, kind: &str, found: &str) {
        tracing::debug!(
            request_id = %self.request_id,
            %scope,
            param,
            kind,
            found,
            "parameter failed coercion"
        );
    }

    /// Logs a warning-level message with request ID.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, "{}", args);
    }

    /// Logs a debug-level message with request ID.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, "{}", args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn debug_output(emit: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn carries_request_id() {
        let log = ParamLog::new("req-9");
        assert_eq!(log.request_id(), "req-9");
    }

    #[test]
    fn extraction_events_share_the_debug_level() {
        let log = ParamLog::new("req-5");
        let output = debug_output(|| {
            log.missing(Scope::Query, "id", "int");
            log.defaulted(Scope::Query, "page", "int");
            log.invalid(Scope::Body, "qty", "int", "array");
        });

        assert_eq!(output.matches("DEBUG").count(), 3, "{output}");
        assert!(output.contains("parameter absent, using default"));
        assert!(output.contains("req-5"));
    }

    #[test]
    fn emitting_without_subscriber_is_a_no_op() {
        let log = ParamLog::new("req-1");
        log.missing(Scope::Query, "id", "int");
        log.defaulted(Scope::Body, "id", "int");
        log.invalid(Scope::Body, "id", "int", "array");
        log.warn(format_args!("body ignored"));
        log.debug(format_args!("cookie {} added", "sid"));
    }
}
