use std::fmt;

/// HTTP status code used for every client-input error raised by this crate.
pub const BAD_REQUEST: u16 = 400;

/// Errors that can occur while handling request parameters, bodies, or configuration.
#[derive(Debug)]
pub enum Error {
    /// A request parameter was missing or could not be coerced
    Param(ParamError),
    /// The request body could not be decoded into parameters
    Body(BodyError),
    /// Configuration could not be loaded
    Config(ConfigError),
}

impl Error {
    /// Returns the HTTP status code a host framework should answer with.
    ///
    /// Parameter and body errors are caused by the client (`400`).
    /// Configuration errors are server faults (`500`).
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Param(e) => e.status_code(),
            Error::Body(_) => BAD_REQUEST,
            Error::Config(_) => 500,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Param(e) => write!(f, "{}", e),
            Error::Body(e) => write!(f, "{}", e),
            Error::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Param(e) => Some(e),
            Error::Body(e) => Some(e),
            Error::Config(e) => Some(e),
        }
    }
}

impl From<ParamError> for Error {
    fn from(e: ParamError) -> Self {
        Error::Param(e)
    }
}

impl From<BodyError> for Error {
    fn from(e: BodyError) -> Self {
        Error::Body(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

/// A request parameter that was absent or held an unusable value.
///
/// The error carries only the parameter name, never the rejected value,
/// so it can be echoed back to the client or logged as-is.
///
/// # Examples
///
/// ```
/// use web_params::{ParamError, ParamErrorKind};
///
/// let err = ParamError::missing("id");
/// assert_eq!(err.kind(), ParamErrorKind::Missing);
/// assert_eq!(err.name(), "id");
/// assert_eq!(err.status_code(), 400);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    kind: ParamErrorKind,
    name: String,
}

impl ParamError {
    /// Creates a new parameter error.
    pub fn new(kind: ParamErrorKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// A required parameter was absent (or, for query parameters, empty).
    pub fn missing(name: impl Into<String>) -> Self {
        Self::new(ParamErrorKind::Missing, name)
    }

    /// A present parameter could not be converted to the requested kind.
    pub fn invalid(name: impl Into<String>) -> Self {
        Self::new(ParamErrorKind::Invalid, name)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ParamErrorKind {
        self.kind
    }

    /// Returns the offending parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Both kinds are client errors.
    pub fn status_code(&self) -> u16 {
        BAD_REQUEST
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParamErrorKind::Missing => write!(f, "Missing required parameter: {}", self.name),
            ParamErrorKind::Invalid => write!(f, "Invalid value for parameter: {}", self.name),
        }
    }
}

impl std::error::Error for ParamError {}

/// The kind of parameter error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamErrorKind {
    /// The parameter is required but was not supplied
    Missing,
    /// The parameter was supplied but cannot be coerced
    Invalid,
}

impl fmt::Display for ParamErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamErrorKind::Missing => write!(f, "missing"),
            ParamErrorKind::Invalid => write!(f, "invalid"),
        }
    }
}

/// A request body that could not be turned into body parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyError {
    /// The body is not valid JSON
    MalformedJson(String),
    /// The JSON body is valid but its root is not an object
    NotAnObject,
    /// The form body could not be decoded
    MalformedForm(String),
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::MalformedJson(msg) => write!(f, "Malformed JSON body: {}", msg),
            BodyError::NotAnObject => write!(f, "JSON body must be an object"),
            BodyError::MalformedForm(msg) => write!(f, "Malformed form body: {}", msg),
        }
    }
}

impl std::error::Error for BodyError {}

/// Configuration that failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying parser message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid configuration: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_error_display_names_the_parameter() {
        assert_eq!(
            ParamError::missing("page").to_string(),
            "Missing required parameter: page"
        );
        assert_eq!(
            ParamError::invalid("page").to_string(),
            "Invalid value for parameter: page"
        );
    }

    #[test]
    fn param_errors_are_bad_requests() {
        assert_eq!(ParamError::missing("a").status_code(), 400);
        assert_eq!(ParamError::invalid("a").status_code(), 400);
    }

    #[test]
    fn crate_error_wraps_and_maps_status() {
        let err: Error = ParamError::invalid("id").into();
        assert_eq!(err.status_code(), 400);
        assert!(matches!(err, Error::Param(ref e) if e.name() == "id"));

        let err: Error = BodyError::NotAnObject.into();
        assert_eq!(err.status_code(), 400);

        let err: Error = ConfigError::new("bad").into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn error_kinds_display() {
        assert_eq!(format!("{}", ParamErrorKind::Missing), "missing");
        assert_eq!(format!("{}", ParamErrorKind::Invalid), "invalid");
    }

    #[test]
    fn source_is_exposed() {
        use std::error::Error as _;
        let err: Error = ParamError::missing("x").into();
        assert!(err.source().is_some());
    }
}
