use core::fmt;

/// Represents an error in one of the few fallible conversions of this crate.
///
/// Decoding itself never fails: the parser and the note arbiter absorb malformed input silently.
/// Errors only come out of configuration helpers, such as building a
/// [`ChannelFilter`](enum.ChannelFilter.html) from a raw channel number.
///
/// This type is a thin pointer to a static `ErrorKind`.
/// If the `std` feature is enabled, this type implements `std::error::Error`.
/// Otherwise, only `Display` and `Debug` are implemented.
#[derive(Clone, Copy, PartialEq)]
pub struct Error {
    inner: &'static ErrorKind,
}
impl Error {
    /// Create a new error with the given `ErrorKind`.
    #[inline]
    pub fn new(kind: &'static ErrorKind) -> Error {
        Error::from(kind)
    }

    /// More information about the error itself.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        *self.inner
    }
}
impl From<&'static ErrorKind> for Error {
    #[inline]
    fn from(inner: &'static ErrorKind) -> Error {
        Error { inner }
    }
}
impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}
#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// The type of error that occurred.
///
/// Specific error info is provided as a non-normative string literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value was out of the range allowed by the MIDI protocol.
    Invalid(&'static str),
}
impl ErrorKind {
    /// Get the informative message on what exact part of the MIDI format was not respected.
    #[inline]
    pub fn message(&self) -> &'static str {
        match *self {
            ErrorKind::Invalid(msg) => msg,
        }
    }
}
impl fmt::Display for ErrorKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Invalid(msg) => write!(f, "invalid midi: {}", msg),
        }
    }
}

macro_rules! err_invalid {
    ($msg:expr) => {{
        const ERR_KIND: &'static ErrorKind = &ErrorKind::Invalid($msg);
        ERR_KIND
    }};
}

/// The result type used by this crate.
pub type Result<T> = StdResult<T, Error>;
pub(crate) use core::result::Result as StdResult;
