//! Store trait and error types.
//!
//! Provides the core [`Store`] trait for abstracting document storage,
//! along with [`StoreError`] for unified error handling across backends.
//!
//! Stored documents are JSON values. Keys are flat strings chosen by the
//! caller; backends do not interpret them.

use serde_json::Value;

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Document does not exist.
    NotFound,
    /// Document already exists (for create operations).
    AlreadyExists,
    /// An update mutator rejected the mutation.
    Aborted,
    /// Stored document could not be encoded or decoded.
    Serialization,
    /// Underlying I/O failure.
    Io,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (not found, aborted, corrupt document).
    #[default]
    Permanent,
    /// Retry immediately (transient I/O).
    Temporary,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    kind: StoreErrorKind,
    status: ErrorStatus,
    key: Option<String>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            key: None,
            backend: None,
            source: None,
        }
    }

    /// Attach key context.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set retry status.
    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    /// Retry guidance.
    #[must_use]
    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    /// Key context, if attached.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Backend identifier, if attached.
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error with key context.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound).with_key(key)
    }

    /// Create an aborted error from a mutator abort.
    #[must_use]
    pub fn aborted(abort: MutationAbort) -> Self {
        let mut error = Self::new(StoreErrorKind::Aborted);
        error.source = Some(abort.0);
        error
    }

    /// Create a store error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        let status = match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted => {
                ErrorStatus::Temporary
            }
            _ => ErrorStatus::Permanent,
        };
        Self::new(StoreErrorKind::Io)
            .with_status(status)
            .with_source(err)
    }

    /// Create a store error from a JSON encode/decode failure.
    #[must_use]
    pub fn serialization(err: serde_json::Error) -> Self {
        Self::new(StoreErrorKind::Serialization).with_source(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (key: foo)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::AlreadyExists => "Already exists",
            StoreErrorKind::Aborted => "Aborted",
            StoreErrorKind::Serialization => "Invalid document",
            StoreErrorKind::Io => "I/O error",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(key) = &self.key {
            write!(f, " (key: {key})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Typed rejection raised by an update mutator.
///
/// Carries the caller's error through the store boundary without shared
/// mutable capture; recover it from the resulting [`StoreError`] via
/// [`StoreError::downcast_source`].
#[derive(Debug)]
pub struct MutationAbort(Box<dyn std::error::Error + Send + Sync>);

impl MutationAbort {
    /// Wrap a typed error as a mutation abort.
    #[must_use]
    pub fn new(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }
}

/// Mutator callback for [`Store::update`].
///
/// Receives the current document (`None` if the key is absent) and returns
/// the next document, or a [`MutationAbort`] to reject the mutation and
/// leave the stored document unchanged.
pub type Mutator<'a> = dyn FnMut(Option<&Value>) -> Result<Value, MutationAbort> + 'a;

/// Storage abstraction over keyed JSON documents.
///
/// Implementations guarantee that [`update`](Store::update) applies the
/// mutator atomically with respect to every other operation on the same
/// store: concurrent updates are serialized, and readers only ever observe
/// fully committed documents.
pub trait Store: Send + Sync {
    /// Fetch the document at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::NotFound`] if no document exists at `key`.
    fn get(&self, key: &str) -> Result<Value, StoreError>;

    /// Create the document at `key`, failing if one already exists.
    ///
    /// The existence check and the write are a single atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::AlreadyExists`] if a document is present.
    fn create(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove the document at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::NotFound`] if no document exists at `key`.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Atomically replace the document at `key` with the mutator's output.
    ///
    /// The mutator may be invoked more than once if the backend retries on
    /// conflict; it must be re-entrant. A [`MutationAbort`] returned from
    /// the mutator leaves the stored document unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::Aborted`] carrying the mutator's typed
    /// error, or a backend error if the commit itself fails.
    fn update(&self, key: &str, mutate: &mut Mutator<'_>) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct TestAbort(&'static str);

    impl std::fmt::Display for TestAbort {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for TestAbort {}

    #[test]
    fn test_store_error_new() {
        let err = StoreError::new(StoreErrorKind::NotFound);

        assert_eq!(err.kind(), StoreErrorKind::NotFound);
        assert_eq!(err.status(), ErrorStatus::Permanent);
        assert!(err.key().is_none());
        assert!(err.backend().is_none());
    }

    #[test]
    fn test_store_error_builders() {
        let err = StoreError::new(StoreErrorKind::Io)
            .with_key("content")
            .with_backend("File")
            .with_status(ErrorStatus::Temporary);

        assert_eq!(err.key(), Some("content"));
        assert_eq!(err.backend(), Some("File"));
        assert_eq!(err.status(), ErrorStatus::Temporary);
    }

    #[test]
    fn test_store_error_not_found() {
        let err = StoreError::not_found("content");

        assert_eq!(err.kind(), StoreErrorKind::NotFound);
        assert_eq!(err.key(), Some("content"));
    }

    #[test]
    fn test_store_error_io_temporary() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = StoreError::io(io_err);

        assert_eq!(err.kind(), StoreErrorKind::Io);
        assert_eq!(err.status(), ErrorStatus::Temporary);
    }

    #[test]
    fn test_store_error_io_permanent() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StoreError::io(io_err);

        assert_eq!(err.status(), ErrorStatus::Permanent);
    }

    #[test]
    fn test_store_error_display_simple() {
        let err = StoreError::new(StoreErrorKind::NotFound);

        assert_eq!(err.to_string(), "Not found");
    }

    #[test]
    fn test_store_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = StoreError::new(StoreErrorKind::NotFound)
            .with_backend("File")
            .with_key("content")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[File] Not found: no such file (key: content)"
        );
    }

    #[test]
    fn test_aborted_preserves_typed_source() {
        let err = StoreError::aborted(MutationAbort::new(TestAbort("stale")));

        assert_eq!(err.kind(), StoreErrorKind::Aborted);
        assert_eq!(err.downcast_source::<TestAbort>(), Some(&TestAbort("stale")));
    }

    #[test]
    fn test_downcast_source_wrong_type() {
        let err = StoreError::aborted(MutationAbort::new(TestAbort("stale")));

        assert!(err.downcast_source::<std::io::Error>().is_none());
    }

    #[test]
    fn test_store_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }
}
