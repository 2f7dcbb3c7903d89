//! Unified error type.

/// The error type returned by marklog's fallible operations.
///
/// Application-level failures (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type covers the
/// server infrastructure and the request-logging interceptor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Binding to a port or accepting a connection failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The target type of an intercepted call is not in the marker registry.
    #[error("cannot resolve handler type `{type_name}`")]
    Resolution { type_name: String },

    /// An intercepted call arrived without the request it belongs to.
    #[error("no request context for intercepted call")]
    MissingRequestContext,

    /// Two different declarations share a type, method name, and arity.
    #[error("conflicting declaration of `{type_name}.{method}` with {arity} parameter(s)")]
    DuplicateOverload {
        type_name: String,
        method: String,
        arity: usize,
    },
}
