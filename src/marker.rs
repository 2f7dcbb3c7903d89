//! The log marker attached to handler methods.

use std::borrow::Cow;

/// Declarative request-logging marker.
///
/// Attaching a marker to an [`Endpoint`](crate::Endpoint) opts that endpoint
/// into the `sys_log` before/after records. The marker is fixed once the
/// router is built; nothing reads it except the description resolver.
///
/// ```rust
/// use marklog::LogMarker;
///
/// assert_eq!(LogMarker::default().description(), "");
/// assert_eq!(LogMarker::new("create user").description(), "create user");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LogMarker {
    description: Cow<'static, str>,
}

impl LogMarker {
    pub fn new(description: impl Into<Cow<'static, str>>) -> Self {
        Self { description: description.into() }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
