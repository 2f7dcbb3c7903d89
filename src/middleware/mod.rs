//! Middleware layer.
//!
//! Middleware intercepts calls on their way to a handler and is the place for
//! cross-cutting concerns. marklog ships one: [`SysLogInterceptor`], which
//! writes a start record before and an end banner after every endpoint that
//! carries a [`LogMarker`](crate::LogMarker).
//!
//! The [`Router`](crate::Router) owns an interceptor and applies it to every
//! endpoint registered through [`Router::route`](crate::Router::route). It can
//! also be driven by hand, outside any server:
//!
//! ```rust
//! use marklog::middleware::SysLogInterceptor;
//! use marklog::{Endpoint, JoinPoint, LogMarker, MarkerRegistry, RequestContext, SysLogConfig};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), marklog::Error> {
//! let mut registry = MarkerRegistry::new();
//! registry.declare(
//!     Endpoint::new("demo::UserController", "create", 1).marked(LogMarker::new("create user")),
//! )?;
//! let syslog = SysLogInterceptor::new(registry, SysLogConfig::default());
//!
//! let request = RequestContext {
//!     url: "http://localhost:3000/users".into(),
//!     method: "POST".into(),
//!     remote_addr: "127.0.0.1".into(),
//! };
//! let jp = JoinPoint::new("demo::UserController", "create", vec![json!({ "name": "a" })]);
//!
//! let id = syslog.around(Some(&request), &jp, async { 99 }).await?;
//! assert_eq!(id, 99);
//! # Ok(())
//! # }
//! ```

mod syslog;

pub use syslog::{BeforeRecord, LOG_TARGET, SysLogInterceptor};

#[cfg(test)]
pub(crate) use syslog::{END_BANNER, START_BANNER};
