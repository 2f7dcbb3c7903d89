//! # marklog
//!
//! A minimal HTTP framework with marker-driven request logging.
//!
//! Handlers are registered against an [`Endpoint`]: the handler type, method
//! name, and arity they stand for. Endpoints that carry a [`LogMarker`] are
//! wrapped by the [`SysLogInterceptor`](middleware::SysLogInterceptor), which
//! writes one start record before the handler runs and one end banner after
//! it finishes, fails, or is cancelled:
//!
//! ```text
//! ========================================== Start ==========================================
//! URL            : http://localhost:3000/users
//! Description    : create user
//! HTTP Method    : POST
//! Class Method   : demo::UserController.create
//! IP             : 127.0.0.1
//! Request Args   : [{"name":"alice"}]
//! =========================================== End ===========================================
//! ```
//!
//! Records go to the `sys_log` `tracing` target at INFO. Installing a
//! subscriber is left to the application.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::{Method, StatusCode};
//! use marklog::{Endpoint, LogMarker, Request, Response, Router, Server};
//!
//! const USERS: &str = "demo::UserController";
//!
//! #[tokio::main]
//! async fn main() -> Result<(), marklog::Error> {
//!     let app = Router::new()
//!         .route(
//!             Method::POST,
//!             "/users",
//!             Endpoint::new(USERS, "create", 1).marked(LogMarker::new("create user")),
//!             create_user,
//!         )
//!         .on(Method::GET, "/healthz", |_req: Request| async { "ok" });
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! async fn create_user(req: Request) -> Response {
//!     if req.body().is_empty() {
//!         return Response::status(StatusCode::BAD_REQUEST);
//!     }
//!     Response::builder()
//!         .status(StatusCode::CREATED)
//!         .header("location", "/users/99")
//!         .json(r#"{"id":99}"#)
//! }
//! ```

mod config;
mod context;
mod error;
mod handler;
mod marker;
mod registry;
mod request;
mod response;
mod router;
mod server;

#[cfg(test)]
mod test_support;

pub mod middleware;

pub use config::{ResolutionPolicy, SysLogConfig};
pub use context::{InterceptedCall, JoinPoint, RequestContext, Signature};
pub use error::Error;
pub use handler::Handler;
pub use marker::LogMarker;
pub use registry::{Endpoint, MarkerRegistry};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
