//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Routes registered with
//! [`Router::route`] also declare their [`Endpoint`] to the router's
//! [`SysLogInterceptor`], so the route table is the marker registration table.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;
use tracing::error;

use crate::config::SysLogConfig;
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::SysLogInterceptor;
use crate::registry::Endpoint;
use crate::request::Request;
use crate::response::Response;

struct Route {
    handler: BoxedHandler,
    endpoint: Option<Endpoint>,
}

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Registration methods return `self` so they chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Route>>,
    syslog: SysLogInterceptor,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), syslog: SysLogInterceptor::default() }
    }

    /// Replaces the interceptor settings.
    pub fn with_config(mut self, config: SysLogConfig) -> Self {
        self.syslog.set_config(config);
        self
    }

    /// Registers a plain handler. It is never intercepted.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, Route { handler: handler.into_boxed_handler(), endpoint: None })
    }

    /// Registers a handler for a declared endpoint.
    ///
    /// When the endpoint carries a [`LogMarker`](crate::LogMarker), every call
    /// is logged by the interceptor. The argument list in the log is bound to
    /// the endpoint's arity from the path parameters, then the body.
    ///
    /// ```rust,no_run
    /// # use marklog::{Endpoint, LogMarker, Request, Response, Router};
    /// # use http::Method;
    /// # async fn find(_: Request) -> Response { Response::text("") }
    /// const USERS: &str = "demo::UserController";
    ///
    /// Router::new()
    ///     .route(Method::GET, "/users/{page}", Endpoint::new(USERS, "find", 1), find)
    ///     .route(
    ///         Method::GET,
    ///         "/users/{page}/{size}",
    ///         Endpoint::new(USERS, "find", 2).marked(LogMarker::new("paged find")),
    ///         find,
    ///     );
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is invalid or `endpoint` conflicts with an earlier
    /// declaration of the same method and arity.
    pub fn route(mut self, method: Method, path: &str, endpoint: Endpoint, handler: impl Handler) -> Self {
        self.syslog
            .registry_mut()
            .declare(endpoint.clone())
            .unwrap_or_else(|e| panic!("invalid endpoint for `{path}`: {e}"));
        self.add(method, path, Route { handler: handler.into_boxed_handler(), endpoint: Some(endpoint) })
    }

    pub fn interceptor(&self) -> &SysLogInterceptor {
        &self.syslog
    }

    fn add(mut self, method: Method, path: &str, route: Route) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, route)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(&Route, Vec<(String, String)>)> {
        let matched = self.routes.get(method)?.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), percent_decode_str(v).decode_utf8_lossy().into_owned()))
            .collect();
        Some((matched.value, params))
    }

    /// Routes one request and produces one response.
    pub(crate) async fn dispatch(&self, req: Request) -> Response {
        let Some((route, params)) = self.lookup(req.method(), req.path()) else {
            return Response::status(StatusCode::NOT_FOUND);
        };
        let req = req.with_params(params);
        let handler = Arc::clone(&route.handler);

        let Some(endpoint) = &route.endpoint else {
            return handler.call(req).await;
        };

        let jp = endpoint.join_point(req.arguments(endpoint.arity()));
        let ctx = req.context();
        // Handler code only starts once the interceptor polls this future.
        let call = async move { handler.call(req).await };

        match self.syslog.around(Some(&ctx), &jp, call).await {
            Ok(res) => res,
            Err(e) => {
                error!(method = %ctx.method, url = %ctx.url, "request rejected: {e}");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::LogMarker;
    use crate::middleware::{END_BANNER, START_BANNER};
    use crate::request::test_request;
    use crate::test_support::capture_logs;

    const USERS: &str = "demo::UserController";

    async fn create(req: Request) -> Response {
        Response::builder()
            .status(StatusCode::CREATED)
            .json(req.body().to_vec())
    }

    async fn find(req: Request) -> Response {
        Response::text(req.param("page").unwrap_or_default().to_owned())
    }

    async fn fail(_req: Request) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    async fn healthz(_req: Request) -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new()
            .route(
                Method::POST,
                "/users",
                Endpoint::new(USERS, "create", 1).marked(LogMarker::new("create user")),
                create,
            )
            .route(Method::GET, "/users/{page}", Endpoint::new(USERS, "find", 1), find)
            .route(
                Method::GET,
                "/users/{page}/{size}",
                Endpoint::new(USERS, "find", 2).marked(LogMarker::new("paged find")),
                find,
            )
            .route(
                Method::DELETE,
                "/users/{id}",
                Endpoint::new(USERS, "delete", 1).marked(LogMarker::new("delete user")),
                fail,
            )
            .on(Method::GET, "/healthz", healthz)
    }

    #[tokio::test]
    async fn marked_route_is_logged() {
        let (logs, _guard) = capture_logs();

        let res = app()
            .dispatch(test_request(Method::POST, "/users", br#"{"name":"a"}"#))
            .await;

        assert_eq!(res.status_code(), StatusCode::CREATED);
        assert_eq!(res.body(), br#"{"name":"a"}"#);
        let text = logs.contents();
        assert_eq!(logs.count(START_BANNER), 1);
        assert_eq!(logs.count(END_BANNER), 1);
        assert!(text.contains("URL            : http://localhost:3000/users"));
        assert!(text.contains("Description    : create user"));
        assert!(text.contains("HTTP Method    : POST"));
        assert!(text.contains("Class Method   : demo::UserController.create"));
        assert!(text.contains("IP             : 127.0.0.1"));
        assert!(text.contains(r#"Request Args   : [{"name":"a"}]"#));
    }

    #[tokio::test]
    async fn only_marked_overload_is_logged() {
        let (logs, _guard) = capture_logs();
        let app = app();

        let res = app.dispatch(test_request(Method::GET, "/users/5", b"")).await;
        assert_eq!(res.body(), b"5");
        assert_eq!(logs.count(START_BANNER), 0);

        app.dispatch(test_request(Method::GET, "/users/5/10", b"")).await;
        assert_eq!(logs.count(START_BANNER), 1);
        assert!(logs.contents().contains("Description    : paged find"));
        assert!(logs.contents().contains("Request Args   : [5,10]"));
    }

    #[tokio::test]
    async fn path_params_are_decoded() {
        let (logs, _guard) = capture_logs();

        app().dispatch(test_request(Method::DELETE, "/users/a%20b", b"")).await;

        assert!(logs.contents().contains(r#"Request Args   : ["a b"]"#));
    }

    #[tokio::test]
    async fn failing_handler_is_still_closed() {
        let (logs, _guard) = capture_logs();

        let res = app().dispatch(test_request(Method::DELETE, "/users/7", b"")).await;

        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(logs.count(START_BANNER), 1);
        assert_eq!(logs.count(END_BANNER), 1);
    }

    #[tokio::test]
    async fn plain_route_and_404_are_not_logged() {
        let (logs, _guard) = capture_logs();
        let app = app();

        let res = app.dispatch(test_request(Method::GET, "/healthz", b"")).await;
        assert_eq!(res.body(), b"ok");

        let res = app.dispatch(test_request(Method::GET, "/nope", b"")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);

        assert_eq!(logs.contents(), "");
    }

    #[test]
    fn same_endpoint_on_two_routes() {
        let endpoint = Endpoint::new(USERS, "create", 1).marked(LogMarker::new("create user"));
        let app = Router::new()
            .route(Method::POST, "/users", endpoint.clone(), create)
            .route(Method::PUT, "/users", endpoint, create);
        assert!(app.interceptor().registry().contains_type(USERS));
    }

    #[test]
    #[should_panic(expected = "invalid endpoint")]
    fn conflicting_endpoint_panics() {
        let _ = app().route(
            Method::PATCH,
            "/users/{page}",
            Endpoint::new(USERS, "find", 1).marked(LogMarker::new("oops")),
            find,
        );
    }
}
