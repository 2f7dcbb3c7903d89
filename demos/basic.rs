//! User endpoints with request logging.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -X POST http://localhost:3000/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"alice"}'
//!   curl http://localhost:3000/users/2          # find(page), not logged
//!   curl http://localhost:3000/users/2/20       # find(page, size), logged
//!   curl http://localhost:3000/healthz

use http::{Method, StatusCode};
use marklog::{Endpoint, LogMarker, Request, Response, Router, Server};
use tracing_subscriber::EnvFilter;

const USERS: &str = "demo::UserController";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = Router::new()
        .route(
            Method::POST,
            "/users",
            Endpoint::new(USERS, "create", 1).marked(LogMarker::new("create user")),
            create_user,
        )
        .route(Method::GET, "/users/{page}", Endpoint::new(USERS, "find", 1), find_users)
        .route(
            Method::GET,
            "/users/{page}/{size}",
            Endpoint::new(USERS, "find", 2).marked(LogMarker::new("paged find")),
            find_users,
        )
        .route(
            Method::DELETE,
            "/users/{id}",
            Endpoint::new(USERS, "delete", 1).marked(LogMarker::default()),
            delete_user,
        )
        .on(Method::GET, "/healthz", healthz);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// POST /users
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }
    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(r#"{"id":"99","name":"new_user"}"#)
}

// GET /users/{page} and /users/{page}/{size}
async fn find_users(req: Request) -> Response {
    let page = req.param("page").unwrap_or("1");
    let size = req.param("size").unwrap_or("10");
    Response::json(format!(r#"{{"page":{page},"size":{size},"users":[]}}"#))
}

// DELETE /users/{id} → 204 No Content
async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn healthz(_req: Request) -> &'static str {
    "ok"
}
