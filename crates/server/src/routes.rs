use std::sync::Arc;

use axum::{
    http::{header::ALLOW, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa_swagger_ui::SwaggerUi;

use common::types::{Health, Message};
use service::item_store::ItemStore;

use crate::errors::JsonApiError;

pub mod items;

pub const ROOT_MESSAGE: &str = "CRUD API is running!";

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<ItemStore>,
}

impl AppState {
    pub fn new(items: Arc<ItemStore>) -> Self {
        Self { items }
    }
}

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Service is running", body = crate::openapi::MessageDoc)))]
pub async fn root() -> Json<Message> {
    Json(Message::new(ROOT_MESSAGE))
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Unmatched paths: a trailing slash on a known route redirects (307) to the
/// route without it, anything else is a JSON 404.
async fn fallback(uri: Uri) -> Response {
    match without_trailing_slash(uri.path()) {
        Some(path) if is_known_route(path) => {
            let target = match uri.query() {
                Some(q) => format!("{path}?{q}"),
                None => path.to_string(),
            };
            Redirect::temporary(&target).into_response()
        }
        _ => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

fn without_trailing_slash(path: &str) -> Option<&str> {
    let trimmed = path.strip_suffix('/')?;
    (!trimmed.is_empty()).then_some(trimmed)
}

fn is_known_route(path: &str) -> bool {
    match path {
        "/health" | "/items" => true,
        _ => path
            .strip_prefix("/items/")
            .is_some_and(|id| !id.is_empty() && !id.contains('/')),
    }
}

/// Give axum's empty 405 responses a JSON body, keeping the `Allow` header.
async fn json_method_not_allowed(res: Response) -> Response {
    if res.status() != StatusCode::METHOD_NOT_ALLOWED {
        return res;
    }
    let mut json = JsonApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
    if let Some(allow) = res.headers().get(ALLOW) {
        json.headers_mut().insert(ALLOW, allow.clone());
    }
    json
}

/// Build the full application router: status routes, item CRUD, and API docs.
pub fn build_router(state: AppState, cors: CorsLayer, api_doc: utoipa::openapi::OpenApi) -> Router {
    let item_routes = Router::new()
        .route("/items", get(items::list_items).post(items::create_item))
        .route(
            "/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        );

    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
        .on_failure(DefaultOnFailure::new().level(Level::ERROR));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(item_routes)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", api_doc))
        .fallback(fallback)
        .layer(middleware::map_response(json_method_not_allowed))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
}
