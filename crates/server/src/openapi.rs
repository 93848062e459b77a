use configs::ApiConfig;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub detail: String }

#[derive(ToSchema)]
pub struct ItemDoc {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub done: bool,
}

/// Create/update body. `id` is ignored; `done` defaults to false.
#[derive(ToSchema)]
pub struct ItemInputDoc {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    #[schema(default = false)]
    pub done: Option<bool>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::root,
        crate::routes::health,
        crate::routes::items::create_item,
        crate::routes::items::list_items,
        crate::routes::items::get_item,
        crate::routes::items::update_item,
        crate::routes::items::delete_item,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            ErrorDoc,
            ItemDoc,
            ItemInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "items")
    )
)]
pub struct ApiDoc;

/// The OpenAPI document with title and version taken from config.
pub fn api_doc(cfg: &ApiConfig) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = cfg.title.clone();
    doc.info.version = cfg.version.clone();
    doc
}
