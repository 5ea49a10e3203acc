use std::sync::Arc;

use actix_web::{
    get,
    web::{self, ServiceConfig},
    HttpResponse,
};
use utoipa::OpenApi;

use crate::backend::SearchBackend;
use crate::endpoints;
use crate::loader::SearchPageLoader;

#[derive(OpenApi)]
#[openapi(
    paths(
        endpoints::index,
        endpoints::search,
        scour_version::version::version_fn,
    ),
    components(
        schemas(
            search_page_model::page::PageData,
            search_page_model::search::SearchRequest,

            scour_version::VersionInformation,
            scour_version::Version,
            scour_version::Git,
            scour_version::Build,
        )
    ),
    tags(
        (name = "search", description = "Search page endpoints"),
        (name = "well-known", description = ".well-known endpoints"),
    ),
)]
pub struct ApiDoc;

/// State shared by all requests.
pub struct AppState {
    pub loader: SearchPageLoader,
    pub backend: Arc<dyn SearchBackend>,
}

impl AppState {
    pub fn new(loader: SearchPageLoader, backend: Arc<dyn SearchBackend>) -> Self {
        Self { loader, backend }
    }
}

#[get("/openapi.json")]
async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Mount the search page endpoints.
pub fn configure(state: web::Data<AppState>, svc: &mut ServiceConfig) {
    svc.app_data(state)
        .service(endpoints::index)
        .service(endpoints::search)
        .service(openapi_json);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::mock::RecordingBackend;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    #[::core::prelude::v1::test]
    fn openapi_describes_search() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/search"));
        assert!(doc.paths.paths.contains_key("/.well-known/scour/version"));
    }

    #[actix_web::test]
    async fn serves_openapi_document() {
        let state = web::Data::new(AppState::new(
            SearchPageLoader::default(),
            Arc::new(RecordingBackend::new(json!({}))),
        ));
        let app = test::init_service(App::new().configure(|svc| configure(state, svc))).await;

        let request = test::TestRequest::get().uri("/openapi.json").to_request();
        let doc: Value = test::call_and_read_body_json(&app, request).await;

        assert!(doc["paths"]["/search"].is_object());
    }

    #[actix_web::test]
    async fn serves_version() {
        let app = test::init_service(
            App::new().configure(|svc| scour_version::version::configure(scour_version::version!(), svc)),
        )
        .await;

        let request = test::TestRequest::get().uri("/.well-known/scour/version").to_request();
        let info: scour_version::VersionInformation = test::call_and_read_body_json(&app, request).await;

        assert_eq!(info.name, "search-page-api");
        assert_eq!(info.version.full, env!("CARGO_PKG_VERSION"));
    }
}
