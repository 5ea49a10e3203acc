use actix_web::{
    body::BoxBody,
    get,
    http::{header, uri::Builder},
    web, HttpRequest, HttpResponse, Responder,
};

use crate::loader::{LoadOutcome, PageParams};
use crate::server::AppState;

const ENDPOINTS: [&str; 3] = ["/search", "/openapi.json", "/.well-known/scour/version"];

impl Responder for LoadOutcome {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse {
        match self {
            Self::Redirect { status, location } => HttpResponse::build(status)
                .insert_header((header::LOCATION, location))
                .finish(),
            Self::Data { payload } => HttpResponse::Ok().json(payload),
        }
    }
}

/// List the endpoints of this server.
#[utoipa::path(
    tag = "search",
    responses(
        (status = 200, description = "Available endpoints", body = Vec<String>),
    ),
)]
#[get("/")]
pub async fn index(req: HttpRequest) -> HttpResponse {
    let conn = req.connection_info();

    let apis = ENDPOINTS
        .into_iter()
        .filter_map(|api| {
            Builder::new()
                .authority(conn.host())
                .scheme(conn.scheme())
                .path_and_query(api)
                .build()
                .ok()
                .map(|uri| uri.to_string())
        })
        .collect::<Vec<_>>();

    HttpResponse::Ok().json(apis)
}

/// Load the data of a search results page.
///
/// Without a search term the visitor is redirected to the site root.
#[utoipa::path(
    get,
    tag = "search",
    path = "/search",
    responses(
        (status = 200, description = "Search was performed successfully", body = search_page_model::page::PageData),
        (status = 301, description = "No search term, redirect to the site root"),
        (status = BAD_REQUEST, description = "Invalid page number"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to contact the search service"),
    ),
    params(
        ("q" = Option<String>, Query, description = "Search term"),
        ("p" = Option<usize>, Query, description = "Page number, starting at zero"),
    )
)]
#[get("/search")]
pub async fn search(req: HttpRequest, state: web::Data<AppState>) -> actix_web::Result<LoadOutcome> {
    let params = PageParams::from_query(req.query_string());
    log::trace!("Loading search page using {params:?}");
    Ok(state.loader.load(params, state.backend.as_ref()).await?)
}

#[cfg(test)]
mod test {
    use crate::backend::mock::RecordingBackend;
    use crate::loader::{LoaderConfig, SearchPageLoader};
    use crate::server::{configure, AppState};
    use actix_web::{
        http::{header, StatusCode},
        test, web, App,
    };
    use scour_common::error::ErrorInformation;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn state(backend: Arc<RecordingBackend>) -> web::Data<AppState> {
        web::Data::new(AppState::new(SearchPageLoader::new(LoaderConfig::default()), backend))
    }

    #[actix_web::test]
    async fn redirect_without_query() {
        let backend = Arc::new(RecordingBackend::new(json!({})));
        let app = test::init_service(App::new().configure(|svc| configure(state(backend.clone()), svc))).await;

        let request = test::TestRequest::get().uri("/search?p=2").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        assert!(backend.requests().is_empty());
    }

    #[actix_web::test]
    async fn search_returns_page_data() {
        let backend = Arc::new(RecordingBackend::new(json!({"results": [1, 2, 3]})));
        let app = test::init_service(App::new().configure(|svc| configure(state(backend.clone()), svc))).await;

        let request = test::TestRequest::get().uri("/search?q=foo&p=3").to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;

        assert_eq!(body, json!({"data": {"results": [1, 2, 3]}}));
        assert_eq!(
            backend.requests(),
            vec![r#"{"query":"foo","limit":10,"offset":30}"#.to_string()]
        );
    }

    #[actix_web::test]
    async fn invalid_page_is_bad_request() {
        let backend = Arc::new(RecordingBackend::new(json!({})));
        let app = test::init_service(App::new().configure(|svc| configure(state(backend.clone()), svc))).await;

        let request = test::TestRequest::get().uri("/search?q=foo&p=-1").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let info: ErrorInformation = test::read_body_json(response).await;
        assert_eq!(info.error, "InvalidPage");
        assert!(backend.requests().is_empty());
    }

    #[actix_web::test]
    async fn backend_failure_is_server_error() {
        let backend = Arc::new(RecordingBackend::failing());
        let app = test::init_service(App::new().configure(|svc| configure(state(backend), svc))).await;

        let request = test::TestRequest::get().uri("/search?q=foo").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let info: ErrorInformation = test::read_body_json(response).await;
        assert_eq!(info.error, "Serialization");
    }

    #[actix_web::test]
    async fn index_lists_endpoints() {
        let backend = Arc::new(RecordingBackend::new(json!({})));
        let app = test::init_service(App::new().configure(|svc| configure(state(backend), svc))).await;

        let request = test::TestRequest::get().uri("/").to_request();
        let apis: Vec<String> = test::call_and_read_body_json(&app, request).await;

        assert!(apis.iter().any(|api| api.ends_with("/search")));
    }
}
