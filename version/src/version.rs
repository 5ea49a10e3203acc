use super::*;
use actix_web::{
    get,
    web::{self, ServiceConfig},
    HttpResponse,
};

#[utoipa::path(
    tag = "well-known",
    responses(
        (status = 200, description = "Get version information", body = VersionInformation),
    ),
)]
#[get("/.well-known/scour/version")]
pub async fn version_fn(version: web::Data<VersionInformation>) -> HttpResponse {
    HttpResponse::Ok().json(version)
}

/// Mount the version endpoint, serving the provided information.
pub fn configure(version: VersionInformation, config: &mut ServiceConfig) {
    config.app_data(web::Data::new(version)).service(version_fn);
}
