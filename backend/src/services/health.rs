use actix_web::web::{self, get};
use actix_web::HttpResponse;

async fn root() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Backend running fine!")
}

/// Probe target for the hosting platform.
async fn healthz() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("OK")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", get().to(root))
        .route("/healthz", get().to(healthz));
}
