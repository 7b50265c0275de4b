//! HTTP surface of the uniform service.
//!
//! - `health`: liveness endpoints (`GET /`, `GET /healthz`).
//! - `uniforms`: the record endpoints (list, add, update, delete).
//! - `/uploads/*`: previously uploaded images, served straight from disk.

pub mod health;
pub mod uniforms;

#[cfg(test)]
pub(crate) mod test_support;

use crate::state::AppState;
use actix_files::Files;
use actix_web::web;

/// Registers state, body limits and every route on an `App`.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let limit = state.uploads.max_bytes();
        let uploads_root = state.uploads.root().to_path_buf();
        cfg.app_data(state)
            .app_data(web::JsonConfig::default().limit(limit))
            .app_data(web::FormConfig::default().limit(limit));
        health::configure_routes(cfg);
        uniforms::configure_routes(cfg);
        cfg.service(Files::new("/uploads", uploads_root));
    }
}
