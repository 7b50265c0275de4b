use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::uniform::Uniform;

/// `GET /uniforms`: the stored list, verbatim and in order.
pub async fn process(state: web::Data<AppState>) -> impl Responder {
    match list_uniforms(&state) {
        Ok(uniforms) => HttpResponse::Ok().json(uniforms),
        Err(e) => {
            e.log();
            e.error_response()
        }
    }
}

pub fn list_uniforms(state: &AppState) -> Result<Vec<Uniform>, ApiError> {
    state
        .store
        .load_all()
        .map_err(|e| ApiError::internal("loading uniforms", e))
}
