use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::uniform::Uniform;
use common::responses::MessageResponse;
use log::info;

const ACTION: &str = "deleting uniform";

/// `DELETE /delete-uniform/{id}`
pub async fn process(state: web::Data<AppState>, id: web::Path<String>) -> impl Responder {
    match delete_uniform(&state, &id).await {
        Ok(()) => {
            info!("Deleted uniform {}", id.as_str());
            HttpResponse::Ok().json(MessageResponse::new("Uniform deleted successfully!"))
        }
        Err(e) => {
            e.log();
            e.error_response()
        }
    }
}

/// Removes every record with `id`, keeping the order of the rest, then
/// deletes the removed records' image files.
pub async fn delete_uniform(state: &AppState, id: &str) -> Result<(), ApiError> {
    let removed = state
        .store
        .modify(|records| {
            let (removed, kept): (Vec<Uniform>, Vec<Uniform>) =
                std::mem::take(records).into_iter().partition(|u| u.id() == Some(id));
            *records = kept;
            if removed.is_empty() {
                return Err(ApiError::NotFound);
            }
            Ok(removed)
        })
        .await
        .map_err(|e| ApiError::internal(ACTION, e))??;

    for uniform in &removed {
        for path in uniform.images() {
            state.uploads.remove(path);
        }
    }
    Ok(())
}
