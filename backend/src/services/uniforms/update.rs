use crate::error::ApiError;
use crate::services::uniforms::submission::{discard_files, read_submission, Submission};
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::model::uniform::Uniform;
use common::responses::DataResponse;
use log::info;

const ACTION: &str = "updating uniform";

/// `PUT /update-uniform/{id}`
///
/// - `200 OK` with `{message, data}` holding the merged record.
/// - `404 Not Found` when no record has this id.
/// - `500 Internal Server Error` when the store cannot be read or written.
pub async fn process(
    state: web::Data<AppState>,
    id: web::Path<String>,
    req: HttpRequest,
    payload: web::Payload,
) -> impl Responder {
    match update_uniform(&state, &id, &req, payload).await {
        Ok(uniform) => {
            info!("Updated uniform {}", id.as_str());
            HttpResponse::Ok().json(DataResponse::new("Uniform updated successfully!", uniform))
        }
        Err(e) => {
            e.log();
            e.error_response()
        }
    }
}

/// Merges the submitted fields into the record at its current position.
///
/// Image slots without a new upload keep their previous path. Files replaced
/// by a new upload are removed once the list has been written.
pub async fn update_uniform(
    state: &AppState,
    id: &str,
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<Uniform, ApiError> {
    let Submission { fields, files } = read_submission(req, payload, &state.uploads, ACTION).await?;

    let saved = state
        .store
        .modify(|records| {
            let uniform = records
                .iter_mut()
                .find(|u| u.id() == Some(id))
                .ok_or(ApiError::NotFound)?;
            uniform.merge_fields(fields);
            let replaced: Vec<String> = files
                .iter()
                .filter_map(|(slot, file)| uniform.set_image(*slot, file.public_path()))
                .collect();
            Ok::<_, ApiError>((uniform.clone(), replaced))
        })
        .await;

    match saved {
        Ok(Ok((uniform, replaced))) => {
            for path in &replaced {
                state.uploads.remove(path);
            }
            Ok(uniform)
        }
        Ok(Err(e)) => {
            discard_files(&files, &state.uploads);
            Err(e)
        }
        Err(e) => {
            discard_files(&files, &state.uploads);
            Err(ApiError::internal(ACTION, e))
        }
    }
}
