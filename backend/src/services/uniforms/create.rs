use crate::error::ApiError;
use crate::services::uniforms::submission::{discard_files, read_submission, Submission};
use crate::state::AppState;
use crate::store::next_id;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::model::uniform::Uniform;
use common::responses::DataResponse;
use log::info;

const ACTION: &str = "adding uniform";

/// `POST /add-uniform`
///
/// - `200 OK` with `{message, data}` holding the new record.
/// - `400 Bad Request` when `school` or `uniformCombo` is missing or the body is malformed.
pub async fn process(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> impl Responder {
    match create_uniform(&state, &req, payload).await {
        Ok(uniform) => {
            info!(
                "Added new uniform {} ({})",
                uniform.id().unwrap_or_default(),
                uniform.school().unwrap_or_default()
            );
            HttpResponse::Ok().json(DataResponse::new("Uniform added successfully!", uniform))
        }
        Err(e) => {
            e.log();
            e.error_response()
        }
    }
}

pub async fn create_uniform(
    state: &AppState,
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<Uniform, ApiError> {
    let Submission { fields, files } = read_submission(req, payload, &state.uploads, ACTION).await?;

    let mut draft = match Uniform::from_fields(String::new(), fields) {
        Some(draft) => draft,
        None => {
            discard_files(&files, &state.uploads);
            return Err(ApiError::MissingRequiredFields);
        }
    };
    for (slot, file) in &files {
        draft.set_image(*slot, file.public_path());
    }

    let saved = state
        .store
        .modify(move |records| {
            draft.set_id(next_id(records));
            records.push(draft.clone());
            Ok::<_, ApiError>(draft)
        })
        .await;

    match saved {
        Ok(Ok(uniform)) => Ok(uniform),
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

#[cfg(test)]
mod tests {
    use crate::services::test_support::{
        init_app, list, stored_files, test_app, test_state, test_state_with_limit, MultipartBody,
    };
    use actix_web::http::StatusCode;
    use actix_web::test;
    use common::model::image_slot::ImageSlot;
    use common::model::uniform::Uniform;
    use common::responses::DataResponse;
    use serde_json::json;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[actix_web::test]
    async fn created_record_is_appended_with_image_paths() {
        let dir = TempDir::new().expect("tempdir");
        let app = test_app(&dir).await;

        let req = MultipartBody::new()
            .text("school", "Hillcrest")
            .text("schoolType", "Secondary")
            .text("uniformCombo", "white shirt, navy skirt")
            .text("churchWear", "all white")
            .file("uniformImage", "front.jpg", b"jpeg bytes")
            .file("churchImage", "church.png", b"png bytes")
            .into_request(test::TestRequest::post().uri("/add-uniform"));
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let created: DataResponse<Uniform> = test::read_body_json(resp).await;

        assert_eq!(created.message, "Uniform added successfully!");
        let uniform = created.data;
        assert!(!uniform.id().expect("id").is_empty());
        assert_eq!(uniform.school(), Some("Hillcrest"));
        assert_eq!(uniform.school_type(), Some("Secondary"));
        assert_eq!(uniform.compound_wear(), None);
        assert_eq!(uniform.church_wear(), Some("all white"));
        assert_eq!(uniform.image(ImageSlot::CompoundImage), None);

        let front = uniform.image(ImageSlot::UniformImage).expect("uniform image");
        let church = uniform.image(ImageSlot::ChurchImage).expect("church image");
        assert!(front.starts_with("/uploads/") && front.ends_with(".jpg"));
        assert!(church.starts_with("/uploads/") && church.ends_with(".png"));
        assert_ne!(front, church);
        assert_eq!(stored_files(&dir).len(), 2);

        let served = test::call_and_read_body(&app, test::TestRequest::get().uri(front).to_request()).await;
        assert_eq!(served, "jpeg bytes");

        let listed = list(&app).await;
        assert_eq!(listed.last(), Some(&uniform));
        assert_eq!(listed.iter().filter(|u| u.id() == uniform.id()).count(), 1);
    }

    #[actix_web::test]
    async fn missing_school_is_rejected_without_side_effects() {
        let dir = TempDir::new().expect("tempdir");
        let app = test_app(&dir).await;

        let req = MultipartBody::new()
            .text("uniformCombo", "blue")
            .file("uniformImage", "front.jpg", b"bytes")
            .into_request(test::TestRequest::post().uri("/add-uniform"));
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "School name and uniform combination are required.");

        assert!(list(&app).await.is_empty());
        assert!(stored_files(&dir).is_empty());
    }

    #[actix_web::test]
    async fn empty_required_field_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let app = test_app(&dir).await;

        let req = MultipartBody::new()
            .text("school", "")
            .text("uniformCombo", "blue")
            .into_request(test::TestRequest::post().uri("/add-uniform"));
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(list(&app).await.is_empty());
    }

    #[actix_web::test]
    async fn json_and_urlencoded_bodies_are_accepted() {
        let dir = TempDir::new().expect("tempdir");
        let app = test_app(&dir).await;

        let req = test::TestRequest::post()
            .uri("/add-uniform")
            .set_json(serde_json::json!({"school": "Json High", "uniformCombo": "grey"}))
            .to_request();
        let created: DataResponse<Uniform> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.data.school(), Some("Json High"));
        assert_eq!(created.data.images().count(), 0);

        let req = test::TestRequest::post()
            .uri("/add-uniform")
            .set_form([("school", "Form High"), ("uniformCombo", "green")])
            .to_request();
        let created: DataResponse<Uniform> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.data.uniform_combo(), Some("green"));

        let listed = list(&app).await;
        let schools: Vec<&str> = listed.iter().filter_map(|u| u.school()).collect();
        assert_eq!(schools, vec!["Json High", "Form High"]);
    }

    #[actix_web::test]
    async fn unexpected_file_field_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let app = test_app(&dir).await;

        let req = MultipartBody::new()
            .text("school", "Hill")
            .text("uniformCombo", "blue")
            .file("uniformImage", "a.jpg", b"a")
            .file("uniformImage", "b.jpg", b"b")
            .into_request(test::TestRequest::post().uri("/add-uniform"));
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(list(&app).await.is_empty());
        assert!(stored_files(&dir).is_empty());

        let req = MultipartBody::new()
            .text("school", "Hill")
            .text("uniformCombo", "blue")
            .file("avatar", "a.jpg", b"a")
            .into_request(test::TestRequest::post().uri("/add-uniform"));
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unselected_file_inputs_are_ignored() {
        let dir = TempDir::new().expect("tempdir");
        let app = test_app(&dir).await;

        let req = MultipartBody::new()
            .text("school", "Hill")
            .text("uniformCombo", "blue")
            .file("compoundImage", "", b"")
            .into_request(test::TestRequest::post().uri("/add-uniform"));
        let created: DataResponse<Uniform> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.data.image(ImageSlot::CompoundImage), None);
        assert!(stored_files(&dir).is_empty());
    }

    #[actix_web::test]
    async fn round_trip_matches_creation_response() {
        let dir = TempDir::new().expect("tempdir");
        let app = test_app(&dir).await;

        let req = MultipartBody::new()
            .text("school", "Round")
            .text("uniformCombo", "trip")
            .text("compoundWear", "house shirt")
            .file("compoundImage", "c.webp", b"img")
            .into_request(test::TestRequest::post().uri("/add-uniform"));
        let created: DataResponse<Uniform> = test::call_and_read_body_json(&app, req).await;

        let listed = list(&app).await;
        let found = listed.iter().find(|u| u.id() == created.data.id()).expect("listed");
        assert_eq!(found, &created.data);
    }

    #[core::prelude::v1::test]
    fn creates_from_parallel_workers_all_survive() {
        const WORKERS: usize = 4;
        const ROUNDS: usize = 5;

        let dir = TempDir::new().expect("tempdir");
        let state = test_state(&dir);

        // One runtime per thread over shared state, as `HttpServer` runs its workers.
        std::thread::scope(|scope| {
            for worker in 0..WORKERS {
                let state = state.clone();
                scope.spawn(move || {
                    actix_web::rt::System::new().block_on(async move {
                        let app = init_app(state).await;
                        for round in 0..ROUNDS {
                            let req = test::TestRequest::post()
                                .uri("/add-uniform")
                                .set_json(json!({
                                    "school": format!("{worker}-{round}"),
                                    "uniformCombo": "navy",
                                }))
                                .to_request();
                            let resp = test::call_service(&app, req).await;
                            assert_eq!(resp.status(), StatusCode::OK);
                        }
                    });
                });
            }
        });

        let stored = state.store.load_all().expect("load");
        assert_eq!(stored.len(), WORKERS * ROUNDS);
        let ids: HashSet<&str> = stored.iter().filter_map(|u| u.id()).collect();
        let schools: HashSet<&str> = stored.iter().filter_map(|u| u.school()).collect();
        assert_eq!(ids.len(), WORKERS * ROUNDS);
        assert_eq!(schools.len(), WORKERS * ROUNDS);
    }

    #[actix_web::test]
    async fn oversized_text_field_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let app = init_app(test_state_with_limit(&dir, Some(16))).await;

        let req = MultipartBody::new()
            .text("school", &"x".repeat(64))
            .text("uniformCombo", "blue")
            .into_request(test::TestRequest::post().uri("/add-uniform"));
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Upload exceeds the limit of 16 bytes.");

        assert!(list(&app).await.is_empty());
        assert!(stored_files(&dir).is_empty());
    }

    #[actix_web::test]
    async fn corrupt_store_is_a_server_error_and_uploads_are_discarded() {
        let dir = TempDir::new().expect("tempdir");
        let app = test_app(&dir).await;
        std::fs::write(dir.path().join("uniforms.json"), "[").expect("corrupt");

        let req = MultipartBody::new()
            .text("school", "Hill")
            .text("uniformCombo", "blue")
            .file("uniformImage", "a.jpg", b"a")
            .into_request(test::TestRequest::post().uri("/add-uniform"));
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Server error while adding uniform.");
        assert!(stored_files(&dir).is_empty());
    }
}
