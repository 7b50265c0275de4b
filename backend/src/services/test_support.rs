//! Helpers shared by the HTTP tests: a temp-dir backed app and a raw multipart body builder.

use crate::config::Config;
use crate::state::AppState;
use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{test, web, App};
use common::model::uniform::Uniform;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

const BOUNDARY: &str = "----uniform-test-boundary";

fn data_file(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("uniforms.json")
}

fn uploads_dir(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("uploads")
}

/// Writes `records` as the backing file.
pub fn seed(dir: &TempDir, records: &[Value]) {
    fs::write(data_file(dir), serde_json::to_vec_pretty(records).expect("encode")).expect("seed");
}

pub fn uniform_json(id: &str, school: &str) -> Value {
    json!({
        "id": id,
        "school": school,
        "uniformCombo": format!("{school} colours"),
        "uniformImage": null,
        "compoundImage": null,
        "churchImage": null,
    })
}

/// State over a store and upload directory inside `dir`, with the default upload limit.
pub fn test_state(dir: &TempDir) -> web::Data<AppState> {
    test_state_with_limit(dir, None)
}

pub fn test_state_with_limit(dir: &TempDir, max_upload_bytes: Option<usize>) -> web::Data<AppState> {
    let data_file = data_file(dir);
    let uploads_dir = uploads_dir(dir);
    fs::create_dir_all(&uploads_dir).expect("uploads dir");
    if !data_file.exists() {
        fs::write(&data_file, "[]").expect("data file");
    }
    let config = Config::from_lookup(|name| match name {
        "DATA_FILE" => Some(data_file.to_string_lossy().into_owned()),
        "UPLOADS_DIR" => Some(uploads_dir.to_string_lossy().into_owned()),
        "MAX_UPLOAD_BYTES" => max_upload_bytes.map(|limit| limit.to_string()),
        _ => None,
    })
    .expect("config");
    web::Data::new(AppState::from_config(&config))
}

/// The full route table over `state`.
pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(App::new().configure(crate::services::configure(state))).await
}

pub async fn test_app(
    dir: &TempDir,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    init_app(test_state(dir)).await
}

pub async fn list<S, B>(app: &S) -> Vec<Uniform>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get().uri("/uniforms").to_request();
    test::call_and_read_body_json(app, req).await
}

/// Names of the files currently in the uploads directory.
pub fn stored_files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(uploads_dir(dir))
        .expect("uploads dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, req: test::TestRequest) -> Request {
        self.body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        req.insert_header((CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}")))
            .set_payload(self.body)
            .to_request()
    }
}
