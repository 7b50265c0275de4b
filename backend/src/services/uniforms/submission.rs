//! Parsing of create/update request bodies.
//!
//! Files are written to the upload directory while the body streams in, before
//! any record is built. If parsing fails midway, files already written for the
//! request are removed again.

use crate::error::ApiError;
use crate::uploads::{StoredUpload, UploadDir, UploadError};
use actix_multipart::Multipart;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use common::model::image_slot::ImageSlot;
use common::requests::UniformFields;
use futures_util::StreamExt;

#[derive(Debug, Default)]
pub struct Submission {
    pub fields: UniformFields,
    pub files: Vec<(ImageSlot, StoredUpload)>,
}

impl Submission {
    fn has_file(&self, slot: ImageSlot) -> bool {
        self.files.iter().any(|(s, _)| *s == slot)
    }
}

/// Removes files that were stored for a request that did not go through.
pub fn discard_files(files: &[(ImageSlot, StoredUpload)], uploads: &UploadDir) {
    for (_, file) in files {
        uploads.remove(&file.public_path());
    }
}

/// Reads the request body according to its content type.
///
/// Bodies of any other type (or none) yield empty fields, which create then
/// rejects as missing required fields and update treats as "no changes".
pub async fn read_submission(
    req: &HttpRequest,
    payload: web::Payload,
    uploads: &UploadDir,
    action: &'static str,
) -> Result<Submission, ApiError> {
    let content_type = req.content_type().to_ascii_lowercase();
    let mut payload = payload.into_inner();

    if content_type.starts_with("multipart/form-data") {
        let mut submission = Submission::default();
        let mut multipart = Multipart::new(req.headers(), payload);
        if let Err(e) = read_multipart(&mut multipart, &mut submission, uploads, action).await {
            discard_files(&submission.files, uploads);
            return Err(e);
        }
        Ok(submission)
    } else if content_type.starts_with("application/json") {
        let fields = web::Json::<UniformFields>::from_request(req, &mut payload)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;
        Ok(Submission {
            fields: fields.into_inner(),
            files: Vec::new(),
        })
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let fields = web::Form::<UniformFields>::from_request(req, &mut payload)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid form body: {}", e)))?;
        Ok(Submission {
            fields: fields.into_inner(),
            files: Vec::new(),
        })
    } else {
        Ok(Submission::default())
    }
}

async fn read_multipart(
    multipart: &mut Multipart,
    submission: &mut Submission,
    uploads: &UploadDir,
    action: &'static str,
) -> Result<(), ApiError> {
    while let Some(item) = multipart.next().await {
        let mut field = item.map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()))
            .unwrap_or_default();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()));

        match filename {
            // Unselected browser file inputs arrive as an empty, unnamed file.
            Some(filename) if filename.is_empty() => {
                while let Some(chunk) = field.next().await {
                    chunk.map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?;
                }
            }
            Some(filename) => {
                let slot = ImageSlot::from_field_name(&name)
                    .filter(|slot| !submission.has_file(*slot))
                    .ok_or_else(|| ApiError::BadRequest(format!("Unexpected field: {}", name)))?;
                let stored = uploads
                    .save(&filename, &mut field)
                    .await
                    .map_err(|e| upload_error(e, action))?;
                submission.files.push((slot, stored));
            }
            None => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?;
                    if bytes.len() + chunk.len() > uploads.max_bytes() {
                        return Err(ApiError::PayloadTooLarge {
                            limit: uploads.max_bytes(),
                        });
                    }
                    bytes.extend_from_slice(&chunk);
                }
                let value = String::from_utf8(bytes)
                    .map_err(|_| ApiError::BadRequest(format!("Field {} is not valid UTF-8", name)))?;
                // Unknown text fields are ignored.
                submission.fields.set(&name, value);
            }
        }
    }
    Ok(())
}

fn upload_error(err: UploadError, action: &'static str) -> ApiError {
    match err {
        UploadError::TooLarge { limit } => ApiError::PayloadTooLarge { limit },
        UploadError::Body(msg) => ApiError::BadRequest(format!("Invalid multipart body: {}", msg)),
        io @ UploadError::Io { .. } => ApiError::internal(action, io),
    }
}
