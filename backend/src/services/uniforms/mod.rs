//! # Uniform Record Endpoints
//!
//! Every handler loads the whole collection from the backing file and, when it
//! mutates, writes the whole collection back inside one serialized cycle of
//! [`crate::store::UniformStore::modify`].
//!
//! ## Registered Routes:
//!
//! *   **`GET /uniforms`**: the full list, in insertion order.
//! *   **`POST /add-uniform`**: creates a record from form fields and up to three
//!     image uploads (`uniformImage`, `compoundImage`, `churchImage`). `school` and
//!     `uniformCombo` are required.
//! *   **`PUT /update-uniform/{id}`**: shallow-merges the submitted fields into the
//!     record; image slots change only when a new file is uploaded for them.
//! *   **`DELETE /delete-uniform/{id}`**: removes the record and its image files.
//!
//! Create and update accept `multipart/form-data`, JSON and urlencoded bodies.

mod create;
mod delete;
mod list;
mod submission;
mod update;

use actix_web::web::{self, delete, get, post, put};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/uniforms", get().to(list::process))
        .route("/add-uniform", post().to(create::process))
        .route("/update-uniform/{id}", put().to(update::process))
        .route("/delete-uniform/{id}", delete().to(delete::process));
}
